// --- File: crates/bookline_gcal/src/slots.rs ---
use chrono::{DateTime, Duration};
use chrono_tz::Tz;

/// A candidate appointment window in the caller's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Tz>,
    pub duration: Duration,
}

impl Slot {
    pub fn new(start: DateTime<Tz>, duration: Duration) -> Self {
        Self { start, duration }
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.start + self.duration
    }

    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// The same window re-expressed in another zone.
    pub fn in_zone(&self, tz: Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        (self.start.with_timezone(&tz), self.end().with_timezone(&tz))
    }
}

/// Lazy, restartable sequence of slots covering `[start, end)`.
///
/// The first slot starts at `start`; later ones follow at `step` intervals
/// with no snapping to wall-clock boundaries. Clone the sequence to restart it.
#[derive(Debug, Clone)]
pub struct SlotSequence {
    next_start: Option<DateTime<Tz>>,
    end: DateTime<Tz>,
    step: Duration,
}

impl Iterator for SlotSequence {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        let start = self.next_start.filter(|start| *start < self.end)?;
        self.next_start = start.checked_add_signed(self.step);
        Some(Slot::new(start, self.step))
    }
}

/// Enumerates candidate slots for `[start, end)` in `tz`.
///
/// A non-positive `duration` yields an empty sequence.
pub fn generate(
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    tz: Tz,
    duration: Duration,
) -> SlotSequence {
    let positive = duration > Duration::zero();
    SlotSequence {
        next_start: positive.then(|| start.with_timezone(&tz)),
        end: end.with_timezone(&tz),
        step: duration,
    }
}
