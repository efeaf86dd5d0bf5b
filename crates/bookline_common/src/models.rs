// --- File: crates/bookline_common/src/models.rs ---

// Data exchanged with the calendar of record. Every instant here is a
// ledger instant: expressed in the single zone configured for calendar I/O.

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// chrono only deserializes DateTime for fixed zones, so ledger types are
// serialize-only.

/// A point in time expressed in the ledger timezone.
pub type LedgerInstant = DateTime<Tz>;

/// A half-open range `[start, end)` during which the calendar is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusyInterval {
    pub start: LedgerInstant,
    pub end: LedgerInstant,
}

impl BusyInterval {
    pub fn new(start: LedgerInstant, end: LedgerInstant) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test against `[start, end)`.
    ///
    /// Touching intervals do not overlap.
    pub fn overlaps(&self, start: &LedgerInstant, end: &LedgerInstant) -> bool {
        *start < self.end && *end > self.start
    }
}

/// Event to be created in the calendar of record.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub start: LedgerInstant,
    pub end: LedgerInstant,
    /// The summary or title of the event.
    pub summary: String,
    pub description: Option<String>,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID assigned by the calendar.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
}
