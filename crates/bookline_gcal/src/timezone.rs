// --- File: crates/bookline_gcal/src/timezone.rs ---
//! Caller timezone validation and instant conversion.
//!
//! Callers may only use the four continental US zones. Every instant that
//! leaves this crate for the calendar is first moved into the ledger zone.

use bookline_common::BooklineError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// The accepted caller zones, in east-to-west order.
pub const US_TIME_ZONES: [(&str, Tz); 4] = [
    ("America/New_York", Tz::America__New_York),       // Eastern
    ("America/Chicago", Tz::America__Chicago),         // Central
    ("America/Denver", Tz::America__Denver),           // Mountain
    ("America/Los_Angeles", Tz::America__Los_Angeles), // Pacific
];

const NAIVE_DATE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
];

/// True iff `tz` is exactly one of the allowed US zone identifiers.
pub fn validate(tz: &str) -> bool {
    US_TIME_ZONES.iter().any(|(name, _)| *name == tz)
}

/// A caller timezone that passed [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeZoneId {
    name: &'static str,
    tz: Tz,
}

impl TimeZoneId {
    /// Checks a caller-supplied identifier against the allow-list.
    pub fn parse(tz: Option<&str>) -> Result<Self, BooklineError> {
        let raw = tz.unwrap_or_default();
        US_TIME_ZONES
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(name, tz)| TimeZoneId { name: *name, tz: *tz })
            .ok_or_else(|| BooklineError::InvalidTimezone(format!("'{}' is not supported", raw)))
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// An instant parsed from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInstant {
    pub instant: DateTime<Tz>,
    /// False when the input was a bare date.
    pub has_time: bool,
}

/// Margin kept from chrono's representable limits so slot arithmetic on a
/// parsed instant cannot overflow.
const CALENDAR_HEADROOM_DAYS: i64 = 2;

/// Parses caller input as an instant, reading wall-clock forms in `zone`.
///
/// Inputs with an explicit offset keep their absolute point in time.
/// Instants too close to the representable limits are rejected.
pub fn parse_instant(input: &str, zone: Tz) -> Result<ParsedInstant, BooklineError> {
    let parsed = parse_any(input.trim(), zone)?;
    let headroom = Duration::days(CALENDAR_HEADROOM_DAYS);
    if parsed.instant.checked_add_signed(headroom).is_none()
        || parsed.instant.checked_sub_signed(headroom).is_none()
    {
        return Err(BooklineError::InvalidInstant(format!(
            "'{}' is outside the supported calendar range",
            input.trim()
        )));
    }
    Ok(parsed)
}

fn parse_any(input: &str, zone: Tz) -> Result<ParsedInstant, BooklineError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(ParsedInstant {
            instant: dt.with_timezone(&zone),
            has_time: true,
        });
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ParsedInstant {
                instant: resolve_local(naive, zone)?,
                has_time: true,
            });
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        return Ok(ParsedInstant {
            instant: resolve_local(midnight, zone)?,
            has_time: false,
        });
    }

    Err(BooklineError::InvalidInstant(format!(
        "cannot parse '{}'",
        input
    )))
}

/// Reads `instant` in `from_tz` and returns the same point in time in `to_tz`.
pub fn convert(instant: &str, from_tz: Tz, to_tz: Tz) -> Result<DateTime<Tz>, BooklineError> {
    let parsed = parse_instant(instant, from_tz)?;
    Ok(to_zone(&parsed.instant, to_tz))
}

/// Re-expresses an instant in another zone.
pub fn to_zone(instant: &DateTime<Tz>, to_tz: Tz) -> DateTime<Tz> {
    instant.with_timezone(&to_tz)
}

/// Maps a wall-clock time in `zone` to an instant.
///
/// Ambiguous times take the earlier instant; times inside a DST gap move
/// forward by one hour.
pub fn resolve_local(naive: NaiveDateTime, zone: Tz) -> Result<DateTime<Tz>, BooklineError> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            naive
                .checked_add_signed(Duration::hours(1))
                .and_then(|shifted| zone.from_local_datetime(&shifted).earliest())
        })
        .ok_or_else(|| {
            BooklineError::InvalidInstant(format!("{} does not exist in {}", naive, zone))
        })
}

/// Last whole second of `date` in `zone`.
pub fn end_of_day(date: NaiveDate, zone: Tz) -> Result<DateTime<Tz>, BooklineError> {
    let last_second = date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| BooklineError::InvalidInstant(format!("no end of day for {}", date)))?;
    resolve_local(last_second, zone)
}
