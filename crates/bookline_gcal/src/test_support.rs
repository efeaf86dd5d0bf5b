// Fixtures shared by the unit test modules.

use std::sync::Arc;

use bookline_common::models::BusyInterval;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::availability::{AvailabilityEngine, AvailabilityQuery};
use crate::memory::InMemoryCalendarService;
use crate::service::SharedCalendar;
use crate::settings::EngineSettings;

pub const LEDGER: Tz = Tz::Asia__Kolkata;
pub const NY: Tz = Tz::America__New_York;

/// Wall-clock time in New York.
pub fn ny(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Tz> {
    NY.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

/// Busy time on 2024-01-01 in New York, stored in the ledger zone.
pub fn busy_ny(start: (u32, u32), end: (u32, u32)) -> BusyInterval {
    BusyInterval::new(
        ny(2024, 1, 1, start.0, start.1).with_timezone(&LEDGER),
        ny(2024, 1, 1, end.0, end.1).with_timezone(&LEDGER),
    )
}

/// A clock well before every scenario date.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 1, 12, 0, 0).unwrap()
}

pub fn query(timezone: &str, start: Option<&str>, end: Option<&str>) -> AvailabilityQuery {
    AvailabilityQuery {
        timezone: Some(timezone.to_string()),
        start_date: start.map(str::to_string),
        end_date: end.map(str::to_string),
    }
}

pub fn memory_calendar() -> InMemoryCalendarService {
    InMemoryCalendarService::new(LEDGER)
}

pub fn engine(calendar: &Arc<InMemoryCalendarService>, settings: EngineSettings) -> AvailabilityEngine {
    let shared: SharedCalendar = calendar.clone();
    AvailabilityEngine::new(shared, settings)
}
