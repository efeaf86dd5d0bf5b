// --- File: crates/bookline_gcal/src/settings.rs ---
use bookline_common::{config_error, BooklineError};
use bookline_config::{GcalConfig, SlotCheckMode};
use chrono::Duration;
use chrono_tz::Tz;
use std::str::FromStr;

pub const DEFAULT_LEDGER_TIME_ZONE: Tz = Tz::Asia__Kolkata;
pub const DEFAULT_SLOT_DURATION_MINUTES: i64 = 60;
pub const DEFAULT_RANGE_DAYS: i64 = 14;
pub const DEFAULT_MAX_RANGE_DAYS: i64 = 90;
pub const DEFAULT_MAX_CONCURRENT_SLOT_CHECKS: usize = 8;
pub const DEFAULT_EVENT_SUMMARY: &str = "Appointment";

/// Validated engine settings derived from [`GcalConfig`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Zone used for every instant exchanged with the calendar.
    pub ledger: Tz,
    pub slot_duration: Duration,
    pub default_range: Duration,
    /// Listings spanning more than this are rejected.
    pub max_range: Duration,
    pub check_mode: SlotCheckMode,
    pub max_concurrent_checks: usize,
    /// Deadline applied to each calendar call, if any.
    pub call_timeout: Option<std::time::Duration>,
    pub event_summary: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ledger: DEFAULT_LEDGER_TIME_ZONE,
            slot_duration: Duration::minutes(DEFAULT_SLOT_DURATION_MINUTES),
            default_range: Duration::days(DEFAULT_RANGE_DAYS),
            max_range: Duration::days(DEFAULT_MAX_RANGE_DAYS),
            check_mode: SlotCheckMode::RangeSnapshot,
            max_concurrent_checks: DEFAULT_MAX_CONCURRENT_SLOT_CHECKS,
            call_timeout: None,
            event_summary: DEFAULT_EVENT_SUMMARY.to_string(),
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &GcalConfig) -> Result<Self, BooklineError> {
        let ledger = match config.ledger_time_zone.as_deref() {
            Some(name) => Tz::from_str(name)
                .map_err(|_| config_error(format!("unknown ledger_time_zone '{}'", name)))?,
            None => DEFAULT_LEDGER_TIME_ZONE,
        };

        let slot_minutes = config
            .slot_duration_minutes
            .unwrap_or(DEFAULT_SLOT_DURATION_MINUTES);
        if slot_minutes <= 0 {
            return Err(config_error("slot_duration_minutes must be positive"));
        }

        let range_days = config.default_range_days.unwrap_or(DEFAULT_RANGE_DAYS);
        if range_days <= 0 {
            return Err(config_error("default_range_days must be positive"));
        }

        let max_range_days = config.max_range_days.unwrap_or(DEFAULT_MAX_RANGE_DAYS);
        if max_range_days < range_days {
            return Err(config_error(
                "max_range_days must be at least default_range_days",
            ));
        }

        let max_concurrent_checks = config
            .max_concurrent_slot_checks
            .unwrap_or(DEFAULT_MAX_CONCURRENT_SLOT_CHECKS);
        if max_concurrent_checks == 0 {
            return Err(config_error("max_concurrent_slot_checks must be at least 1"));
        }

        Ok(Self {
            ledger,
            slot_duration: Duration::minutes(slot_minutes),
            default_range: Duration::days(range_days),
            max_range: Duration::days(max_range_days),
            check_mode: config.slot_check_mode,
            max_concurrent_checks,
            call_timeout: config
                .call_timeout_secs
                .filter(|secs| *secs > 0)
                .map(std::time::Duration::from_secs),
            event_summary: config
                .event_summary
                .clone()
                .unwrap_or_else(|| DEFAULT_EVENT_SUMMARY.to_string()),
        })
    }
}
