// --- File: crates/bookline_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Which calendar backend answers busy queries and receives bookings.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CalendarProvider {
    /// Google Calendar through a service account.
    #[default]
    Google,
    /// Process-local calendar, for local development without credentials.
    Memory,
}

/// How each candidate slot is decided during an availability listing.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotCheckMode {
    /// Test candidates against the single range-wide busy fetch.
    #[default]
    RangeSnapshot,
    /// Additionally issue one fresh busy query per candidate slot.
    PerSlot,
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GcalConfig {
    #[serde(default)]
    pub provider: CalendarProvider,
    pub calendar_id: Option<String>,
    /// Path to a service-account JSON key.
    pub key_path: Option<String>,
    // Inline credentials, usually "secret_from_env":
    // BOOKLINE_SECRET_GCAL_CLIENT_EMAIL / GCAL_CLIENT_EMAIL
    // BOOKLINE_SECRET_GCAL_PRIVATE_KEY / GCAL_PRIVATE_KEY
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    /// IANA zone used for every instant exchanged with the calendar.
    pub ledger_time_zone: Option<String>,
    pub slot_duration_minutes: Option<i64>,
    pub default_range_days: Option<i64>,
    /// Longest listing range a caller may request.
    pub max_range_days: Option<i64>,
    #[serde(default)]
    pub slot_check_mode: SlotCheckMode,
    pub max_concurrent_slot_checks: Option<usize>,
    pub call_timeout_secs: Option<u64>,
    pub event_summary: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// One of trace, debug, info, warn, error. `RUST_LOG` takes precedence.
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub gcal: GcalConfig,
}
