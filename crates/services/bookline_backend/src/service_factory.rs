// --- File: crates/services/bookline_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the calendar adapter named by `gcal.provider` once at startup.
use bookline_common::{config_error, BooklineError};
use bookline_config::{env_vars::SECRET_MARKER, AppConfig, CalendarProvider};
use bookline_gcal::{
    auth::create_calendar_hub, EngineSettings, GoogleCalendarService, InMemoryCalendarService,
    SharedCalendar,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the calendar adapter shared by every request.
pub struct BooklineServiceFactory {
    calendar_service: SharedCalendar,
}

impl BooklineServiceFactory {
    /// Create a new service factory.
    ///
    /// The google provider needs a calendar id and credentials; a failed
    /// connection check is logged but does not abort startup.
    pub async fn new(
        config: &AppConfig,
        settings: &EngineSettings,
    ) -> Result<Self, BooklineError> {
        let calendar_service: SharedCalendar = match config.gcal.provider {
            CalendarProvider::Google => {
                let calendar_id = config
                    .gcal
                    .calendar_id
                    .as_deref()
                    .filter(|id| !id.trim().is_empty() && *id != SECRET_MARKER)
                    .ok_or_else(|| config_error("gcal.calendar_id is required for the google provider"))?;

                info!("Initializing Google Calendar service for {}", calendar_id);
                let hub = create_calendar_hub(&config.gcal).await?;
                let service = GoogleCalendarService::new(Arc::new(hub), calendar_id, settings.ledger);

                match service.verify_connection().await {
                    Ok(count) => info!(
                        "Google Calendar reachable for {}, {} calendars visible",
                        service.calendar_id(),
                        count
                    ),
                    Err(e) => warn!("Google Calendar connection check failed: {}", e),
                }
                Arc::new(service)
            }
            CalendarProvider::Memory => {
                warn!("Using the in-memory calendar; bookings are lost on restart");
                Arc::new(InMemoryCalendarService::new(settings.ledger))
            }
        };

        Ok(Self { calendar_service })
    }

    pub fn calendar_service(&self) -> SharedCalendar {
        self.calendar_service.clone()
    }
}
