// --- File: crates/bookline_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! This module provides the [`CalendarService`] implementation backed by the
//! Google Calendar API, the provider error type shared by every calendar
//! backend, and the deadline wrapper applied to calendar calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bookline_common::models::{BusyInterval, CalendarEvent, CalendarEventResult, LedgerInstant};
use bookline_common::services::{BoxFuture, CalendarService};
use bookline_common::BooklineError;
use chrono::Utc;
use chrono_tz::Tz;
use google_calendar3::api::{Event, EventDateTime, FreeBusyRequest, FreeBusyRequestItem};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::HubType;

/// Errors that can occur when interacting with the calendar provider.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    /// A Google API failure that did not carry a recognised status.
    #[error("Google API Error: {0}")]
    ApiError(google_calendar3::Error),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Calendar not found: {0}")]
    NotFound(String),
    #[error("Booking conflict")]
    Conflict,
    #[error("Upstream failure: {0}")]
    Upstream(String),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Calendar call exceeded {0:?}")]
    Timeout(Duration),
}

/// Any calendar backend, behind the provider error type.
pub type SharedCalendar = Arc<dyn CalendarService<Error = GcalServiceError>>;

/// HTTP status carried by a Google API error, if one can be found.
fn api_status(err: &google_calendar3::Error) -> Option<u16> {
    match err {
        google_calendar3::Error::Failure(response) => Some(response.status().as_u16()),
        google_calendar3::Error::BadRequest(value) => value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|code| code.as_u64())
            .and_then(|code| u16::try_from(code).ok()),
        google_calendar3::Error::MissingToken(_) => Some(401),
        other => {
            let text = other.to_string();
            ["401", "403", "404", "409"]
                .into_iter()
                .find(|code| text.contains(code))
                .and_then(|code| code.parse().ok())
        }
    }
}

impl From<google_calendar3::Error> for GcalServiceError {
    fn from(err: google_calendar3::Error) -> Self {
        match api_status(&err) {
            Some(401) | Some(403) => GcalServiceError::Unauthorized(err.to_string()),
            Some(404) => GcalServiceError::NotFound(err.to_string()),
            Some(409) => GcalServiceError::Conflict,
            _ => GcalServiceError::ApiError(err),
        }
    }
}

impl From<GcalServiceError> for BooklineError {
    fn from(err: GcalServiceError) -> Self {
        match err {
            GcalServiceError::Unauthorized(msg) => BooklineError::AuthFailure(msg),
            GcalServiceError::NotFound(msg) => BooklineError::CalendarNotFound(msg),
            GcalServiceError::Conflict => BooklineError::SlotUnavailable,
            other => BooklineError::UpstreamError(other.to_string()),
        }
    }
}

/// Runs a calendar call, failing with [`GcalServiceError::Timeout`] past `deadline`.
pub async fn with_deadline<T, F>(deadline: Option<Duration>, call: F) -> Result<T, GcalServiceError>
where
    F: Future<Output = Result<T, GcalServiceError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| GcalServiceError::Timeout(limit))?,
        None => call.await,
    }
}

/// Google Calendar service implementation, scoped to one calendar.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    calendar_id: String,
    ledger: Tz,
}

impl GoogleCalendarService {
    pub fn new(calendar_hub: Arc<HubType>, calendar_id: impl Into<String>, ledger: Tz) -> Self {
        Self {
            calendar_hub,
            calendar_id: calendar_id.into(),
            ledger,
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Lists the calendars visible to the service account.
    ///
    /// Called once at startup; the result is only logged.
    pub async fn verify_connection(&self) -> Result<usize, GcalServiceError> {
        let (_response, list) = self.calendar_hub.calendar_list().list().doit().await?;
        let calendars = list.items.unwrap_or_default();
        let visible = calendars
            .iter()
            .any(|entry| entry.id.as_deref() == Some(self.calendar_id.as_str()));
        if !visible {
            warn!(
                "Calendar {} is not in the service account's calendar list",
                self.calendar_id
            );
        }
        Ok(calendars.len())
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Queries `freebusy` for the configured calendar over `[start, end)`.
    ///
    /// Returned intervals are expressed in the ledger zone and sorted by start.
    fn query_busy(
        &self,
        start: LedgerInstant,
        end: LedgerInstant,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        let calendar_id = self.calendar_id.clone();
        let calendar_hub = self.calendar_hub.clone();
        let ledger = self.ledger;

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(start.with_timezone(&Utc)),
                time_max: Some(end.with_timezone(&Utc)),
                time_zone: Some(ledger.name().to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            let (_response, freebusy_response) = calendar_hub.freebusy().query(req).doit().await?;

            let calendar = freebusy_response
                .calendars
                .and_then(|mut calendars| calendars.remove(&calendar_id));

            let Some(calendar) = calendar else {
                return Err(GcalServiceError::NotFound(calendar_id));
            };

            // Per-calendar errors come back inside a 200 response.
            if let Some(errors) = calendar.errors.filter(|errors| !errors.is_empty()) {
                let reasons: Vec<String> = errors.into_iter().filter_map(|e| e.reason).collect();
                if reasons.iter().any(|r| r == "notFound") {
                    return Err(GcalServiceError::NotFound(calendar_id));
                }
                return Err(GcalServiceError::Upstream(reasons.join(", ")));
            }

            let mut busy_periods = Vec::new();
            for period in calendar.busy.unwrap_or_default() {
                if let (Some(start_dt), Some(end_dt)) = (period.start, period.end) {
                    busy_periods.push(BusyInterval::new(
                        start_dt.with_timezone(&ledger),
                        end_dt.with_timezone(&ledger),
                    ));
                } else {
                    info!("Skipping busy period with missing start/end: {:?}", period);
                }
            }
            busy_periods.sort_by_key(|busy| busy.start);
            debug!(
                "freebusy {} - {}: {} busy periods",
                start,
                end,
                busy_periods.len()
            );
            Ok(busy_periods)
        })
    }

    /// Inserts the event with start and end in the ledger zone.
    fn create_event(&self, event: CalendarEvent) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = self.calendar_id.clone();
        let calendar_hub = self.calendar_hub.clone();
        let ledger_name = self.ledger.name().to_string();

        Box::pin(async move {
            if event.end <= event.start {
                return Err(GcalServiceError::TimeParseError(
                    "End time must be after start time".to_string(),
                ));
            }

            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                start: Some(EventDateTime {
                    date_time: Some(event.start.with_timezone(&Utc)),
                    time_zone: Some(ledger_name.clone()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(event.end.with_timezone(&Utc)),
                    time_zone: Some(ledger_name),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }
}
