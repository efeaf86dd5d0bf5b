// --- File: crates/bookline_gcal/src/booking.rs ---
//! Check-then-commit booking.
//!
//! A booking attempt validates its input, rechecks the selected slot with a
//! fresh busy query and only then creates the calendar event. Nothing is held
//! between the recheck and the commit, so two attempts for the same slot that
//! both pass their recheck will both commit.

use bookline_common::models::{CalendarEvent, LedgerInstant};
use bookline_common::services::CalendarService;
use bookline_common::{internal_error, log_error, BooklineError};
use chrono::SecondsFormat;
use serde::Serialize;
use tracing::{debug, error, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::availability::{AvailabilityEngine, SlotCheck};
use crate::service::with_deadline;
use crate::slots::Slot;
use crate::timezone::{parse_instant, TimeZoneId};

/// Caller input for a booking, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub timezone: Option<String>,
    pub selected_date_time: Option<String>,
}

/// Progress of one booking attempt. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookingStage {
    Received,
    Validated,
    Rechecked,
    Committed,
    Rejected,
    Failed,
}

impl BookingStage {
    pub fn can_advance_to(self, next: BookingStage) -> bool {
        use BookingStage::*;
        matches!(
            (self, next),
            (Received, Validated)
                | (Received, Failed)
                | (Validated, Rechecked)
                | (Validated, Failed)
                | (Rechecked, Committed)
                | (Rechecked, Rejected)
                | (Rechecked, Failed)
        )
    }
}

/// Stage trail of a booking attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingAttempt {
    stages: Vec<BookingStage>,
}

impl Default for BookingAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingAttempt {
    pub fn new() -> Self {
        Self {
            stages: vec![BookingStage::Received],
        }
    }

    pub fn stage(&self) -> BookingStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(BookingStage::Received)
    }

    pub fn stages(&self) -> &[BookingStage] {
        &self.stages
    }

    pub fn advance(&mut self, next: BookingStage) -> Result<(), BooklineError> {
        let current = self.stage();
        if !current.can_advance_to(next) {
            return Err(internal_error(format!(
                "illegal booking transition {:?} -> {:?}",
                current, next
            )));
        }
        self.stages.push(next);
        Ok(())
    }

    /// Moves to `Rejected` or `Failed` depending on `err`.
    fn fail(&mut self, err: BooklineError) -> BooklineError {
        let next = match err {
            BooklineError::SlotUnavailable => BookingStage::Rejected,
            _ => BookingStage::Failed,
        };
        if let Err(transition) = self.advance(next) {
            error!("{}", transition);
        }
        err
    }
}

/// A committed booking. The calendar owns it from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRecord {
    pub event_id: String,
    pub start: LedgerInstant,
    pub end: LedgerInstant,
    pub timezone: TimeZoneId,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub id: String,
    /// Start in the ledger zone, with offset.
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T19:30:00+05:30"))]
    pub start_time: String,
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T20:30:00+05:30"))]
    pub end_time: String,
    /// The ledger zone.
    #[cfg_attr(feature = "openapi", schema(example = "Asia/Kolkata"))]
    pub timezone: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub booking: BookingDetails,
}

impl From<&BookingRecord> for BookingResponse {
    fn from(record: &BookingRecord) -> Self {
        Self {
            success: true,
            booking: BookingDetails {
                id: record.event_id.clone(),
                start_time: record.start.to_rfc3339_opts(SecondsFormat::Secs, false),
                end_time: record.end.to_rfc3339_opts(SecondsFormat::Secs, false),
                timezone: record.start.timezone().name().to_string(),
            },
        }
    }
}

/// Outcome of [`BookingCoordinator::book_traced`].
#[derive(Debug)]
pub struct BookingOutcome {
    pub attempt: BookingAttempt,
    pub result: Result<BookingRecord, BooklineError>,
}

/// Runs the check-then-commit protocol against the shared calendar.
#[derive(Clone)]
pub struct BookingCoordinator {
    engine: AvailabilityEngine,
}

impl BookingCoordinator {
    pub fn new(engine: AvailabilityEngine) -> Self {
        Self { engine }
    }

    pub async fn book(&self, request: &BookingRequest) -> Result<BookingRecord, BooklineError> {
        self.book_traced(request).await.result
    }

    /// Books and returns the stage trail alongside the result.
    pub async fn book_traced(&self, request: &BookingRequest) -> BookingOutcome {
        let mut attempt = BookingAttempt::new();
        let result = self.run(request, &mut attempt).await;
        debug!("booking stages: {:?}", attempt.stages());
        BookingOutcome { attempt, result }
    }

    async fn run(
        &self,
        request: &BookingRequest,
        attempt: &mut BookingAttempt,
    ) -> Result<BookingRecord, BooklineError> {
        let (timezone, slot) = match self.validate(request) {
            Ok(validated) => validated,
            Err(e) => return Err(attempt.fail(e)),
        };
        attempt.advance(BookingStage::Validated)?;

        let settings = self.engine.settings();
        let (start, end) = slot.in_zone(settings.ledger);

        let check = self.engine.check_slot(&slot).await;
        attempt.advance(BookingStage::Rechecked)?;

        match check {
            SlotCheck::Free => {}
            SlotCheck::Busy(busy) => {
                warn!(
                    "Slot {} - {} no longer available, busy {} - {}",
                    start, end, busy.start, busy.end
                );
                return Err(attempt.fail(BooklineError::SlotUnavailable));
            }
            SlotCheck::Inconclusive(reason) => {
                warn!("Recheck for {} - {} failed, rejecting: {}", start, end, reason);
                return Err(attempt.fail(BooklineError::SlotUnavailable));
            }
        }

        let event = CalendarEvent {
            start,
            end,
            summary: settings.event_summary.clone(),
            description: Some(format!("Booking made from {}", timezone.name())),
        };

        let created = with_deadline(
            settings.call_timeout,
            self.engine.calendar().create_event(event),
        )
        .await;

        match created {
            Ok(result) => {
                attempt.advance(BookingStage::Committed)?;
                let event_id = result.event_id.unwrap_or_else(|| {
                    warn!("Calendar returned no event id for {} - {}", start, end);
                    String::new()
                });
                info!("Booked {} at {} - {} from {}", event_id, start, end, timezone.name());
                Ok(BookingRecord {
                    event_id,
                    start,
                    end,
                    timezone,
                })
            }
            Err(e) => {
                log_error(&e, &format!("Creating event {} - {} failed", start, end));
                Err(attempt.fail(BooklineError::from(e)))
            }
        }
    }

    /// Timezone first, then the selection.
    fn validate(&self, request: &BookingRequest) -> Result<(TimeZoneId, Slot), BooklineError> {
        let timezone = TimeZoneId::parse(request.timezone.as_deref())?;

        let selected = request
            .selected_date_time
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BooklineError::MissingSelection("selectedDateTime is unset".into()))?;

        let parsed = parse_instant(selected, timezone.tz())?;
        Ok((
            timezone,
            Slot::new(parsed.instant, self.engine.settings().slot_duration),
        ))
    }
}
