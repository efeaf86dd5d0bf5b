// File: crates/bookline_gcal/src/handlers.rs
use axum::{body::Bytes, extract::State, response::Json};
use bookline_common::BooklineError;
use std::sync::Arc;
use tracing::info;

use crate::availability::{AvailabilityEngine, AvailabilityResponse};
use crate::booking::{BookingCoordinator, BookingResponse};
use crate::models::RequestPayload;
use crate::service::SharedCalendar;
use crate::settings::EngineSettings;

// Shared state needed by the booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub engine: AvailabilityEngine,
    pub coordinator: BookingCoordinator,
}

impl BookingState {
    pub fn new(calendar: SharedCalendar, settings: EngineSettings) -> Self {
        let engine = AvailabilityEngine::new(calendar, settings);
        let coordinator = BookingCoordinator::new(engine.clone());
        Self {
            engine,
            coordinator,
        }
    }
}

/// Lists free slots for the caller's range.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/check-availability",
    request_body = RequestPayload,
    responses(
        (status = 200, description = "Free slots in the caller's timezone", body = AvailabilityResponse),
        (status = 400, description = "Invalid US timezone, date or range"),
        (status = 500, description = "Calendar or internal failure, with details")
    ),
    tag = "Booking"
))]
pub async fn check_availability_handler(
    State(state): State<Arc<BookingState>>,
    body: Bytes,
) -> Result<Json<AvailabilityResponse>, BooklineError> {
    let query = RequestPayload::from_slice(&body)?.availability_query();
    info!(
        "Checking availability: timezone={:?} start={:?} end={:?}",
        query.timezone, query.start_date, query.end_date
    );

    let listing = state
        .engine
        .find_available(&query)
        .await
        .map_err(BooklineError::into_listing_error)?;

    Ok(Json(AvailabilityResponse::from(&listing)))
}

/// Rechecks the selected slot and books it.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/save-booking",
    request_body = RequestPayload,
    responses(
        (status = 200, description = "Booking committed", body = BookingResponse),
        (status = 400, description = "Invalid US timezone or missing selection"),
        (status = 401, description = "Authentication failed with Google Calendar"),
        (status = 404, description = "Calendar not found"),
        (status = 409, description = "Selected slot is no longer available"),
        (status = 500, description = "Calendar or internal failure, with details")
    ),
    tag = "Booking"
))]
pub async fn save_booking_handler(
    State(state): State<Arc<BookingState>>,
    body: Bytes,
) -> Result<Json<BookingResponse>, BooklineError> {
    let request = RequestPayload::from_slice(&body)?.booking_request();
    info!(
        "Saving booking: timezone={:?} selected={:?}",
        request.timezone, request.selected_date_time
    );

    let record = state.coordinator.book(&request).await?;
    Ok(Json(BookingResponse::from(&record)))
}
