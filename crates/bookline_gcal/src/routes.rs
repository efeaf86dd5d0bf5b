// --- File: crates/bookline_gcal/src/routes.rs ---

use crate::handlers::{check_availability_handler, save_booking_handler, BookingState};
use axum::{routing::post, Router};
use std::sync::Arc;

/// Creates a router containing the availability and booking routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/check-availability", post(check_availability_handler))
        .route("/save-booking", post(save_booking_handler))
        .with_state(state)
}
