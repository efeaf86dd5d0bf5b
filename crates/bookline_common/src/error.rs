// --- File: crates/bookline_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error taxonomy shared by availability listing and booking.
///
/// Validation variants are detected locally before any calendar call.
/// Provider failures arrive already classified as `AuthFailure`,
/// `CalendarNotFound` or `UpstreamError`.
#[derive(Error, Debug)]
pub enum BooklineError {
    /// Timezone missing or outside the four supported US zones
    #[error("Invalid US timezone: {0}")]
    InvalidTimezone(String),

    /// Booking request without a selected date/time
    #[error("Missing selection: {0}")]
    MissingSelection(String),

    /// A date/time string that could not be parsed
    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    /// A range that is empty after normalisation
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A request body that is not the expected JSON shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The recheck before commit found the slot busy, or could not decide
    #[error("Selected slot is no longer available")]
    SlotUnavailable,

    /// The calendar provider rejected our credentials
    #[error("Calendar authentication failed: {0}")]
    AuthFailure(String),

    /// The configured calendar does not exist or is not shared with us
    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    /// Any other provider-side failure, timeouts included
    #[error("Calendar provider error: {0}")]
    UpstreamError(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Anything unanticipated
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl BooklineError {
    /// True for errors detected from the request alone, before any calendar call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BooklineError::InvalidTimezone(_)
                | BooklineError::MissingSelection(_)
                | BooklineError::InvalidInstant(_)
                | BooklineError::InvalidRange(_)
                | BooklineError::InvalidPayload(_)
        )
    }

    /// The message shown to API callers.
    pub fn public_message(&self) -> String {
        match self {
            BooklineError::InvalidTimezone(_) => "Invalid US timezone".to_string(),
            BooklineError::MissingSelection(_) => {
                "No appointment time provided. Please select a valid time slot.".to_string()
            }
            BooklineError::InvalidInstant(msg) => format!("Invalid date/time: {}", msg),
            BooklineError::InvalidRange(msg) => format!("Invalid date range: {}", msg),
            BooklineError::InvalidPayload(msg) => format!("Invalid request body: {}", msg),
            BooklineError::SlotUnavailable => "Selected slot is no longer available".to_string(),
            BooklineError::AuthFailure(_) => "Authentication failed with Google Calendar".to_string(),
            BooklineError::CalendarNotFound(_) => "Calendar not found".to_string(),
            BooklineError::UpstreamError(_)
            | BooklineError::ConfigError(_)
            | BooklineError::InternalError(_) => "Internal server error".to_string(),
        }
    }

    /// Operator-facing detail, only exposed for server-side failures.
    pub fn details(&self) -> Option<String> {
        match self {
            BooklineError::UpstreamError(msg)
            | BooklineError::ConfigError(msg)
            | BooklineError::InternalError(msg) => Some(msg.clone()),
            _ => None,
        }
    }

    /// Collapses everything but validation failures into `InternalError`.
    ///
    /// The listing endpoint only distinguishes bad requests from server failures.
    pub fn into_listing_error(self) -> BooklineError {
        if self.is_validation() {
            self
        } else {
            match self {
                BooklineError::InternalError(_) => self,
                other => BooklineError::InternalError(other.to_string()),
            }
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BooklineError {
    fn status_code(&self) -> u16 {
        match self {
            BooklineError::InvalidTimezone(_) => 400,
            BooklineError::MissingSelection(_) => 400,
            BooklineError::InvalidInstant(_) => 400,
            BooklineError::InvalidRange(_) => 400,
            BooklineError::InvalidPayload(_) => 400,
            BooklineError::SlotUnavailable => 409,
            BooklineError::AuthFailure(_) => 401,
            BooklineError::CalendarNotFound(_) => 404,
            BooklineError::UpstreamError(_) => 500,
            BooklineError::ConfigError(_) => 500,
            BooklineError::InternalError(_) => 500,
        }
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> BooklineError {
    BooklineError::ConfigError(message.to_string())
}

pub fn internal_error<T: fmt::Display>(message: T) -> BooklineError {
    BooklineError::InternalError(message.to_string())
}
