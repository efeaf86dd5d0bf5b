// --- File: crates/bookline_common/src/services.rs ---
//! Service abstraction for the external calendar.
//!
//! The availability and booking logic only ever talks to the calendar through
//! [`CalendarService`], which lets tests and local development swap in a
//! process-local implementation.

use std::future::Future;
use std::pin::Pin;

use crate::models::{BusyInterval, CalendarEvent, CalendarEventResult, LedgerInstant};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// The two calendar operations the booking engine consumes.
///
/// An implementation is scoped to exactly one calendar identity.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Busy intervals overlapping `[start, end)`, sorted by start.
    fn query_busy(
        &self,
        start: LedgerInstant,
        end: LedgerInstant,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error>;

    /// Create an event. No conflict check is implied.
    fn create_event(&self, event: CalendarEvent) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}
