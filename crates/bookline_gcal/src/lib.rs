// --- File: crates/bookline_gcal/src/lib.rs ---
pub mod auth;
pub mod availability;
#[cfg(test)]
mod availability_proptest;
pub mod booking;
#[cfg(test)]
mod booking_test;
pub mod doc;
pub mod handlers;
pub mod memory;
pub mod models;
#[cfg(test)]
mod models_test;
pub mod routes;
pub mod service;
pub mod settings;
pub mod slots;
#[cfg(test)]
mod test_support;
pub mod timezone;
#[cfg(test)]
mod timezone_test;

pub use availability::{AvailabilityEngine, AvailabilityQuery};
pub use booking::{BookingCoordinator, BookingRequest};
pub use handlers::BookingState;
pub use memory::InMemoryCalendarService;
pub use service::{GcalServiceError, GoogleCalendarService, SharedCalendar};
pub use settings::EngineSettings;
