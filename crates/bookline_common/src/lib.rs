// --- File: crates/bookline_common/src/lib.rs ---

pub mod error; // Error taxonomy and HTTP status mapping
pub mod http; // Axum response conversion
pub mod logging; // Tracing subscriber setup
pub mod models; // Shared calendar data structures
pub mod routes; // Liveness route
pub mod services; // Calendar service abstraction

pub use routes::routes;

pub use error::{
    config_error, internal_error, BooklineError, HttpStatusCode,
};

pub use http::IntoHttpResponse;

pub use logging::{init_with_level, level_from_str, log_error, log_result};
