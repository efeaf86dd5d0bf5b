// --- File: crates/bookline_gcal/src/models.rs ---

// Request bodies for both endpoints. Voice-agent callers nest the same
// variables under `call.retell_llm_dynamic_variables`; everyone else posts
// them at the top level.

use bookline_common::BooklineError;
use serde::Deserialize;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::availability::AvailabilityQuery;
use crate::booking::BookingRequest;

#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DynamicVariables {
    #[serde(rename = "timeZone")]
    #[cfg_attr(feature = "openapi", schema(example = "America/New_York"))]
    pub time_zone: Option<String>,
    /// Fallback for `timeZone`.
    pub timezone: Option<String>,
    #[serde(rename = "startDate")]
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T09:00"))]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T12:00"))]
    pub end_date: Option<String>,
    #[serde(rename = "selectedDateTime")]
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T09:00:00-05:00"))]
    pub selected_date_time_camel: Option<String>,
    /// Fallback for `selectedDateTime`.
    pub selected_date_time: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CallEnvelope {
    pub retell_llm_dynamic_variables: Option<DynamicVariables>,
}

/// Separate date and time, as sent by tool-calling agents.
#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingArgs {
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01"))]
    pub date: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "09:00 AM"))]
    pub time: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RequestPayload {
    pub call: Option<CallEnvelope>,
    pub args: Option<BookingArgs>,
    #[serde(flatten)]
    pub variables: DynamicVariables,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl RequestPayload {
    /// Parses a raw body. An empty body is treated as `{}`.
    pub fn from_slice(body: &[u8]) -> Result<Self, BooklineError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| BooklineError::InvalidPayload(e.to_string()))
    }

    /// The nested variables when present, otherwise the top-level ones.
    pub fn resolved_variables(&self) -> &DynamicVariables {
        self.call
            .as_ref()
            .and_then(|call| call.retell_llm_dynamic_variables.as_ref())
            .unwrap_or(&self.variables)
    }

    fn timezone(&self) -> Option<String> {
        let vars = self.resolved_variables();
        non_empty(&vars.time_zone).or_else(|| non_empty(&vars.timezone))
    }

    pub fn availability_query(&self) -> AvailabilityQuery {
        let vars = self.resolved_variables();
        AvailabilityQuery {
            timezone: self.timezone(),
            start_date: non_empty(&vars.start_date),
            end_date: non_empty(&vars.end_date),
        }
    }

    /// `args.date` + `args.time` only fill in when no selection is given.
    pub fn booking_request(&self) -> BookingRequest {
        let vars = self.resolved_variables();
        let from_args = || {
            let args = self.args.as_ref()?;
            Some(format!("{} {}", non_empty(&args.date)?, non_empty(&args.time)?))
        };
        BookingRequest {
            timezone: self.timezone(),
            selected_date_time: non_empty(&vars.selected_date_time_camel)
                .or_else(|| non_empty(&vars.selected_date_time))
                .or_else(from_args),
        }
    }
}
