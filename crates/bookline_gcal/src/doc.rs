// File: crates/bookline_gcal/src/doc.rs

#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::availability::{AvailabilityResponse, AvailableSlot};
use crate::booking::{BookingDetails, BookingResponse};
use crate::models::{BookingArgs, CallEnvelope, DynamicVariables, RequestPayload};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::check_availability_handler,
        crate::handlers::save_booking_handler,
    ),
    components(
        schemas(
            RequestPayload,
            DynamicVariables,
            CallEnvelope,
            BookingArgs,
            AvailabilityResponse,
            AvailableSlot,
            BookingResponse,
            BookingDetails
        )
    ),
    tags(
        (name = "Booking", description = "Availability listing and check-then-commit booking")
    )
)]
pub struct BookingApiDoc;
