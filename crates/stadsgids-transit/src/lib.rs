//! Live-transit proxy for the De Lijn operator API.
//!
//! Relays disruption and departure lookups upstream and normalizes both
//! success and failure responses into the uniform reply shape the
//! conversational layer consumes. Upstream timeout, connectivity, auth and
//! rate-limit conditions each map to a distinct user-facing message and an
//! HTTP-style status code.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Test allows"
    )
)]

mod client;
mod error;
mod types;

pub use client::TransitClient;
pub use error::TransitError;
pub use types::{
    DisruptionReply, DisruptionReport, ScheduleBoard, ScheduleReply, ScheduleSelector,
};
