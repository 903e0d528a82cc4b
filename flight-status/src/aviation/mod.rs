//! aviationstack API transport.
//!
//! This module provides the HTTP client for the aviationstack flight API
//! and the [`FlightTransport`] seam the rest of the pipeline talks to.
//!
//! Key characteristics of the upstream API:
//! - Authentication is an `access_key` query parameter, not a header
//! - Every response is `{ data: [...], pagination?, error? }`, with records
//!   that routinely omit nested objects (`aircraft`, `live`, ...)
//! - The free tier only serves current flights; historical lookups by
//!   `flight_date` need a paid plan

mod client;
mod error;
mod mock;
mod types;

pub use client::{AviationClient, AviationConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, FlightTransport};
pub use error::TransportError;
pub use mock::{MockTransport, RecordedCall};
pub use types::{ParamValue, Params, RawResponse};
