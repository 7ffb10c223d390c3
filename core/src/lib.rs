//! I/O-free core for the upstream `vaulta` cars API.
//!
//! # Overview
//! Builds `HttpRequest` values and classifies `HttpResponse` values without
//! touching the network (host-does-IO pattern). The proxy crate owns the
//! transport, which keeps this crate deterministic and testable.
//!
//! # Design
//! - `CarApiClient` is stateless and holds only the upstream `base_url`.
//! - Each operation is split into `build_*` (produces the request) and
//!   `parse_*` (classifies the response).
//! - Successful parses hand the raw `HttpResponse` back: the proxy relays the
//!   upstream body verbatim and never needs a typed `Car` on the way out.
//! - DTOs are defined independently from the mock-upstream crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{upstream_error_message, CarApiClient, CARS_PATH, FALLBACK_ERROR_MESSAGE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Car, CarEnvelope, Owner, UpstreamErrorBody};
