//! Stateless HTTP request builder and response classifier for the upstream
//! cars API.
//!
//! # Design
//! `CarApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Delete never fails to parse: the upstream status, 409 included, is the
//! result the proxy relays.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CarEnvelope, UpstreamErrorBody};

/// Collection path of the upstream API, relative to the host.
pub const CARS_PATH: &str = "/vaulta/api/cars";

/// Message used when an upstream error body carries no usable `error_message`.
pub const FALLBACK_ERROR_MESSAGE: &str = "error performing the request";

/// Synchronous, stateless client for the upstream cars API.
#[derive(Debug, Clone)]
pub struct CarApiClient {
    base_url: String,
}

impl CarApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_fetch_car(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{CARS_PATH}/{id}", self.base_url),
            query: Vec::new(),
            headers: json_headers(),
            body: None,
        }
    }

    pub fn build_create_car(&self, envelope: &CarEnvelope) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(envelope).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{CARS_PATH}", self.base_url),
            query: Vec::new(),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_car(&self, id: &str, version: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{CARS_PATH}/{id}", self.base_url),
            query: vec![("version".to_string(), version.to_string())],
            headers: json_headers(),
            body: None,
        }
    }

    pub fn parse_fetch_car(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        check_status(response, 200)
    }

    pub fn parse_create_car(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        check_status(response, 201)
    }

    pub fn parse_delete_car(&self, response: HttpResponse) -> HttpResponse {
        response
    }
}

/// Extract `error_message` from an upstream error body, or fall back to
/// `FALLBACK_ERROR_MESSAGE` when the body is not that shape or the field is
/// empty.
pub fn upstream_error_message(body: &str) -> String {
    match serde_json::from_str::<UpstreamErrorBody>(body) {
        Ok(parsed) if !parsed.error_message.is_empty() => parsed.error_message,
        _ => FALLBACK_ERROR_MESSAGE.to_string(),
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        ("accept".to_string(), "application/json".to_string()),
        ("content-type".to_string(), "application/json".to_string()),
    ]
}

fn check_status(response: HttpResponse, expected: u16) -> Result<HttpResponse, ApiError> {
    if response.status == expected {
        return Ok(response);
    }
    Err(ApiError::Rejected {
        status: response.status,
        message: upstream_error_message(&response.body),
    })
}
