//! Executes the plain-data requests built by `car_core`.
//!
//! # Design
//! `Transport` is synchronous, matching `ureq`. The service layer moves each
//! call onto Tokio's blocking pool so the async handlers never block a worker.
//! Non-2xx statuses come back as `Ok`: classifying them is the core client's
//! job, not the transport's.

use std::time::Duration;

use car_core::{HttpMethod, HttpRequest, HttpResponse};
use thiserror::Error;

/// The request never produced an HTTP response, or its body could not be read.
#[derive(Debug, Error)]
#[error("upstream transport failed: {0}")]
pub struct TransportError(pub String);

pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// `Transport` backed by a shared `ureq::Agent`, which pools connections.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_parts<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
    query: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in query {
        builder = builder.query(key, value);
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            path,
            query,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => with_parts(self.agent.get(&path), &headers, &query).call(),
            HttpMethod::Delete => with_parts(self.agent.delete(&path), &headers, &query).call(),
            HttpMethod::Post => {
                let builder = with_parts(self.agent.post(&path), &headers, &query);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // Reading to the end hands the connection back to the agent's pool.
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        tracing::debug!(method = method.as_str(), %path, status, "upstream responded");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = UreqTransport::new(Duration::from_secs(2));
        let request =
            car_core::CarApiClient::new(&format!("http://127.0.0.1:{port}")).build_fetch_car("x");
        let err = transport.execute(request).unwrap_err();
        assert!(err.to_string().starts_with("upstream transport failed"));
    }
}
