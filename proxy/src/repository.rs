//! Repository capability for cars and its upstream REST implementation.

use car_core::{ApiError, CarApiClient, CarEnvelope, HttpResponse};
use thiserror::Error;

use crate::transport::{Transport, TransportError, UreqTransport};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The upstream answered with an unexpected status. `status` is relayed to
    /// the caller unchanged.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("could not encode request: {0}")]
    Encode(String),

    #[error("repository task failed: {0}")]
    Task(String),
}

impl From<ApiError> for RepositoryError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { status, message } => RepositoryError::Rejected { status, message },
            ApiError::Serialization(msg) => RepositoryError::Encode(msg),
        }
    }
}

/// Fetch, create and delete cars. Successful calls return the upstream
/// response so its status and body can be relayed.
pub trait CarRepository: Send + Sync + 'static {
    fn fetch(&self, id: &str) -> Result<HttpResponse, RepositoryError>;

    fn create(&self, envelope: &CarEnvelope) -> Result<HttpResponse, RepositoryError>;

    /// Every upstream status is a success here, 409 on a stale version
    /// included.
    fn delete(&self, id: &str, version: &str) -> Result<HttpResponse, RepositoryError>;
}

/// `CarRepository` that talks to the upstream cars API over HTTP.
#[derive(Debug, Clone)]
pub struct RestCarRepository<T = UreqTransport> {
    client: CarApiClient,
    transport: T,
}

impl<T: Transport> RestCarRepository<T> {
    pub fn new(client: CarApiClient, transport: T) -> Self {
        Self { client, transport }
    }
}

impl<T: Transport> CarRepository for RestCarRepository<T> {
    fn fetch(&self, id: &str) -> Result<HttpResponse, RepositoryError> {
        let response = self.transport.execute(self.client.build_fetch_car(id))?;
        Ok(self.client.parse_fetch_car(response)?)
    }

    fn create(&self, envelope: &CarEnvelope) -> Result<HttpResponse, RepositoryError> {
        let request = self.client.build_create_car(envelope)?;
        let response = self.transport.execute(request)?;
        Ok(self.client.parse_create_car(response)?)
    }

    fn delete(&self, id: &str, version: &str) -> Result<HttpResponse, RepositoryError> {
        let response = self.transport.execute(self.client.build_delete_car(id, version))?;
        Ok(self.client.parse_delete_car(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_core::{Car, HttpMethod, HttpRequest};
    use std::sync::Mutex;

    /// Replays one canned response and records the request it was given.
    struct Canned {
        status: u16,
        body: &'static str,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.to_string(),
            })
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn execute(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError("connection refused".to_string()))
        }
    }

    fn repo<T: Transport>(transport: T) -> RestCarRepository<T> {
        RestCarRepository::new(CarApiClient::new("http://upstream"), transport)
    }

    #[test]
    fn fetch_relays_ok_response() {
        let repo = repo(Canned::new(200, r#"{"data":{"id":"a"}}"#));
        let response = repo.fetch("a").unwrap();
        assert_eq!(response.status, 200);
        let seen = repo.transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].path, "http://upstream/vaulta/api/cars/a");
    }

    #[test]
    fn fetch_rejection_keeps_status_and_message() {
        let repo = repo(Canned::new(404, r#"{"error_message":"record a does not exist"}"#));
        match repo.fetch("a").unwrap_err() {
            RepositoryError::Rejected { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "record a does not exist");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn create_requires_201() {
        let repo = repo(Canned::new(409, "not json"));
        let envelope = CarEnvelope::new(Car {
            car_type: "cars".to_string(),
            ..Car::default()
        });
        match repo.create(&envelope).unwrap_err() {
            RepositoryError::Rejected { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, car_core::FALLBACK_ERROR_MESSAGE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delete_passes_any_status_through() {
        let repo = repo(Canned::new(409, ""));
        let response = repo.delete("a", "7").unwrap();
        assert_eq!(response.status, 409);
        let seen = repo.transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Delete);
        assert_eq!(seen[0].query, vec![("version".to_string(), "7".to_string())]);
    }

    #[test]
    fn transport_failure_surfaces_as_transport_error() {
        let repo = repo(Unreachable);
        assert!(matches!(
            repo.delete("a", "0").unwrap_err(),
            RepositoryError::Transport(_)
        ));
    }
}
