//! Inbound handlers for `/cars` and `/cars/{id}`.
//!
//! Handlers check request shape only. Whether an id is valid, whether a car
//! exists and whether a version matches are all decided upstream, and the
//! upstream status is relayed as-is.

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use car_core::{CarEnvelope, HttpResponse};

use crate::error::ProxyError;
use crate::service::CarService;

/// Inbound collection path.
pub const CARS_ROUTE: &str = "/cars";

const CONFLICT_MESSAGE: &str = "specified version is incorrect";

/// `POST /cars`. Any other method on the collection is a 405.
pub async fn create(
    State(service): State<CarService>,
    method: Method,
    body: Bytes,
) -> Result<Response, ProxyError> {
    if method != Method::POST {
        return Err(ProxyError::MethodNotAllowed(
            "only post method allowed. did you mean to get on /cars/{id}?",
        ));
    }

    let mut envelope = decode_car(&body)?;
    let id = envelope.ensure_id().to_string();
    tracing::info!(%id, "creating car");

    let response = service.create(envelope).await?;
    Ok(relay(StatusCode::CREATED, response))
}

/// Dispatch for `/cars/{id}`: GET fetches, DELETE deletes.
pub async fn handle_by_method(
    State(service): State<CarService>,
    method: Method,
    uri: Uri,
) -> Response {
    let result = if method == Method::GET {
        fetch(&service, &uri).await
    } else if method == Method::DELETE {
        delete(&service, &uri).await
    } else {
        Err(ProxyError::MethodNotAllowed(
            "method not allowed. did you mean to POST to /cars?",
        ))
    };
    result.into_response()
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn fetch(service: &CarService, uri: &Uri) -> Result<Response, ProxyError> {
    let id = fetch_id(uri.path())?;
    let response = service.fetch(id.to_string()).await?;
    Ok(relay(StatusCode::OK, response))
}

async fn delete(service: &CarService, uri: &Uri) -> Result<Response, ProxyError> {
    let (id, version) = delete_target(uri)?;
    tracing::info!(%id, %version, "deleting car");

    let response = service.delete(id, version).await?;
    let status = StatusCode::from_u16(response.status).map_err(|_| {
        ProxyError::Internal(format!("upstream sent invalid status {}", response.status))
    })?;
    if status == StatusCode::CONFLICT {
        return Err(ProxyError::Upstream {
            status,
            message: CONFLICT_MESSAGE.to_string(),
        });
    }
    Ok(status.into_response())
}

/// Decode a car envelope and reject it before any upstream call if it lacks a
/// type.
pub fn decode_car(body: &[u8]) -> Result<CarEnvelope, ProxyError> {
    let envelope: CarEnvelope = serde_json::from_slice(body)
        .map_err(|e| ProxyError::BadRequest(format!("Invalid Car JSON data \n {e}")))?;
    if envelope.data.car_type.is_empty() {
        return Err(ProxyError::BadRequest(
            "Invalid Car JSON data \n field \"type\" is required".to_string(),
        ));
    }
    Ok(envelope)
}

/// Split `path` into its parent and last segment.
fn split_last(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// The id of a fetch path. Only `/cars/{id}` is accepted; nested paths are a
/// 404 so they never reach the upstream. Shape is checked on the decoded path,
/// so an encoded `/` nests too. The returned id is still encoded.
pub fn fetch_id(path: &str) -> Result<&str, ProxyError> {
    let decoded = urlencoding::decode(path)
        .map_err(|e| ProxyError::BadRequest(format!("invalid path encoding: {e}")))?;
    let (parent, decoded_id) = split_last(&decoded);
    if decoded_id.is_empty() {
        return Err(ProxyError::BadRequest("Can't get an car for empty id".to_string()));
    }
    if parent != CARS_ROUTE {
        return Err(ProxyError::NotFound(format!(
            "404 page not found - did you mean: {CARS_ROUTE}/{decoded_id}"
        )));
    }
    Ok(split_last(path).1)
}

/// The id and version of a delete request. The version is checked first; when
/// it repeats, the first occurrence wins.
pub fn delete_target(uri: &Uri) -> Result<(String, String), ProxyError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|e| ProxyError::BadRequest(format!("invalid query string: {e}")))?;
    let version = pairs
        .into_iter()
        .find(|(key, _)| key == "version")
        .map(|(_, value)| value)
        .unwrap_or_default();
    if version.is_empty() {
        return Err(ProxyError::BadRequest(
            "expected \"version\" as a query parameter to delete an car".to_string(),
        ));
    }

    let (_, id) = split_last(uri.path());
    if id.is_empty() {
        return Err(ProxyError::BadRequest("Can't get an car for empty id".to_string()));
    }
    Ok((id.to_string(), version))
}

/// Relay an upstream body under `status`, keeping its content type.
fn relay(status: StatusCode, upstream: HttpResponse) -> Response {
    let content_type = upstream
        .header("content-type")
        .and_then(|value| HeaderValue::from_str(value).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
}
