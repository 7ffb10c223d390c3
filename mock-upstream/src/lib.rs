use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub car_type: String,
    pub version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Deserialize)]
pub struct CreateCar {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub car_type: Option<String>,
    #[serde(default, alias = "Owner")]
    pub owner: Option<Value>,
}

#[derive(Deserialize)]
pub struct DeleteParams {
    pub version: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, CarRecord>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/vaulta/api/cars", post(create_car))
        .route("/vaulta/api/cars/{id}", get(get_car).delete(delete_car))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    (status, Json(serde_json::json!({ "error_message": message }))).into_response()
}

fn parse_id(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw)
        .map_err(|_| error(StatusCode::BAD_REQUEST, "id is not a valid uuid"))
}

async fn create_car(State(db): State<Db>, body: String) -> Response {
    let input: Envelope<CreateCar> = match serde_json::from_str(&body) {
        Ok(input) => input,
        Err(e) => return error(StatusCode::BAD_REQUEST, format!("invalid request body: {e}")),
    };
    let input = input.data;

    let car_type = match input.car_type {
        Some(t) if !t.is_empty() => t,
        _ => return error(StatusCode::BAD_REQUEST, "validation failure: type is required"),
    };
    let id = match input.id.as_deref() {
        Some(raw) => match parse_id(raw) {
            Ok(id) => id,
            Err(resp) => return resp,
        },
        None => Uuid::new_v4(),
    };

    let mut cars = db.write().await;
    if cars.contains_key(&id) {
        return error(
            StatusCode::CONFLICT,
            format!("car with id {id} already exists"),
        );
    }
    let record = CarRecord {
        id,
        car_type,
        version: 0,
        owner: input.owner,
    };
    cars.insert(id, record.clone());
    (StatusCode::CREATED, Json(Envelope { data: record })).into_response()
}

async fn get_car(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let cars = db.read().await;
    match cars.get(&id) {
        Some(record) => Json(Envelope {
            data: record.clone(),
        })
        .into_response(),
        None => error(
            StatusCode::NOT_FOUND,
            format!("record {id} does not exist"),
        ),
    }
}

async fn delete_car(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let version: i64 = match params.version.as_deref().map(str::parse) {
        Some(Ok(version)) => version,
        _ => return error(StatusCode::BAD_REQUEST, "version must be an integer"),
    };

    let mut cars = db.write().await;
    match cars.get(&id) {
        None => error(
            StatusCode::NOT_FOUND,
            format!("record {id} does not exist"),
        ),
        Some(record) if record.version != version => error(
            StatusCode::CONFLICT,
            format!("invalid version {version} for record {id}"),
        ),
        Some(_) => {
            cars.remove(&id);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}
