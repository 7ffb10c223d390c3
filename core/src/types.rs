//! Domain DTOs for the upstream cars API.
//!
//! # Design
//! Every field of `Car` is optional on the wire and omitted when empty, so a
//! body the caller sent is forwarded without gaining fields it never had.
//! Input is lenient about key casing for `data` and `owner` because older
//! clients send `Data` and `Owner`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `{ "data": ... }` wrapper used by every request and response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarEnvelope {
    #[serde(alias = "Data")]
    pub data: Car,
}

/// A car resource as the upstream API represents it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Car {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, alias = "Owner", skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub car_type: String,
    /// Optimistic-concurrency token checked by the upstream on delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
}

/// Error body returned by the upstream on non-success statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpstreamErrorBody {
    #[serde(default)]
    pub error_message: String,
}

impl CarEnvelope {
    pub fn new(data: Car) -> Self {
        Self { data }
    }

    /// Assign a fresh v4 UUID when the car has no id. Returns the id in use.
    pub fn ensure_id(&mut self) -> &str {
        if self.data.id.is_empty() {
            self.data.id = Uuid::new_v4().to_string();
        }
        &self.data.id
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
