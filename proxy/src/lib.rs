//! HTTP façade for the upstream `vaulta` cars API.
//!
//! # Overview
//! `/cars` and `/cars/{id}` are accepted here, checked for shape, and
//! forwarded one-to-one to `{ACC_API_HOST}/vaulta/api/cars`. Upstream status
//! codes and bodies are relayed back almost verbatim.
//!
//! # Design
//! - `handlers` → `service::CarService` → `repository::CarRepository` →
//!   `transport::Transport`, each layer behind a seam tests can replace.
//! - Request building and response classification live in `car_core`; this
//!   crate only adds I/O, routing and configuration.
//! - Configuration is read once in `main` and injected; see `config::Config`.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod service;
pub mod transport;

pub use app::{app, run, service_from_config};
pub use config::{Config, ConfigError};
pub use error::ProxyError;
pub use repository::{CarRepository, RepositoryError, RestCarRepository};
pub use service::CarService;
pub use transport::{Transport, TransportError, UreqTransport};
