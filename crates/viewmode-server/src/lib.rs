//! viewmode Server
//!
//! HTTP wrapper around the viewing-mode classifier:
//! - `POST /classify` with `{"input": "..."}`, or `GET /classify?input=...`
//! - `GET /health`
//! - `GET /` capability document
//! - `GET /metrics` Prometheus exposition

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Overrides, ServerConfig, ServiceConfig};
pub use routes::create_router;
pub use state::AppState;
