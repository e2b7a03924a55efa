//! Transport layer for the district matcher server
//!
//! - `http` - axum HTTP API
pub mod http;
