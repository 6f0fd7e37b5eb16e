//! leserve - HTTP Server
//!
//! *Le Serve* (The Server) - Axum-based HTTP API for LeParcours predictions and skill graphs

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// API error types
pub mod error;

/// HTTP handlers for REST endpoints
pub mod handlers;

/// Server configuration from environment
pub mod config;

/// API response types matching frontend contract
pub mod responses;

/// Server instance management
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::LeServeServer;
