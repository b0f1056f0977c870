//! Infrastructure layer for Parley.
//!
//! Provides the HTTP adapter for the remote API, its wire DTOs, and the
//! configuration/path services.

pub mod config_service;
pub mod dto;
pub mod http_api;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::http_api::{HttpApiClient, HttpTokenMinter};
pub use crate::paths::ParleyPaths;
