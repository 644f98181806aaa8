//! HTTP client for the external form-processing endpoint
//!
//! This module provides:
//! - `FormEndpoint`, the multipart submission client
//! - `TransportError` for network failures and non-success statuses

pub mod endpoint;
pub mod error;

pub use endpoint::FormEndpoint;
pub use error::TransportError;
