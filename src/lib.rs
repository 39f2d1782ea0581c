//! Typed client for the invoice items resource of a paginated, versioned
//! payments REST API.
//!
//! [`Client`] owns a [`Transport`] and hands out per-resource operation
//! sets such as [`InvoiceItems`]. Each operation serializes its params,
//! performs exactly one round-trip (or one per page when listing) and
//! decodes the response into a typed record. The server is authoritative for
//! validation and lifecycle rules; the client neither retries nor caches.

pub mod api;
pub mod config;
pub mod resource;

/// Crate version, used in the default user agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use api::{
    ApiError, Client, Error, FormParams, HttpTransport, Method, RequestOptions, Result, Transport,
};
pub use config::ClientConfig;
pub use resource::*;
