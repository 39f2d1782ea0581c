//! Transport collaborator
//!
//! The resource layer never touches the network itself. It hands a method,
//! a path and encoded params to a [`Transport`] and gets parsed JSON back.

use super::error::Result;
use super::form::FormParams;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// HTTP method used by resource operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options, applied by the transport
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// Overrides the configured API key for this call
    pub api_key: Option<String>,
    /// Lets the server deduplicate a repeated mutating call
    pub idempotency_key: Option<String>,
    /// Connected account to act on behalf of
    pub stripe_account: Option<String>,
    /// Overrides the configured API version for this call
    pub api_version: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a fresh random idempotency key.
    ///
    /// Reuse the returned options when repeating the same `create`; a new
    /// key per attempt defeats deduplication.
    pub fn idempotent(mut self) -> Self {
        self.idempotency_key = Some(Uuid::new_v4().to_string());
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_stripe_account(mut self, account: impl Into<String>) -> Self {
        self.stripe_account = Some(account.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// Security: the API key never appears in debug output
impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("idempotency_key", &self.idempotency_key)
            .field("stripe_account", &self.stripe_account)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Executes one request/response round-trip.
///
/// GET and DELETE carry `params` in the query string, POST in the body.
/// Implementations return the parsed JSON of a success response, or an
/// [`Error`](super::error::Error) classified from the failure. They must not
/// retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: FormParams,
        options: &RequestOptions,
    ) -> Result<Value>;
}
