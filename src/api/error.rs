//! API error taxonomy
//!
//! Every server-side failure is classified from the HTTP status and the
//! `{"error": {...}}` envelope the API returns. Nothing here retries or
//! recovers; errors are surfaced to the caller as-is.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Result type used across the client.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes the API uses when a resource exists but its lifecycle state
/// forbids the operation (e.g. the parent invoice is no longer a draft).
const STATE_CONFLICT_CODES: &[&str] = &["invoice_not_editable", "invoice_no_longer_editable"];

/// Body of an error response, as sent under the `error` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    /// HTTP status of the response that carried this error.
    #[serde(skip)]
    pub status: u16,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Request parameter the error relates to, if any.
    #[serde(default)]
    pub param: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message.as_deref().unwrap_or("no message"))?;
        if let Some(param) = &self.param {
            write!(f, " (param: {param})")?;
        }
        if let Some(code) = &self.code {
            write!(f, " [{code}]")?;
        }
        Ok(())
    }
}

/// Client error
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter was missing or malformed.
    #[error("validation failed: {0}")]
    Validation(ApiError),

    /// The id is unknown or the resource was deleted.
    #[error("not found: {0}")]
    NotFound(ApiError),

    /// The operation is invalid for the resource's current lifecycle state.
    #[error("state conflict: {0}")]
    StateConflict(ApiError),

    #[error("authentication failed: {0}")]
    Auth(ApiError),

    #[error("rate limit exceeded: {0}")]
    RateLimit(ApiError),

    /// Any other non-success response.
    #[error("API request failed ({status}): {0}", status = .0.status)]
    Api(ApiError),

    /// Network-level failure, including timeouts.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response could not be decoded into the expected type.
    #[error("failed to decode response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("unexpected object type: expected `{expected}`, got `{found}`")]
    UnexpectedObject {
        expected: &'static str,
        found: String,
    },

    /// Rejected locally before anything was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Build an error from a non-success status and its raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut api_error = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error)
            .unwrap_or_default();
        api_error.status = status;

        Self::from_api_error(api_error)
    }

    /// Classify an already-parsed API error.
    pub fn from_api_error(api_error: ApiError) -> Self {
        let code = api_error.code.as_deref();

        if code == Some("resource_missing") {
            return Self::NotFound(api_error);
        }
        if code.is_some_and(|c| STATE_CONFLICT_CODES.contains(&c)) {
            return Self::StateConflict(api_error);
        }

        match api_error.status {
            400 | 402 => Self::Validation(api_error),
            401 | 403 => Self::Auth(api_error),
            404 => Self::NotFound(api_error),
            409 => Self::StateConflict(api_error),
            429 => Self::RateLimit(api_error),
            _ => Self::Api(api_error),
        }
    }

    /// The server-side error details, when the error came from the API.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Validation(e)
            | Self::NotFound(e)
            | Self::StateConflict(e)
            | Self::Auth(e)
            | Self::RateLimit(e)
            | Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status, when the error came from the API.
    pub fn status(&self) -> Option<u16> {
        self.api_error().map(|e| e.status)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Short message suitable for showing to an end user.
    /// Security: never echoes raw server text, which may include request details.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => match &e.param {
                Some(param) => format!("Invalid request. Check the `{}` parameter.", param),
                None => "Invalid request. Check your parameters.".to_string(),
            },
            Self::NotFound(_) => "Resource not found.".to_string(),
            Self::StateConflict(_) => {
                "The resource can no longer be modified in its current state.".to_string()
            },
            Self::Auth(_) => "Authentication failed. Check your API key.".to_string(),
            Self::RateLimit(_) => "Rate limit exceeded. Please try again later.".to_string(),
            Self::Api(e) if e.status >= 500 => {
                "Payments API temporarily unavailable. Please try again.".to_string()
            },
            Self::Api(_) => "Request failed.".to_string(),
            Self::Transport(e) if e.is_timeout() => "Request timed out.".to_string(),
            Self::Transport(_) => {
                "Request failed. Check your network connection and try again.".to_string()
            },
            Self::Deserialize(_) | Self::UnexpectedObject { .. } => {
                "Received an unexpected response from the API.".to_string()
            },
            Self::InvalidRequest(msg) => sanitize(msg),
        }
    }
}

/// Keep printable ASCII and cap the length
fn sanitize(msg: &str) -> String {
    let mut printable = msg.chars().filter(|c| c.is_ascii_graphic() || *c == ' ');
    let sanitized = printable.by_ref().take(80).collect::<String>();

    if printable.next().is_some() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
