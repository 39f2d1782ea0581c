//! HTTP transport for the payments REST API

use super::error::{Error, Result};
use super::form::FormParams;
use super::transport::{Method, RequestOptions, Transport};
use crate::config::ClientConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let char_count = body.chars().count();
    let truncated = if char_count > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// reqwest-backed [`Transport`]
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.config.api_base.as_str().trim_end_matches('/');
        Url::parse(&format!("{}{}", base, path))
            .map_err(|e| Error::invalid_request(format!("invalid request URL: {}", e)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        params: FormParams,
        options: &RequestOptions,
    ) -> Result<Value> {
        let mut url = self.url_for(path)?;
        tracing::debug!("{} {}", method, url.path());

        let mut request = match method {
            Method::Post => self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(params.encode()),
            Method::Get | Method::Delete => {
                if !params.is_empty() {
                    url.set_query(Some(&params.encode()));
                }
                match method {
                    Method::Get => self.client.get(url),
                    _ => self.client.delete(url),
                }
            },
        };

        let api_key = options.api_key.as_deref().unwrap_or(&self.config.api_key);
        let api_version = options
            .api_version
            .as_deref()
            .unwrap_or(&self.config.api_version);

        request = request
            .bearer_auth(api_key)
            .header("Stripe-Version", api_version);

        if let Some(key) = &options.idempotency_key {
            request = request.header("Idempotency-Key", key);
        }
        if let Some(account) = &options.stripe_account {
            request = request.header("Stripe-Account", account);
        }
        if let Some(timeout) = options.timeout.or(self.config.timeout) {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::from_response(status.as_u16(), &body));
        }

        // Handle empty response
        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }
}
