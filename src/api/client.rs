//! API Client
//!
//! Shared entry point: owns the transport and decodes responses into typed
//! records, checking each record's `object` tag on the way.

use super::error::{Error, Result};
use super::form::FormParams;
use super::http::HttpTransport;
use super::transport::{Method, RequestOptions, Transport};
use crate::config::ClientConfig;
use crate::resource::{ApiResource, Deleted, InvoiceItems, List};
use serde_json::Value;
use std::sync::Arc;

/// Main API client
///
/// Cheap to clone; clones share the transport. Holds no mutable state, so
/// concurrent calls are independent of each other.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client backed by the HTTP transport
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Create a client from the file/environment configuration
    pub fn from_env() -> anyhow::Result<Self> {
        let config = ClientConfig::load()?;
        Ok(Self::new(config)?)
    }

    /// Create a client on top of any transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Invoice item operations
    pub fn invoice_items(&self) -> InvoiceItems {
        InvoiceItems::new(self.clone())
    }

    /// Raw round-trip, no decoding
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        params: FormParams,
        options: &RequestOptions,
    ) -> Result<Value> {
        self.transport.request(method, path, params, options).await
    }

    /// Round-trip decoded into a single record
    pub async fn request<T: ApiResource>(
        &self,
        method: Method,
        path: &str,
        params: FormParams,
        options: &RequestOptions,
    ) -> Result<T> {
        let value = self.request_raw(method, path, params, options).await?;
        decode_record(value)
    }

    /// Round-trip decoded into a deletion tombstone
    pub async fn request_deleted<T: ApiResource>(
        &self,
        method: Method,
        path: &str,
        params: FormParams,
        options: &RequestOptions,
    ) -> Result<Deleted<T>> {
        let value = self.request_raw(method, path, params, options).await?;
        let deleted: Deleted<T> = serde_json::from_value(value)?;
        expect_object(T::OBJECT, &deleted.object)?;
        if !deleted.deleted {
            return Err(Error::Deserialize(serde::de::Error::custom(
                "tombstone is missing `deleted: true`",
            )));
        }
        Ok(deleted)
    }

    /// Round-trip decoded into one page of a list
    pub async fn request_list<T: ApiResource>(
        &self,
        path: &str,
        params: FormParams,
        options: &RequestOptions,
    ) -> Result<List<T>> {
        let value = self.request_raw(Method::Get, path, params, options).await?;
        let list: List<T> = serde_json::from_value(value)?;
        expect_object(List::<T>::OBJECT, &list.object)?;
        for item in &list.data {
            expect_object(T::OBJECT, item.object())?;
        }
        Ok(list)
    }
}

fn decode_record<T: ApiResource>(value: Value) -> Result<T> {
    // Check the tag before decoding so a wrong resource kind reports as such
    // rather than as a missing field
    if let Some(found) = value.get("object").and_then(Value::as_str) {
        expect_object(T::OBJECT, found)?;
    }
    let record: T = serde_json::from_value(value)?;
    expect_object(T::OBJECT, record.object())?;
    Ok(record)
}

fn expect_object(expected: &'static str, found: &str) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(Error::UnexpectedObject {
            expected,
            found: found.to_string(),
        })
    }
}
