//! Payments API plumbing
//!
//! Everything between a typed resource operation and the network:
//! the client facade, the transport seam, request encoding and errors.
//!
//! # Module Structure
//!
//! - [`client`] - Client facade that decodes responses into typed records
//! - [`transport`] - The `Transport` trait and per-call `RequestOptions`
//! - [`http`] - reqwest-backed transport
//! - [`form`] - Bracketed form encoding of request parameters
//! - [`error`] - Error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use stripe_resource::{Client, ClientConfig, InvoiceItemCreateParams, RequestOptions};
//!
//! async fn example() -> stripe_resource::Result<()> {
//!     let client = Client::new(ClientConfig::new("sk_test_123"))?;
//!     let params = InvoiceItemCreateParams {
//!         unit_amount: Some(500),
//!         quantity: Some(3),
//!         ..InvoiceItemCreateParams::new("usd", "cus_1")
//!     };
//!     let item = client
//!         .invoice_items()
//!         .create(&params, &RequestOptions::new().idempotent())
//!         .await?;
//!     assert_eq!(item.amount, 1500);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod transport;

pub use client::Client;
pub use error::{ApiError, Error, Result};
pub use form::{to_form, FormParams};
pub use http::HttpTransport;
pub use transport::{Method, RequestOptions, Transport};
