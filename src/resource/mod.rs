//! Typed resources
//!
//! Records, parameter objects and operations for each resource kind, plus
//! the shapes they share.
//!
//! # Architecture
//!
//! - [`object`] - Identity (`Object`), resource tags and deletion tombstones
//! - [`expandable`] - Id-or-embedded relation fields
//! - [`list`] - List envelope and the lazy cursor paginator
//! - [`params`] - Parameter shapes shared across resources
//! - [`related`] - Typed views of records an invoice item refers to
//! - [`invoice_items`] - The invoice item resource and its operations

pub mod expandable;
pub mod invoice_items;
pub mod list;
pub mod object;
pub mod params;
pub mod related;

pub use expandable::Expandable;
pub use invoice_items::{
    DeletedInvoiceItem, InvoiceItem, InvoiceItemCreateParams, InvoiceItemDeleteParams,
    InvoiceItemListParams, InvoiceItemRetrieveParams, InvoiceItemUpdateParams, InvoiceItems,
    Period,
};
pub use list::{Direction, List, ListPaginator};
pub use object::{ApiResource, Deletable, Deleted, Metadata, Object};
pub use params::{Emptyable, RangeBounds, RangeQuery};
pub use related::{Customer, Invoice, Plan, Subscription, TaxRate};
