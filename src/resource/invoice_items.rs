//! Invoice Items
//!
//! Line items added to a customer's next (or a specific draft) invoice.
//! All operations are single round-trips; the server validates every field
//! and owns the item's lifecycle.

use super::expandable::Expandable;
use super::list::{List, ListPaginator};
use super::object::{ApiResource, Deletable, Deleted, Metadata, Object};
use super::params::{Emptyable, RangeQuery};
use super::related::{Customer, Invoice, Plan, Subscription, TaxRate};
use crate::api::{to_form, Client, Error, Method, RequestOptions, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const PATH: &str = "/v1/invoiceitems";

/// An invoice item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    /// Always `invoiceitem`
    pub object: String,
    /// Minor currency units; equals `unit_amount * quantity`
    pub amount: i64,
    /// Lowercase ISO currency code
    pub currency: String,
    pub customer: Expandable<Deletable<Customer>>,
    /// Creation time, Unix seconds
    pub date: i64,
    pub description: Option<String>,
    pub discountable: bool,
    pub invoice: Option<Expandable<Invoice>>,
    pub livemode: bool,
    #[serde(default)]
    pub metadata: Metadata,
    pub period: Period,
    /// Set when the item is a proration
    pub plan: Option<Plan>,
    pub proration: bool,
    pub quantity: u64,
    pub subscription: Option<Expandable<Subscription>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_item: Option<String>,
    pub tax_rates: Option<Vec<TaxRate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unified_proration: Option<bool>,
    pub unit_amount: Option<i64>,
    /// Decimal string with at most 12 fractional digits
    pub unit_amount_decimal: Option<String>,
}

/// Tombstone returned by [`InvoiceItems::del`]
pub type DeletedInvoiceItem = Deleted<InvoiceItem>;

/// Billing period covered by an item, Unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: i64,
    pub end: i64,
}

impl Period {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start, 0)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.end, 0)
    }
}

impl InvoiceItem {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    /// Not yet attached to an invoice
    pub fn is_pending(&self) -> bool {
        self.invoice.is_none()
    }

    /// True when `unit_amount_decimal` carries precision `unit_amount` cannot
    pub fn has_decimal_override(&self) -> bool {
        match (&self.unit_amount_decimal, self.unit_amount) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(decimal), Some(unit)) => !decimal_equals_integer(decimal, unit),
        }
    }

    /// `unit_amount * quantity`, when that is what `amount` should equal
    pub fn expected_amount(&self) -> Option<i64> {
        if self.has_decimal_override() {
            return None;
        }
        let quantity = i64::try_from(self.quantity).ok()?;
        self.unit_amount?.checked_mul(quantity)
    }

    /// Check the `amount == unit_amount * quantity` invariant. Items without
    /// an integer unit amount trivially pass.
    pub fn amount_is_consistent(&self) -> bool {
        self.expected_amount()
            .map_or(true, |expected| expected == self.amount)
    }
}

fn decimal_equals_integer(decimal: &str, value: i64) -> bool {
    let (whole, fraction) = decimal.split_once('.').unwrap_or((decimal, ""));
    fraction.chars().all(|c| c == '0') && whole.parse::<i64>().ok() == Some(value)
}

impl Object for InvoiceItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl ApiResource for InvoiceItem {
    const OBJECT: &'static str = "invoiceitem";
}

/// Parameters for [`InvoiceItems::create`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceItemCreateParams {
    /// Required
    pub currency: String,
    /// Required: id of the customer to bill
    pub customer: String,
    /// Negative amounts reduce the invoice's amount due
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discountable: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,
    /// Draft invoice to attach to; the next upcoming invoice when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rates: Option<Vec<String>>,
    /// Mutually exclusive with `unit_amount_decimal`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_amount_decimal: Option<String>,
}

impl InvoiceItemCreateParams {
    pub fn new(currency: impl Into<String>, customer: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            customer: customer.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceItemRetrieveParams {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,
}

/// Parameters for [`InvoiceItems::update`]; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceItemUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cannot be `true` for prorations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discountable: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u64>,
    /// `Emptyable::Empty` removes previously set tax rates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rates: Option<Emptyable<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_amount_decimal: Option<String>,
}

/// Parameters for [`InvoiceItems::list`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceItemListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<RangeQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expand: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
    /// Page size, 1 to 100 (server default 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// `true`: only items not yet on an invoice; `false`: only attached items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoiceItemDeleteParams {}

/// Invoice item operations
#[derive(Clone)]
pub struct InvoiceItems {
    client: Client,
}

impl InvoiceItems {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create an invoice item
    pub async fn create(
        &self,
        params: &InvoiceItemCreateParams,
        options: &RequestOptions,
    ) -> Result<InvoiceItem> {
        self.client
            .request(Method::Post, PATH, to_form(params)?, options)
            .await
    }

    /// Retrieve an invoice item by id
    pub async fn retrieve(
        &self,
        id: &str,
        params: &InvoiceItemRetrieveParams,
        options: &RequestOptions,
    ) -> Result<InvoiceItem> {
        let path = item_path(id)?;
        self.client
            .request(Method::Get, &path, to_form(params)?, options)
            .await
    }

    /// Update the fields present in `params`.
    ///
    /// Only possible while the item's invoice is still a draft; otherwise the
    /// server answers with [`Error::StateConflict`].
    pub async fn update(
        &self,
        id: &str,
        params: &InvoiceItemUpdateParams,
        options: &RequestOptions,
    ) -> Result<InvoiceItem> {
        let path = item_path(id)?;
        self.client
            .request(Method::Post, &path, to_form(params)?, options)
            .await
    }

    /// Fetch a single page
    pub async fn list_page(
        &self,
        params: &InvoiceItemListParams,
        options: &RequestOptions,
    ) -> Result<List<InvoiceItem>> {
        self.client
            .request_list(PATH, to_form(params)?, options)
            .await
    }

    /// Lazily iterate every invoice item matching `params`, newest first
    pub fn list(
        &self,
        params: &InvoiceItemListParams,
        options: &RequestOptions,
    ) -> Result<ListPaginator<InvoiceItem>> {
        Ok(ListPaginator::new(
            self.client.clone(),
            PATH,
            to_form(params)?,
            options.clone(),
        ))
    }

    /// Delete an invoice item. Not idempotent: deleting again is `NotFound`.
    pub async fn del(
        &self,
        id: &str,
        params: &InvoiceItemDeleteParams,
        options: &RequestOptions,
    ) -> Result<DeletedInvoiceItem> {
        let path = item_path(id)?;
        tracing::info!("Deleting invoice item {}", id);
        self.client
            .request_deleted(Method::Delete, &path, to_form(params)?, options)
            .await
    }
}

fn item_path(id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(Error::invalid_request(
            "invoice item id must be a non-empty string",
        ));
    }
    // Left unescaped by percent-encoding, then collapsed as dot-segments
    if id == "." || id == ".." {
        return Err(Error::invalid_request(format!(
            "invalid invoice item id: {:?}",
            id
        )));
    }
    Ok(format!("{}/{}", PATH, urlencoding::encode(id)))
}
