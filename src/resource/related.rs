//! Related records
//!
//! Typed views of the records an invoice item points at. Only the commonly
//! read fields are typed; everything else lands in `extra` so an expanded
//! record round-trips without loss.

use super::object::{ApiResource, Metadata, Object};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub object: String,
    /// `draft`, `open`, `paid`, `uncollectible` or `void`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub amount_due: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Invoice {
    /// Items can still be added, changed or removed
    pub fn is_draft(&self) -> bool {
        self.status.as_deref() == Some("draft")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub interval_count: u64,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRate {
    pub id: String,
    pub object: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    /// Percent, e.g. `8.25`
    #[serde(default)]
    pub percentage: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Object for Customer {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl ApiResource for Customer {
    const OBJECT: &'static str = "customer";
}

impl Object for Invoice {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl ApiResource for Invoice {
    const OBJECT: &'static str = "invoice";
}

impl Object for Plan {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl ApiResource for Plan {
    const OBJECT: &'static str = "plan";
}

impl Object for Subscription {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl ApiResource for Subscription {
    const OBJECT: &'static str = "subscription";
}

impl Object for TaxRate {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

impl ApiResource for TaxRate {
    const OBJECT: &'static str = "tax_rate";
}
