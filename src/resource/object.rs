//! Identity and deletion
//!
//! Every record the API returns carries an `id` and an `object` tag naming
//! its kind. A deleted record comes back as a tombstone holding only those
//! two fields plus `"deleted": true`.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;

/// String key/value pairs attached to a record
pub type Metadata = HashMap<String, String>;

/// Shared identity capability of records and tombstones
pub trait Object {
    fn id(&self) -> &str;
    fn object(&self) -> &str;
}

/// A record kind with a fixed `object` tag
pub trait ApiResource: Object + DeserializeOwned + Send + 'static {
    const OBJECT: &'static str;
}

/// Tombstone of a deleted `T`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted<T> {
    pub id: String,
    pub object: String,
    /// Always `true`
    pub deleted: bool,
    #[serde(skip)]
    kind: PhantomData<fn() -> T>,
}

impl<T> Deleted<T> {
    pub fn new(id: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: object.into(),
            deleted: true,
            kind: PhantomData,
        }
    }
}

impl<T> Object for Deleted<T> {
    fn id(&self) -> &str {
        &self.id
    }

    fn object(&self) -> &str {
        &self.object
    }
}

/// A record that may have been deleted, keyed on the `deleted` marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Deletable<T> {
    Live(T),
    Deleted(Deleted<T>),
}

impl<T> Deletable<T> {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted(_))
    }

    pub fn live(&self) -> Option<&T> {
        match self {
            Self::Live(record) => Some(record),
            Self::Deleted(_) => None,
        }
    }

    pub fn into_live(self) -> Option<T> {
        match self {
            Self::Live(record) => Some(record),
            Self::Deleted(_) => None,
        }
    }
}

impl<T: Object> Object for Deletable<T> {
    fn id(&self) -> &str {
        match self {
            Self::Live(record) => record.id(),
            Self::Deleted(tombstone) => tombstone.id(),
        }
    }

    fn object(&self) -> &str {
        match self {
            Self::Live(record) => record.object(),
            Self::Deleted(tombstone) => tombstone.object(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Deletable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let deleted = value
            .get("deleted")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if deleted {
            serde_json::from_value(value)
                .map(Self::Deleted)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(Self::Live)
                .map_err(D::Error::custom)
        }
    }
}
