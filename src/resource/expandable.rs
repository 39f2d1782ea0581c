//! Expandable relations
//!
//! A relation field holds the related record's id by default. When the
//! request asks for it via `expand`, the server embeds the full record
//! instead. Callers handle both shapes through [`Expandable`].

use super::object::Object;
use serde::{Deserialize, Serialize};

/// Either a bare id or the embedded record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Id(String),
    Object(Box<T>),
}

impl<T> Expandable<T> {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn as_object(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Object(record) => Some(record),
        }
    }

    pub fn into_object(self) -> Option<T> {
        match self {
            Self::Id(_) => None,
            Self::Object(record) => Some(*record),
        }
    }
}

impl<T: Object> Expandable<T> {
    /// Id of the related record, whichever shape was returned
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Object(record) => record.id(),
        }
    }
}
