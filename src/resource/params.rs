//! Shared parameter shapes

use serde::{Serialize, Serializer};

/// A value that can also be explicitly cleared.
///
/// Leaving an `Option<Emptyable<T>>` as `None` omits the field and keeps the
/// server-side value. `Some(Emptyable::Empty)` sends the empty sentinel
/// (`field=`), which clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emptyable<T> {
    Set(T),
    Empty,
}

impl<T> From<T> for Emptyable<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T: Serialize> Serialize for Emptyable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => value.serialize(serializer),
            Self::Empty => serializer.serialize_str(""),
        }
    }
}

/// Filter on a Unix timestamp: an exact value or a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RangeQuery {
    Exact(i64),
    Bounds(RangeBounds),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RangeBounds {
    /// Exclusive minimum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<i64>,
    /// Inclusive minimum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<i64>,
    /// Exclusive maximum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<i64>,
    /// Inclusive maximum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<i64>,
}

impl RangeQuery {
    pub fn exact(timestamp: i64) -> Self {
        Self::Exact(timestamp)
    }

    /// Inclusive on both ends
    pub fn between(start: i64, end: i64) -> Self {
        Self::Bounds(RangeBounds {
            gte: Some(start),
            lte: Some(end),
            ..Default::default()
        })
    }

    pub fn after(timestamp: i64) -> Self {
        Self::Bounds(RangeBounds {
            gt: Some(timestamp),
            ..Default::default()
        })
    }

    pub fn before(timestamp: i64) -> Self {
        Self::Bounds(RangeBounds {
            lt: Some(timestamp),
            ..Default::default()
        })
    }

    /// Whether `timestamp` falls inside this filter
    pub fn contains(&self, timestamp: i64) -> bool {
        match self {
            Self::Exact(t) => *t == timestamp,
            Self::Bounds(b) => {
                b.gt.map_or(true, |v| timestamp > v)
                    && b.gte.map_or(true, |v| timestamp >= v)
                    && b.lt.map_or(true, |v| timestamp < v)
                    && b.lte.map_or(true, |v| timestamp <= v)
            },
        }
    }
}
