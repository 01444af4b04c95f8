//! Per-date order history stored on a customer.
//!
//! The history is a map from a date key (e.g. `"2023-12-17"`) to an
//! [`OrderEntry`], which in turn maps attribute names (`"product"`,
//! `"price"`, `"quantity"`, ...) to an [`AttributeValue`]. Only scalar JSON
//! values are accepted; objects, arrays and nulls are rejected so the column
//! never holds shapes the rest of the system cannot render.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors produced while building order-history values from untyped JSON.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderHistoryError {
    /// The date key was blank.
    #[error("order date cannot be empty")]
    EmptyDate,

    /// An attribute held a JSON value that is not a string, number or boolean.
    #[error("attribute `{key}` has an unsupported {kind} value; expected string, number or boolean")]
    UnsupportedValue {
        /// Attribute name.
        key: String,
        /// JSON kind that was rejected.
        kind: &'static str,
    },
}

/// A single order attribute.
///
/// Serialized untagged, so `{"quantity": 3, "product": "Eggs"}` round-trips
/// through JSONB without any wrapper objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// `true` / `false`.
    Bool(bool),
    /// Whole numbers that fit in an `i64`.
    Integer(i64),
    /// Any other JSON number.
    Decimal(f64),
    /// Free text.
    Text(String),
}

impl AttributeValue {
    /// Convert an untyped JSON value into an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`OrderHistoryError::UnsupportedValue`] for objects, arrays and null.
    pub fn from_json(key: &str, value: &Value) -> Result<Self, OrderHistoryError> {
        match value {
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => Ok(n
                .as_i64()
                .map_or_else(|| Self::Decimal(n.as_f64().unwrap_or(f64::NAN)), Self::Integer)),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Null => Err(unsupported(key, "null")),
            Value::Array(_) => Err(unsupported(key, "array")),
            Value::Object(_) => Err(unsupported(key, "object")),
        }
    }
}

fn unsupported(key: &str, kind: &'static str) -> OrderHistoryError {
    OrderHistoryError::UnsupportedValue {
        key: key.to_owned(),
        kind,
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

/// The attributes recorded for one date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderEntry(BTreeMap<String, AttributeValue>);

impl OrderEntry {
    /// Create an empty entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an entry from a JSON object, skipping the given reserved keys.
    ///
    /// # Errors
    ///
    /// Returns [`OrderHistoryError::UnsupportedValue`] if any kept attribute is not a scalar.
    pub fn from_json_object(
        object: &serde_json::Map<String, Value>,
        reserved: &[&str],
    ) -> Result<Self, OrderHistoryError> {
        object
            .iter()
            .filter(|(key, _)| !reserved.contains(&key.as_str()))
            .map(|(key, value)| Ok((key.clone(), AttributeValue::from_json(key, value)?)))
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }

    /// Set an attribute, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up an attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.get(key)
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the entry has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Order history keyed by date string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderHistory(BTreeMap<String, OrderEntry>);

impl OrderHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize a date key.
    ///
    /// # Errors
    ///
    /// Returns [`OrderHistoryError::EmptyDate`] for blank keys.
    pub fn date_key(raw: &str) -> Result<String, OrderHistoryError> {
        let key = raw.trim();
        if key.is_empty() {
            return Err(OrderHistoryError::EmptyDate);
        }
        Ok(key.to_owned())
    }

    /// Replace the entry for `date`, leaving every other date untouched.
    pub fn upsert(&mut self, date: impl Into<String>, entry: OrderEntry) -> Option<OrderEntry> {
        self.0.insert(date.into(), entry)
    }

    /// Entry recorded for `date`.
    #[must_use]
    pub fn get(&self, date: &str) -> Option<&OrderEntry> {
        self.0.get(date)
    }

    /// Iterate entries in date-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &OrderEntry)> {
        self.0.iter()
    }

    /// Number of dates with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no orders have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
