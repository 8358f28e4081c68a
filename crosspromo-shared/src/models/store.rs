use serde::{Deserialize, Serialize};
use std::fmt;
use crate::pii::Masked;

/// Opaque store identity. Ordering is plain string comparison, which is the
/// total order used to canonicalize affiliation pairs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoreId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StoreId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A business listed in the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    /// Business category. Stores without one never take part in affiliations.
    pub category: Option<String>,
    pub map_url: Option<String>,
    pub address: Option<String>,
    pub contact: Option<Masked<String>>,
    pub region: Option<String>,
}

impl Store {
    pub fn new(id: impl Into<StoreId>, name: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.map(str::to_string),
            map_url: None,
            address: None,
            contact: None,
            region: None,
        }
    }

    pub fn with_map_url(mut self, map_url: impl Into<String>) -> Self {
        self.map_url = Some(map_url.into());
        self
    }

    /// Two stores may cross-promote only when both carry a category and the
    /// categories differ.
    pub fn is_cross_category(&self, other: &Store) -> bool {
        match (&self.category, &other.category) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}
