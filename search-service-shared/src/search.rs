//! Search request and response types.

use serde::{Deserialize, Serialize};

/// Free-text search over nodes or hardware.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Text matched against every searchable field.
    pub query: String,
    /// Number of leading hits to skip.
    #[serde(default)]
    pub offset: u32,
    /// Maximum number of hits to return.
    #[serde(default)]
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, offset: u32, limit: u32) -> Self {
        Self {
            query: query.into(),
            offset,
            limit,
        }
    }
}

/// Flag filters applied to a node search.
///
/// A flag is only tested when its `use_*` switch is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    #[serde(default)]
    pub use_is_delete: bool,
    #[serde(default)]
    pub is_delete: bool,
    #[serde(default)]
    pub use_is_passive: bool,
    #[serde(default)]
    pub is_passive: bool,
}

/// Flag filters applied to a hardware search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareFilter {
    #[serde(default)]
    pub use_is_delete: bool,
    #[serde(default)]
    pub is_delete: bool,
}

impl NodeFilter {
    /// Only nodes whose `is_delete` flag equals `is_delete`.
    pub fn with_is_delete(mut self, is_delete: bool) -> Self {
        self.use_is_delete = true;
        self.is_delete = is_delete;
        self
    }

    /// Only nodes whose `is_passive` flag equals `is_passive`.
    pub fn with_is_passive(mut self, is_passive: bool) -> Self {
        self.use_is_passive = true;
        self.is_passive = is_passive;
        self
    }
}

impl HardwareFilter {
    /// Only hardware whose `is_delete` flag equals `is_delete`.
    pub fn with_is_delete(mut self, is_delete: bool) -> Self {
        self.use_is_delete = true;
        self.is_delete = is_delete;
        self
    }
}

/// Street (and optionally house) lookup over addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub street_query: String,
    /// Secondary house term. Switches the search to house-aware scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_query: Option<String>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
}

impl AddressQuery {
    pub fn street(street_query: impl Into<String>, offset: u32, limit: u32) -> Self {
        Self {
            street_query: street_query.into(),
            house_query: None,
            offset,
            limit,
        }
    }

    pub fn with_house(mut self, house_query: impl Into<String>) -> Self {
        self.house_query = Some(house_query.into());
        self
    }

    /// The house term, if one was supplied and is not empty.
    pub fn house_term(&self) -> Option<&str> {
        self.house_query.as_deref().filter(|house| !house.is_empty())
    }
}

/// Ordered primary keys of the matched documents plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHits {
    pub ids: Vec<i64>,
    pub total: u64,
}

impl SearchHits {
    pub fn empty() -> Self {
        Self::default()
    }
}
