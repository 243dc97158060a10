//! Domain entities as they arrive from producers.
//!
//! Optional text fields may be missing from the payload. Flag fields are
//! tri-state at this level: `None` means the producer never set them.

use serde::{Deserialize, Serialize};

/// A house on a street.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Primary key, also used as the document identifier.
    pub house_id: i64,
    #[serde(default)]
    pub street_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_type: Option<String>,
}

/// Address sub-structure embedded in nodes and hardware.
///
/// Stored verbatim inside the owning document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_type: Option<String>,
}

/// A hardware unit (switch, modem, ...) installed in a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    pub id: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub hardware_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<EmbeddedAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_delete: Option<bool>,
}

/// A network node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<EmbeddedAddress>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_passive: Option<bool>,
}
