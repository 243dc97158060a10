//! Search documents and the entity-to-document mapping.
//!
//! A document is the exact payload stored in the search index. Mapping is a
//! pure transformation: every field is copied, embedded addresses are kept
//! verbatim, and tri-state flags are normalized to an explicit boolean so a
//! stored document never lacks them.

use serde::{Deserialize, Serialize};

use crate::entities::{Address, EmbeddedAddress, Hardware, Node};
use crate::kind::IndexKind;

/// A document that can be written into one of the search indexes.
pub trait SearchDocument: Serialize + Send + Sync {
    /// The index this document belongs to.
    const KIND: IndexKind;

    /// The primary key of the source entity.
    ///
    /// Used verbatim as the document identifier, so re-indexing the same
    /// entity overwrites the previous document.
    fn document_id(&self) -> i64;
}

/// Indexed form of an [`Address`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressDocument {
    pub house_id: i64,
    pub street_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_type: Option<String>,
}

/// Indexed form of a [`Hardware`] unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareDocument {
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
    pub is_delete: bool,
}

/// Indexed form of a [`Node`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
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
    pub is_delete: bool,
    pub is_passive: bool,
}

impl From<Address> for AddressDocument {
    fn from(address: Address) -> Self {
        Self {
            house_id: address.house_id,
            street_name: address.street_name,
            street_type: address.street_type,
            house_name: address.house_name,
            house_type: address.house_type,
        }
    }
}

impl From<Hardware> for HardwareDocument {
    fn from(hardware: Hardware) -> Self {
        Self {
            id: hardware.id,
            hardware_type: hardware.hardware_type,
            node_name: hardware.node_name,
            model_name: hardware.model_name,
            ip_address: hardware.ip_address,
            address: hardware.address,
            is_delete: hardware.is_delete.unwrap_or(false),
        }
    }
}

impl From<Node> for NodeDocument {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            name: node.name,
            zone: node.zone,
            owner: node.owner,
            address: node.address,
            node_type: node.node_type,
            is_delete: node.is_delete.unwrap_or(false),
            is_passive: node.is_passive.unwrap_or(false),
        }
    }
}

impl SearchDocument for AddressDocument {
    const KIND: IndexKind = IndexKind::Addresses;

    fn document_id(&self) -> i64 {
        self.house_id
    }
}

impl SearchDocument for HardwareDocument {
    const KIND: IndexKind = IndexKind::Hardware;

    fn document_id(&self) -> i64 {
        self.id
    }
}

impl SearchDocument for NodeDocument {
    const KIND: IndexKind = IndexKind::Nodes;

    fn document_id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_flags_default_to_false() {
        let node = Node {
            id: 1,
            name: Some("core-1".to_string()),
            ..Default::default()
        };

        let document = NodeDocument::from(node);
        assert!(!document.is_delete);
        assert!(!document.is_passive);

        // Flags must be present in the stored payload, never omitted.
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["is_delete"], json!(false));
        assert_eq!(value["is_passive"], json!(false));
    }

    #[test]
    fn test_node_flags_are_kept() {
        let node = Node {
            id: 2,
            is_delete: Some(true),
            is_passive: Some(false),
            ..Default::default()
        };

        let document = NodeDocument::from(node);
        assert!(document.is_delete);
        assert!(!document.is_passive);
    }

    #[test]
    fn test_hardware_flag_normalized_and_address_verbatim() {
        let address = EmbeddedAddress {
            street_name: Some("Baker".to_string()),
            house_name: Some("221B".to_string()),
            ..Default::default()
        };
        let hardware = Hardware {
            id: 9,
            hardware_type: Some("switch".to_string()),
            address: Some(address.clone()),
            is_delete: None,
            ..Default::default()
        };

        let document = HardwareDocument::from(hardware);

        assert_eq!(document.document_id(), 9);
        assert!(!document.is_delete);
        assert_eq!(document.address, Some(address));

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["type"], "switch");
        assert_eq!(value["is_delete"], json!(false));
        assert_eq!(value["address"]["house_name"], "221B");
    }

    #[test]
    fn test_document_ids_and_kinds() {
        let address = AddressDocument::from(Address {
            house_id: 7,
            street_name: "Baker".to_string(),
            ..Default::default()
        });
        assert_eq!(address.document_id(), 7);
        assert_eq!(AddressDocument::KIND, IndexKind::Addresses);
        assert_eq!(HardwareDocument::KIND, IndexKind::Hardware);
        assert_eq!(NodeDocument::KIND, IndexKind::Nodes);
    }
}
