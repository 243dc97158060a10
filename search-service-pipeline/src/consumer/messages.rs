//! Message types for the consumer.
//!
//! Every topic carries JSON objects with a `type` discriminator and either a
//! single entity or an array of entities. Arrays may arrive as `null`.

use serde::Deserialize;

use search_service_shared::{Address, Hardware, Node};

/// Discriminator value of a single-entity message.
pub const SINGLE: &str = "single";

/// Discriminator value of a batch message.
pub const BATCH: &str = "batch";

/// A raw message read from the stream, detached from the client's buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// `None` for tombstones and empty records.
    pub payload: Option<Vec<u8>>,
}

/// Payload of the `index-node` topic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeMessage {
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub node: Option<Node>,
    #[serde(default)]
    pub nodes: Option<Vec<Node>>,
}

/// Payload of the `index-hardware` topic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HardwareMessage {
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub hardware_single: Option<Hardware>,
    #[serde(default)]
    pub hardware: Option<Vec<Hardware>>,
}

/// Payload of the `index-address` topic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressMessage {
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub addresses: Option<Vec<Address>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_batch_message() {
        let message: NodeMessage = serde_json::from_str(
            r#"{"type":"batch","nodes":[{"id":1,"name":"core-1"},{"id":2,"is_passive":true}]}"#,
        )
        .unwrap();

        assert_eq!(message.message_type, BATCH);
        assert!(message.node.is_none());
        let nodes = message.nodes.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].is_passive, Some(true));
    }

    #[test]
    fn test_null_array_is_accepted() {
        let message: HardwareMessage = serde_json::from_str(
            r#"{"type":"single","hardware_single":{"id":5,"type":"switch"},"hardware":null}"#,
        )
        .unwrap();

        assert_eq!(message.message_type, SINGLE);
        assert!(message.hardware.is_none());
        assert_eq!(
            message.hardware_single.unwrap().hardware_type.as_deref(),
            Some("switch")
        );
    }

    #[test]
    fn test_address_message() {
        let message: AddressMessage = serde_json::from_str(
            r#"{"addresses":[{"house_id":7,"street_name":"Baker","house_name":"221B"}]}"#,
        )
        .unwrap();

        assert_eq!(message.message_type, "");
        assert_eq!(message.addresses.unwrap()[0].house_id, 7);
    }
}
