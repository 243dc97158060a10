//! OpenSearch index configuration and mappings.
//!
//! Every free-text field is indexed twice: an `edge` sub-field analyzed into
//! lower-cased leading substrings for search-as-you-type, and a `keyword`
//! sub-field for exact filtering and stable sorting. Flag fields are booleans
//! with an explicit `null_value`.

use serde_json::{json, Map, Value};

use search_service_shared::IndexKind;

/// Name of the custom analyzer producing edge n-grams.
pub const EDGE_NGRAM_ANALYZER: &str = "edge_ngram_analyzer";

/// Name of the edge n-gram token filter used by [`EDGE_NGRAM_ANALYZER`].
pub const EDGE_NGRAM_FILTER: &str = "edge_ngram_filter";

/// Longest prefix emitted for a single token.
pub const MAX_GRAM: u32 = 20;

/// Text fields of a node document, in query order (the embedded address is
/// inserted after `owner`).
pub const NODE_TEXT_FIELDS: &[&str] = &["name", "zone", "owner", "type"];

/// Text fields of a hardware document.
pub const HARDWARE_TEXT_FIELDS: &[&str] = &["type", "node_name", "model_name", "ip_address"];

/// Text fields of an address document, also used for the embedded address.
pub const ADDRESS_TEXT_FIELDS: &[&str] = &["street_name", "street_type", "house_name", "house_type"];

/// Object field holding the embedded address of nodes and hardware.
pub const EMBEDDED_ADDRESS_FIELD: &str = "address";

/// Index naming and write behaviour.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Prepended to every index name, e.g. `"staging-"`.
    pub prefix: String,
    /// Make writes visible to searches immediately.
    pub refresh: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            refresh: true,
        }
    }
}

impl IndexConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Full name of the index holding documents of `kind`.
    pub fn index_name(&self, kind: IndexKind) -> String {
        format!("{}{}", self.prefix, kind.index_name())
    }
}

/// Path of the edge n-gram sub-field of `field`.
pub fn edge(field: &str) -> String {
    format!("{}.edge", field)
}

/// Path of the exact keyword sub-field of `field`.
pub fn keyword(field: &str) -> String {
    format!("{}.keyword", field)
}

/// Shortest prefix emitted for a token. Addresses start at one character so
/// single-digit house numbers are searchable.
pub fn min_gram(kind: IndexKind) -> u32 {
    match kind {
        IndexKind::Addresses => 1,
        IndexKind::Nodes | IndexKind::Hardware => 2,
    }
}

/// Boolean flag fields stored on documents of `kind`.
pub fn flag_fields(kind: IndexKind) -> &'static [&'static str] {
    match kind {
        IndexKind::Nodes => &["is_delete", "is_passive"],
        IndexKind::Hardware => &["is_delete"],
        IndexKind::Addresses => &[],
    }
}

/// Full paths of every free-text field of `kind`, embedded address included.
pub fn text_fields(kind: IndexKind) -> Vec<String> {
    let embedded = || {
        ADDRESS_TEXT_FIELDS
            .iter()
            .map(|field| format!("{}.{}", EMBEDDED_ADDRESS_FIELD, field))
    };

    match kind {
        IndexKind::Nodes => NODE_TEXT_FIELDS[..3]
            .iter()
            .map(|field| field.to_string())
            .chain(embedded())
            .chain(NODE_TEXT_FIELDS[3..].iter().map(|field| field.to_string()))
            .collect(),
        IndexKind::Hardware => HARDWARE_TEXT_FIELDS
            .iter()
            .map(|field| field.to_string())
            .chain(embedded())
            .collect(),
        IndexKind::Addresses => ADDRESS_TEXT_FIELDS.iter().map(|f| f.to_string()).collect(),
    }
}

/// Edge sub-fields queried by a free-text search over `kind`.
pub fn searchable_fields(kind: IndexKind) -> Vec<String> {
    text_fields(kind).iter().map(|field| edge(field)).collect()
}

fn text_field_mapping() -> Value {
    json!({
        "type": "text",
        "fields": {
            "edge": {
                "type": "text",
                "analyzer": EDGE_NGRAM_ANALYZER,
                "search_analyzer": "standard"
            },
            "keyword": {
                "type": "keyword"
            }
        }
    })
}

fn flag_field_mapping() -> Value {
    json!({
        "type": "boolean",
        "null_value": false
    })
}

fn text_properties(fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| (field.to_string(), text_field_mapping()))
        .collect()
}

fn properties(kind: IndexKind) -> Map<String, Value> {
    let mut properties = match kind {
        IndexKind::Nodes => text_properties(NODE_TEXT_FIELDS),
        IndexKind::Hardware => text_properties(HARDWARE_TEXT_FIELDS),
        IndexKind::Addresses => text_properties(ADDRESS_TEXT_FIELDS),
    };

    match kind {
        IndexKind::Nodes | IndexKind::Hardware => {
            properties.insert("id".to_string(), json!({ "type": "long" }));
            properties.insert(
                EMBEDDED_ADDRESS_FIELD.to_string(),
                json!({ "properties": text_properties(ADDRESS_TEXT_FIELDS) }),
            );
        }
        IndexKind::Addresses => {
            properties.insert("house_id".to_string(), json!({ "type": "long" }));
        }
    }

    for flag in flag_fields(kind) {
        properties.insert(flag.to_string(), flag_field_mapping());
    }

    properties
}

/// Get the index settings and mappings for the index of `kind`.
pub fn get_index_settings(kind: IndexKind) -> Value {
    json!({
        "settings": {
            "analysis": {
                "filter": {
                    EDGE_NGRAM_FILTER: {
                        "type": "edge_ngram",
                        "min_gram": min_gram(kind),
                        "max_gram": MAX_GRAM
                    }
                },
                "analyzer": {
                    EDGE_NGRAM_ANALYZER: {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", EDGE_NGRAM_FILTER]
                    }
                }
            }
        },
        "mappings": {
            "properties": properties(kind)
        }
    })
}
