//! Process configuration read from the environment.

use std::env;

use crate::IndexingError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default Kafka broker address.
const DEFAULT_KAFKA_BROKER: &str = "localhost:9092";

/// Default Kafka consumer group ID.
const DEFAULT_KAFKA_GROUP_ID: &str = "search-service";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings for one service process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub opensearch_url: String,
    pub kafka_broker: String,
    pub kafka_group_id: String,
    /// Prepended to every index name.
    pub index_prefix: String,
    /// Upper bound on bulk request size, unlimited when unset.
    pub max_batch_size: Option<usize>,
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL; otherwise built from
    ///   `ELASTICSEARCH_ADDRESS` and `ELASTICSEARCH_PORT` (default: http://localhost:9200)
    /// - `KAFKA_BROKER`: Kafka broker address; otherwise built from
    ///   `KAFKA_ADDRESS` and `KAFKA_PORT` (default: localhost:9092)
    /// - `KAFKA_GROUP_ID`: Consumer group ID (default: search-service)
    /// - `INDEX_PREFIX`: Index name prefix (default: none)
    /// - `MAX_BATCH_SIZE`: Largest accepted bulk batch (default: unlimited)
    /// - `LOG_FORMAT`: `json` for JSON logs, anything else for text
    pub fn from_env() -> Result<Self, IndexingError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IndexingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let opensearch_url = match get("OPENSEARCH_URL") {
            Some(url) => url,
            None => match (get("ELASTICSEARCH_ADDRESS"), get("ELASTICSEARCH_PORT")) {
                (Some(address), Some(port)) => with_scheme(&format!("{}:{}", address, port)),
                (Some(address), None) => with_scheme(&address),
                _ => DEFAULT_OPENSEARCH_URL.to_string(),
            },
        };

        let kafka_broker = match get("KAFKA_BROKER") {
            Some(broker) => broker,
            None => match (get("KAFKA_ADDRESS"), get("KAFKA_PORT")) {
                (Some(address), Some(port)) => format!("{}:{}", address, port),
                (Some(address), None) => address,
                _ => DEFAULT_KAFKA_BROKER.to_string(),
            },
        };

        let max_batch_size = match get("MAX_BATCH_SIZE") {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<usize>()
                    .map_err(|e| {
                        IndexingError::config(format!("Invalid MAX_BATCH_SIZE '{}': {}", value, e))
                    })?,
            ),
            None => None,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            opensearch_url,
            kafka_broker,
            kafka_group_id: get("KAFKA_GROUP_ID")
                .unwrap_or_else(|| DEFAULT_KAFKA_GROUP_ID.to_string()),
            index_prefix: get("INDEX_PREFIX").unwrap_or_default(),
            max_batch_size,
            log_format,
        })
    }
}

/// Host-and-port settings carry no scheme.
fn with_scheme(address: &str) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServiceConfig, IndexingError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert_eq!(config.kafka_broker, "localhost:9092");
        assert_eq!(config.kafka_group_id, "search-service");
        assert_eq!(config.index_prefix, "");
        assert_eq!(config.max_batch_size, None);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_address_and_port_variables() {
        let config = config(&[
            ("ELASTICSEARCH_ADDRESS", "elastic"),
            ("ELASTICSEARCH_PORT", "9201"),
            ("KAFKA_ADDRESS", "kafka"),
            ("KAFKA_PORT", "29092"),
        ])
        .unwrap();

        assert_eq!(config.opensearch_url, "http://elastic:9201");
        assert_eq!(config.kafka_broker, "kafka:29092");
    }

    #[test]
    fn test_url_takes_precedence() {
        let config = config(&[
            ("OPENSEARCH_URL", "https://search.internal:443"),
            ("ELASTICSEARCH_ADDRESS", "elastic"),
            ("ELASTICSEARCH_PORT", "9201"),
            ("KAFKA_BROKER", "b1:9092,b2:9092"),
            ("KAFKA_ADDRESS", "kafka"),
        ])
        .unwrap();

        assert_eq!(config.opensearch_url, "https://search.internal:443");
        assert_eq!(config.kafka_broker, "b1:9092,b2:9092");
    }

    #[test]
    fn test_address_with_scheme_is_kept() {
        let config = config(&[
            ("ELASTICSEARCH_ADDRESS", "https://elastic"),
            ("ELASTICSEARCH_PORT", "9200"),
        ])
        .unwrap();

        assert_eq!(config.opensearch_url, "https://elastic:9200");
    }

    #[test]
    fn test_optional_settings() {
        let config = config(&[
            ("INDEX_PREFIX", "staging-"),
            ("KAFKA_GROUP_ID", "search-staging"),
            ("MAX_BATCH_SIZE", "500"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.index_prefix, "staging-");
        assert_eq!(config.kafka_group_id, "search-staging");
        assert_eq!(config.max_batch_size, Some(500));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_batch_size() {
        let err = config(&[("MAX_BATCH_SIZE", "lots")]).unwrap_err();
        assert!(matches!(err, IndexingError::ConfigError(_)));
        assert!(err.to_string().contains("MAX_BATCH_SIZE"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[("OPENSEARCH_URL", " "), ("KAFKA_GROUP_ID", "")]).unwrap();

        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert_eq!(config.kafka_group_id, "search-service");
    }
}
