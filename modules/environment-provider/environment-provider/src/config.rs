//! Configuration for the environment provider module.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Module configuration, read from `modules.environment_provider.config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentProviderConfig {
    /// Name reported in every environment document.
    pub name: String,
    pub mysql: MySqlConfig,
    pub kafka: KafkaConfig,
}

impl Default for EnvironmentProviderConfig {
    fn default() -> Self {
        Self {
            name: "testcontainers".to_owned(),
            mysql: MySqlConfig::default(),
            kafka: KafkaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MySqlConfig {
    /// Image repository; the tag comes from the token's version segment.
    pub image: String,
    pub username: String,
    pub password: String,
    /// Overrides the container runtime's default startup timeout.
    pub startup_timeout_secs: Option<u64>,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            image: "mysql".to_owned(),
            username: "test".to_owned(),
            password: "test".to_owned(),
            startup_timeout_secs: None,
        }
    }
}

impl MySqlConfig {
    #[must_use]
    pub fn startup_timeout(&self) -> Option<Duration> {
        self.startup_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KafkaConfig {
    pub image: String,
    pub startup_timeout_secs: Option<u64>,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            image: "confluentinc/cp-kafka".to_owned(),
            startup_timeout_secs: None,
        }
    }
}

impl KafkaConfig {
    #[must_use]
    pub fn startup_timeout(&self) -> Option<Duration> {
        self.startup_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: EnvironmentProviderConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg, EnvironmentProviderConfig::default());
        assert_eq!(cfg.name, "testcontainers");
        assert_eq!(cfg.mysql.image, "mysql");
        assert_eq!(cfg.kafka.image, "confluentinc/cp-kafka");
        assert_eq!(cfg.mysql.startup_timeout(), None);
    }

    #[test]
    fn partial_section_overrides_only_given_fields() {
        let cfg: EnvironmentProviderConfig = serde_json::from_value(json!({
            "mysql": { "password": "s3cret", "startup_timeout_secs": 120 },
            "kafka": { "image": "registry.local/cp-kafka" }
        }))
        .unwrap();

        assert_eq!(cfg.mysql.username, "test");
        assert_eq!(cfg.mysql.password, "s3cret");
        assert_eq!(cfg.mysql.startup_timeout(), Some(Duration::from_secs(120)));
        assert_eq!(cfg.kafka.image, "registry.local/cp-kafka");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<EnvironmentProviderConfig, _> =
            serde_json::from_value(json!({ "postgres": {} }));
        assert!(result.is_err());
    }
}
