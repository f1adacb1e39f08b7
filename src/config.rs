//! Topic tracking configuration.

use crate::error::{Result, TopicError};
use crate::types::{Stage, VariableId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Host plugin parameter holding the storage variable.
pub const PARAM_STORAGE_SLOT: &str = "Dedicated Variable";
/// Host plugin parameter holding the topic count.
pub const PARAM_TOTAL_TOPICS: &str = "Total Topics";
/// Host plugin parameter holding the unknown-topic stage.
pub const PARAM_STARTING_VALUE: &str = "Starting Topic Value";
/// Host plugin parameter holding the known-topic stage.
pub const PARAM_KNOWN_VALUE: &str = "Known Topic Value";

/// Configuration for a [`TopicStateStore`](crate::TopicStateStore).
///
/// Fixed for the lifetime of the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsConfig {
    /// Variable holding the topic table. Must not be used for anything else.
    #[serde(default = "default_storage_slot")]
    pub storage_slot: VariableId,

    /// Number of addressable topic IDs (`1..=total_topics`).
    #[serde(default = "default_total_topics")]
    pub total_topics: u32,

    /// Stage every topic starts at. Must be negative.
    #[serde(default = "default_starting_value")]
    pub starting_value: Stage,

    /// Stage a topic gets when it first becomes known. Must be non-negative.
    #[serde(default = "default_known_value")]
    pub known_value: Stage,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            storage_slot: default_storage_slot(),
            total_topics: default_total_topics(),
            starting_value: default_starting_value(),
            known_value: default_known_value(),
        }
    }
}

fn default_storage_slot() -> VariableId {
    VariableId(10)
}

fn default_total_topics() -> u32 {
    10
}

fn default_starting_value() -> Stage {
    -1
}

fn default_known_value() -> Stage {
    0
}

impl TopicsConfig {
    /// Largest supported `total_topics`.
    pub const MAX_TOPICS: u32 = u16::MAX as u32;

    /// Check the configuration for values the state machine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.storage_slot.0 < 1 {
            return Err(TopicError::InvalidConfig(
                "storage_slot must be at least 1".into(),
            ));
        }
        if self.total_topics > Self::MAX_TOPICS {
            return Err(TopicError::InvalidConfig(format!(
                "total_topics must be at most {}, got {}",
                Self::MAX_TOPICS,
                self.total_topics
            )));
        }
        if self.starting_value >= 0 {
            return Err(TopicError::InvalidConfig(format!(
                "starting_value must be negative, got {}",
                self.starting_value
            )));
        }
        if self.known_value < 0 {
            return Err(TopicError::InvalidConfig(format!(
                "known_value must not be negative, got {}",
                self.known_value
            )));
        }
        Ok(())
    }

    /// Build a configuration from host plugin parameters.
    ///
    /// Parameter values are strings. Missing or blank parameters keep
    /// their defaults; unrecognized names are ignored.
    pub fn from_parameters<'a, I>(params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();

        for (name, raw) in params {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match name {
                PARAM_STORAGE_SLOT => config.storage_slot = VariableId(parse_param(name, raw)?),
                PARAM_TOTAL_TOPICS => config.total_topics = parse_param(name, raw)?,
                PARAM_STARTING_VALUE => config.starting_value = parse_param(name, raw)?,
                PARAM_KNOWN_VALUE => config.known_value = parse_param(name, raw)?,
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from the JSON object of string parameters
    /// the host keeps for each plugin.
    pub fn from_parameters_json(json: &str) -> Result<Self> {
        let params: HashMap<String, String> = serde_json::from_str(json)?;
        Self::from_parameters(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

fn parse_param<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| TopicError::InvalidConfig(format!("{name}: not a valid integer: {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TopicsConfig::default();
        assert_eq!(config.storage_slot, VariableId(10));
        assert_eq!(config.total_topics, 10);
        assert_eq!(config.starting_value, -1);
        assert_eq!(config.known_value, 0);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            TopicsConfig { storage_slot: VariableId(0), ..Default::default() },
            TopicsConfig { starting_value: 0, ..Default::default() },
            TopicsConfig { known_value: -2, ..Default::default() },
            TopicsConfig { total_topics: u32::MAX, ..Default::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(TopicError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_from_parameters() {
        let config = TopicsConfig::from_parameters([
            ("Dedicated Variable", "42"),
            ("Total Topics", " 25 "),
            ("Starting Topic Value", "-5"),
            ("Known Topic Value", "1"),
            ("Unrelated", "x"),
        ])
        .unwrap();

        assert_eq!(config.storage_slot, VariableId(42));
        assert_eq!(config.total_topics, 25);
        assert_eq!(config.starting_value, -5);
        assert_eq!(config.known_value, 1);
    }

    #[test]
    fn test_from_parameters_blank_keeps_default() {
        let config =
            TopicsConfig::from_parameters([("Total Topics", ""), ("Known Topic Value", "  ")])
                .unwrap();
        assert_eq!(config, TopicsConfig::default());
    }

    #[test]
    fn test_from_parameters_rejects_garbage() {
        let result = TopicsConfig::from_parameters([("Total Topics", "ten")]);
        assert!(matches!(result, Err(TopicError::InvalidConfig(_))));

        let result = TopicsConfig::from_parameters([("Total Topics", "-3")]);
        assert!(matches!(result, Err(TopicError::InvalidConfig(_))));

        let result = TopicsConfig::from_parameters([("Total Topics", "70000")]);
        assert!(matches!(result, Err(TopicError::InvalidConfig(_))));

        let result = TopicsConfig::from_parameters([("Dedicated Variable", "0")]);
        assert!(matches!(result, Err(TopicError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_parameters_json() {
        let json = r#"{
            "Dedicated Variable": "7",
            "Total Topics": "3",
            "Starting Topic Value": "-1",
            "Known Topic Value": "0"
        }"#;
        let config = TopicsConfig::from_parameters_json(json).unwrap();
        assert_eq!(config.storage_slot, VariableId(7));
        assert_eq!(config.total_topics, 3);

        let result = TopicsConfig::from_parameters_json("not json");
        assert!(matches!(result, Err(TopicError::Serialization(_))));
    }

    #[test]
    fn test_serde_defaults() {
        let config: TopicsConfig = serde_json::from_str(r#"{"total_topics": 4}"#).unwrap();
        assert_eq!(config.total_topics, 4);
        assert_eq!(config.storage_slot, VariableId(10));
        assert_eq!(config.starting_value, -1);
    }
}
