use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authoring errors raised while accepting a card configuration.
///
/// These are fatal: a host surfaces them as a card-rendering error and the
/// card refuses to build anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The configuration names no source sensor.
    #[error("no source sensor defined")]
    NoEntity,
}

/// Static configuration for a tide card.  Set once at mount time and never
/// mutated afterwards.
///
/// Unknown fields are ignored on deserialization so hosts can carry extra
/// options without breaking older cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Entity id of the tide sensor in the host state store.
    pub entity: String,
}

impl CardConfig {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
        }
    }

    /// A configuration must name a non-empty source entity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity.trim().is_empty() {
            return Err(ConfigError::NoEntity);
        }
        Ok(())
    }

    /// Parse a configuration from TOML.  Validation is the caller's job —
    /// the card re-validates in `set_config` regardless of the source.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_entity() {
        assert_eq!(CardConfig::new("").validate(), Err(ConfigError::NoEntity));
        assert_eq!(CardConfig::new("   ").validate(), Err(ConfigError::NoEntity));
    }

    #[test]
    fn test_validate_accepts_entity() {
        assert!(CardConfig::new("sensor.tide").validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = CardConfig::from_toml_str(r#"entity = "sensor.tide""#).unwrap();
        assert_eq!(config.entity, "sensor.tide");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config =
            CardConfig::from_toml_str("entity = \"sensor.tide\"\ntitle = \"ignored\"\n").unwrap();
        assert_eq!(config.entity, "sensor.tide");
    }
}
