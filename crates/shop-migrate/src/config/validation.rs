//! Configuration validation.

use super::Config;
use crate::error::{MigrateError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Connection validation
    if config.connection.id.trim().is_empty() {
        return Err(MigrateError::Config("connection.id is required".into()));
    }
    if config.connection.profile.trim().is_empty() {
        return Err(MigrateError::Config("connection.profile is required".into()));
    }

    // Collaborator locations
    if config.source.dump.as_os_str().is_empty() {
        return Err(MigrateError::Config("source.dump is required".into()));
    }
    if config.source.product_table.is_empty() {
        return Err(MigrateError::Config(
            "source.product_table must not be empty".into(),
        ));
    }
    if config.destination.dump.as_os_str().is_empty() {
        return Err(MigrateError::Config("destination.dump is required".into()));
    }
    if config.mapping.store.as_os_str().is_empty() {
        return Err(MigrateError::Config("mapping.store is required".into()));
    }

    if let Some(group) = config.selection.iter().find(|g| g.trim().is_empty()) {
        return Err(MigrateError::Config(format!(
            "selection contains an empty entity group: '{}'",
            group
        )));
    }

    if let Some(rule) = &config.premapping.preselection {
        if rule.source_name.is_empty() || rule.destination_name.is_empty() {
            return Err(MigrateError::Config(
                "premapping.preselection needs both source_name and destination_name".into(),
            ));
        }
    }

    for (source, destination) in &config.conversion.fields {
        if source.is_empty() || destination.is_empty() {
            return Err(MigrateError::Config(format!(
                "conversion.fields has an empty entry: '{}' -> '{}'",
                source, destination
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        ConnectionConfig, ConversionConfig, DestinationConfig, MappingConfig, PremappingConfig,
        SourceConfig,
    };
    use crate::premapping::PreselectionRule;

    fn valid_config() -> Config {
        Config {
            connection: ConnectionConfig {
                id: "conn-1".to_string(),
                profile: "shopware55".to_string(),
            },
            source: SourceConfig {
                dump: "source.json".into(),
                product_table: "s_articles".to_string(),
            },
            destination: DestinationConfig {
                dump: "destination.json".into(),
            },
            mapping: MappingConfig {
                store: "mappings.json".into(),
            },
            selection: vec!["products".to_string()],
            premapping: PremappingConfig::default(),
            conversion: ConversionConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_connection_id() {
        let mut config = valid_config();
        config.connection.id = " ".to_string();
        assert!(matches!(validate(&config), Err(MigrateError::Config(_))));
    }

    #[test]
    fn test_missing_store() {
        let mut config = valid_config();
        config.mapping.store = "".into();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_half_preselection_rule() {
        let mut config = valid_config();
        config.premapping.preselection = Some(PreselectionRule {
            source_name: "Shopware".to_string(),
            destination_name: String::new(),
        });
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_field_mapping() {
        let mut config = valid_config();
        config
            .conversion
            .fields
            .insert("name".to_string(), String::new());
        assert!(validate(&config).is_err());
    }
}
