//! Configuration type definitions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{Connection, Profile};
use crate::premapping::{PreselectionRule, PRODUCT_DATA_SELECTION};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection being migrated.
    pub connection: ConnectionConfig,

    /// Source system export.
    pub source: SourceConfig,

    /// Destination entity export.
    pub destination: DestinationConfig,

    /// Mapping store location.
    pub mapping: MappingConfig,

    /// Selected entity groups (default: products).
    #[serde(default = "default_selection")]
    pub selection: Vec<String>,

    /// Premapping behavior.
    #[serde(default)]
    pub premapping: PremappingConfig,

    /// Field mapping for the product converter.
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Connection identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Connection identifier; mappings are scoped by it.
    pub id: String,

    /// Source profile name, e.g. `shopware55`.
    pub profile: String,
}

impl ConnectionConfig {
    /// Build the runtime connection.
    pub fn to_connection(&self) -> Connection {
        Connection {
            id: self.id.clone(),
            profile: Profile::new(self.profile.clone()),
        }
    }
}

/// Source system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON dump of source tables.
    pub dump: PathBuf,

    /// Product table converted by `convert` (default: s_articles).
    #[serde(default = "default_product_table")]
    pub product_table: String,
}

/// Destination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// JSON dump of destination manufacturers.
    pub dump: PathBuf,
}

/// Mapping store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// JSON file holding confirmed premapping.
    pub store: PathBuf,
}

/// Premapping configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PremappingConfig {
    /// Manufacturer preselection rule. The built-in rule applies if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preselection: Option<PreselectionRule>,
}

/// Product conversion configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Source field → destination field.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    /// Destination field holding media ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_field: Option<String>,
}

fn default_selection() -> Vec<String> {
    vec![PRODUCT_DATA_SELECTION.to_string()]
}

fn default_product_table() -> String {
    "s_articles".to_string()
}
