//! Premapping table types exchanged with the operator.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Confirmed `source id → destination id` overrides for one connection and
/// mapping name.
pub type ConnectionPremappingIndex = HashMap<String, String>;

/// One foreign entity as seen from the source system.
///
/// An empty `destination_uuid` means the entry still needs an operator
/// decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremappingEntity {
    /// Identifier in the source system.
    pub source_id: String,
    /// Display name in the source system.
    pub description: String,
    /// Destination identifier, or empty when unresolved.
    #[serde(default)]
    pub destination_uuid: String,
}

impl PremappingEntity {
    /// Create an entity with an optional resolved destination.
    pub fn new(
        source_id: impl Into<String>,
        description: impl Into<String>,
        destination_uuid: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            description: description.into(),
            destination_uuid: destination_uuid.into(),
        }
    }

    /// True when a destination has been confirmed or preselected.
    pub fn is_resolved(&self) -> bool {
        !self.destination_uuid.is_empty()
    }
}

/// One selectable destination-side candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremappingChoice {
    /// Destination identifier.
    pub uuid: String,
    /// Destination display name.
    pub description: String,
}

impl PremappingChoice {
    pub fn new(uuid: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            description: description.into(),
        }
    }
}

/// Premapping for one mapping name: source entities plus destination choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremappingTable {
    /// Mapping name, e.g. `swag_manufacturer`.
    pub entity: String,
    /// Source entities in source read order.
    pub mapping: Vec<PremappingEntity>,
    /// Destination choices sorted by name.
    pub choices: Vec<PremappingChoice>,
}

impl PremappingTable {
    pub fn new(
        entity: impl Into<String>,
        mapping: Vec<PremappingEntity>,
        choices: Vec<PremappingChoice>,
    ) -> Self {
        Self {
            entity: entity.into(),
            mapping,
            choices,
        }
    }

    /// Entries still waiting for an operator decision.
    pub fn unresolved(&self) -> impl Iterator<Item = &PremappingEntity> {
        self.mapping.iter().filter(|e| !e.is_resolved())
    }
}

/// Name order used for presenting choices.
///
/// Case-insensitive first so `alpha` and `Beta` sort the way an operator
/// reads them, then byte order to keep the result total.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
