//! Manufacturer premapping reader.
//!
//! Builds the operator-facing manufacturer table for a Shopware connection:
//!
//! 1. load confirmed overrides for the connection
//! 2. read every manufacturer from the source shop (`s_articles_supplier`)
//! 3. read every destination manufacturer, sorted by name
//! 4. preselect a destination for unconfirmed entries matching the
//!    preselection rule
//!
//! Pipeline state lives in locals passed between the stages, so one reader
//! can serve concurrent calls.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{
    collate, field_as_string, ConnectionPremappingIndex, Context, Criteria, DestinationRepository,
    FieldSorting, Gateway, MappingPersistence, MigrationContext, PremappingChoice,
    PremappingEntity, PremappingReader, PremappingTable, ProfileFamily,
};
use crate::error::Result;

/// Mapping name manufacturer premapping is stored and resolved under.
pub const MANUFACTURER_MAPPING_NAME: &str = "swag_manufacturer";

/// Source table holding manufacturers.
pub const MANUFACTURER_TABLE: &str = "s_articles_supplier";

/// Data selection that needs manufacturer premapping.
pub const PRODUCT_DATA_SELECTION: &str = "products";

/// Exact-name rule mapping one source manufacturer name to one destination
/// manufacturer name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreselectionRule {
    /// Source manufacturer name that triggers the rule.
    pub source_name: String,
    /// Destination manufacturer name to preselect.
    pub destination_name: String,
}

impl Default for PreselectionRule {
    fn default() -> Self {
        Self {
            source_name: "Shopware".to_string(),
            destination_name: "shopware AG".to_string(),
        }
    }
}

/// source id → source name
type SourceNameDictionary = HashMap<String, String>;

/// destination name → destination id
type PreselectionDictionary = HashMap<String, String>;

/// Premapping reader for product manufacturers.
pub struct ManufacturerReader {
    gateway: Arc<dyn Gateway>,
    manufacturer_repo: Arc<dyn DestinationRepository>,
    persistence: Arc<dyn MappingPersistence>,
    preselection: PreselectionRule,
}

impl ManufacturerReader {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        manufacturer_repo: Arc<dyn DestinationRepository>,
        persistence: Arc<dyn MappingPersistence>,
    ) -> Self {
        Self {
            gateway,
            manufacturer_repo,
            persistence,
            preselection: PreselectionRule::default(),
        }
    }

    /// Replace the default preselection rule.
    pub fn with_preselection(mut self, rule: PreselectionRule) -> Self {
        self.preselection = rule;
        self
    }

    /// Read all source manufacturers, filling destinations from confirmed
    /// overrides.
    async fn read_source_entities(
        &self,
        migration_context: &MigrationContext,
        confirmed: &ConnectionPremappingIndex,
    ) -> Result<(Vec<PremappingEntity>, SourceNameDictionary)> {
        let rows = self
            .gateway
            .read_table(migration_context, MANUFACTURER_TABLE)
            .await?;

        let mut entities = Vec::with_capacity(rows.len());
        let mut source_names = SourceNameDictionary::with_capacity(rows.len());

        for row in rows {
            let (Some(id), Some(name)) = (
                field_as_string(&row, "id"),
                field_as_string(&row, "name"),
            ) else {
                warn!("Skipping {} row without id or name: {:?}", MANUFACTURER_TABLE, row);
                continue;
            };

            if source_names.contains_key(&id) {
                warn!("Skipping duplicate manufacturer id {} in source", id);
                continue;
            }
            source_names.insert(id.clone(), name.clone());

            let destination = confirmed.get(&id).cloned().unwrap_or_default();
            entities.push(PremappingEntity::new(id, name, destination));
        }

        Ok((entities, source_names))
    }

    /// Read all destination manufacturers as choices sorted by name.
    async fn read_choices(
        &self,
        context: &Context,
    ) -> Result<(Vec<PremappingChoice>, PreselectionDictionary)> {
        let criteria = Criteria::new().add_sorting(FieldSorting::ascending("name"));
        let mut manufacturers = self.manufacturer_repo.search(&criteria, context).await?;
        manufacturers.sort_by(|a, b| collate(&a.name, &b.name));

        let mut dictionary = PreselectionDictionary::with_capacity(manufacturers.len());
        let choices = manufacturers
            .into_iter()
            .map(|manufacturer| {
                dictionary.insert(manufacturer.name.clone(), manufacturer.id.clone());
                PremappingChoice::new(manufacturer.id, manufacturer.name)
            })
            .collect();

        Ok((choices, dictionary))
    }

    /// Preselect destinations for entries that are still empty.
    ///
    /// Returns the number of preselected entries.
    fn set_preselection(
        &self,
        entities: &mut [PremappingEntity],
        source_names: &SourceNameDictionary,
        dictionary: &PreselectionDictionary,
    ) -> usize {
        let mut preselected = 0;
        for entity in entities.iter_mut().filter(|e| !e.is_resolved()) {
            let Some(source_name) = source_names.get(&entity.source_id) else {
                continue;
            };
            if let Some(uuid) = self.preselection_value(source_name, dictionary) {
                debug!(
                    "Preselected {} for manufacturer {} ({})",
                    uuid, entity.source_id, source_name
                );
                entity.destination_uuid = uuid.to_string();
                preselected += 1;
            }
        }
        preselected
    }

    fn preselection_value<'a>(
        &self,
        source_name: &str,
        dictionary: &'a PreselectionDictionary,
    ) -> Option<&'a str> {
        if source_name != self.preselection.source_name {
            return None;
        }
        dictionary
            .get(&self.preselection.destination_name)
            .map(String::as_str)
    }
}

#[async_trait]
impl PremappingReader for ManufacturerReader {
    fn mapping_name(&self) -> &str {
        MANUFACTURER_MAPPING_NAME
    }

    fn supports(&self, migration_context: &MigrationContext, entity_groups: &[String]) -> bool {
        migration_context.profile().family() == ProfileFamily::Shopware
            && entity_groups.iter().any(|g| g == PRODUCT_DATA_SELECTION)
    }

    async fn get_premapping(
        &self,
        context: &Context,
        migration_context: &MigrationContext,
    ) -> Result<PremappingTable> {
        let confirmed = self
            .persistence
            .load_confirmed(migration_context.connection_id(), MANUFACTURER_MAPPING_NAME)
            .await?;

        let (mut mapping, source_names) = self
            .read_source_entities(migration_context, &confirmed)
            .await?;
        let (choices, dictionary) = self.read_choices(context).await?;
        let preselected = self.set_preselection(&mut mapping, &source_names, &dictionary);

        let unresolved = mapping.iter().filter(|e| !e.is_resolved()).count();
        info!(
            "Manufacturer premapping for {}: {} source entries ({} confirmed, {} preselected, {} open), {} choices",
            migration_context.connection_id(),
            mapping.len(),
            mapping.len() - preselected - unresolved,
            preselected,
            unresolved,
            choices.len()
        );

        Ok(PremappingTable::new(
            MANUFACTURER_MAPPING_NAME,
            mapping,
            choices,
        ))
    }
}
