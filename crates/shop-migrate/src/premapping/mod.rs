//! Premapping readers and the registry that runs them.
//!
//! A premapping reader produces an editable `source id → destination id`
//! table for one foreign-entity type. The [`PremappingRegistry`] collects
//! the tables of every reader that applies to the selected data.

mod manufacturer;

use std::sync::Arc;

use tracing::debug;

use crate::core::{Context, MigrationContext, PremappingReader, PremappingTable};
use crate::error::Result;

pub use manufacturer::{
    ManufacturerReader, PreselectionRule, MANUFACTURER_MAPPING_NAME, MANUFACTURER_TABLE,
    PRODUCT_DATA_SELECTION,
};

/// Ordered set of premapping readers.
#[derive(Default)]
pub struct PremappingRegistry {
    readers: Vec<Arc<dyn PremappingReader>>,
}

impl PremappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reader. Tables are returned in registration order.
    pub fn register(&mut self, reader: Arc<dyn PremappingReader>) {
        self.readers.push(reader);
    }

    /// Readers that apply to the migration and selected entity groups.
    pub fn readers_for<'a>(
        &'a self,
        migration_context: &'a MigrationContext,
        entity_groups: &'a [String],
    ) -> impl Iterator<Item = &'a Arc<dyn PremappingReader>> + 'a {
        self.readers
            .iter()
            .filter(move |r| r.supports(migration_context, entity_groups))
    }

    /// Build premapping tables for every applicable reader.
    pub async fn premapping(
        &self,
        context: &Context,
        migration_context: &MigrationContext,
        entity_groups: &[String],
    ) -> Result<Vec<PremappingTable>> {
        let mut tables = Vec::new();
        for reader in self.readers_for(migration_context, entity_groups) {
            debug!("Building premapping {}", reader.mapping_name());
            tables.push(reader.get_premapping(context, migration_context).await?);
        }
        Ok(tables)
    }
}
