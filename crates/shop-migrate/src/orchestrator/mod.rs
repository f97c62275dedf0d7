//! Migration assistant workflow coordinator.
//!
//! Wires the configured collaborators together and exposes the three steps
//! an operator drives: build premapping, confirm premapping, convert.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::convert::{convert_all, ConversionStats};
use crate::converter::{DecoratedProductConverter, FieldMapConverter};
use crate::core::{
    Context, ConvertedRecord, Converter, Gateway, MigrationContext, PremappingTable,
};
use crate::dump::{DestinationDump, SourceDump};
use crate::error::{MigrateError, Result};
use crate::mapping::JsonMappingStore;
use crate::premapping::{ManufacturerReader, PremappingRegistry};

/// Migration assistant orchestrator.
pub struct Orchestrator {
    config: Config,
    gateway: Arc<SourceDump>,
    store: Arc<JsonMappingStore>,
    registry: PremappingRegistry,
    converter: DecoratedProductConverter<FieldMapConverter>,
}

/// Result of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    /// Connection the records were converted for.
    pub connection_id: String,

    /// Converted records in source order.
    pub records: Vec<ConvertedRecord>,

    /// Media ids referenced by the converted records, if the converter
    /// extracts media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_uuids: Option<Vec<String>>,

    /// Conversion statistics.
    pub stats: ConversionStats,
}

impl ConversionResult {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What a run would do with the current configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub connection_id: String,
    pub profile: String,
    pub selection: Vec<String>,
    /// Mapping names premapping would be built for.
    pub premappings: Vec<String>,
    /// Whether the product converter supports the profile.
    pub converter_supported: bool,
}

impl Orchestrator {
    /// Create an orchestrator from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let gateway = Arc::new(SourceDump::load(&config.source.dump)?);
        let destination = Arc::new(DestinationDump::load(&config.destination.dump)?);
        let store = Arc::new(JsonMappingStore::open(&config.mapping.store)?);
        Ok(Self::with_collaborators(config, gateway, destination, store))
    }

    /// Create an orchestrator from already loaded collaborators.
    pub fn with_collaborators(
        config: Config,
        gateway: Arc<SourceDump>,
        destination: Arc<DestinationDump>,
        store: Arc<JsonMappingStore>,
    ) -> Self {
        let mut reader =
            ManufacturerReader::new(gateway.clone(), destination, store.clone());
        if let Some(rule) = &config.premapping.preselection {
            reader = reader.with_preselection(rule.clone());
        }
        let mut registry = PremappingRegistry::new();
        registry.register(Arc::new(reader));

        let mut inner = FieldMapConverter::new(config.conversion.fields.clone());
        if let Some(field) = &config.conversion.media_field {
            inner = inner.with_media_field(field.clone());
        }
        let converter = DecoratedProductConverter::new(inner, store.clone());

        Self {
            config,
            gateway,
            store,
            registry,
            converter,
        }
    }

    /// Migration context for the configured connection.
    pub fn migration_context(&self) -> MigrationContext {
        MigrationContext::new(self.config.connection.to_connection())
    }

    /// Describe what would run.
    pub fn plan(&self) -> Plan {
        let migration_context = self.migration_context();
        let premappings = self
            .registry
            .readers_for(&migration_context, &self.config.selection)
            .map(|r| r.mapping_name().to_string())
            .collect();

        Plan {
            connection_id: self.config.connection.id.clone(),
            profile: self.config.connection.profile.clone(),
            selection: self.config.selection.clone(),
            premappings,
            converter_supported: self.converter.supports(&migration_context),
        }
    }

    /// Build premapping tables for the configured selection.
    pub async fn premapping(&self) -> Result<Vec<PremappingTable>> {
        let migration_context = self.migration_context();
        self.registry
            .premapping(
                &Context::default(),
                &migration_context,
                &self.config.selection,
            )
            .await
    }

    /// Persist operator-confirmed premapping tables.
    ///
    /// Tables for mapping names no registered reader produces are rejected.
    pub async fn confirm(&self, tables: &[PremappingTable]) -> Result<usize> {
        let migration_context = self.migration_context();
        let known: Vec<_> = self
            .registry
            .readers_for(&migration_context, &self.config.selection)
            .map(|r| r.mapping_name().to_string())
            .collect();

        if let Some(table) = tables.iter().find(|t| !known.contains(&t.entity)) {
            return Err(MigrateError::Mapping(format!(
                "no premapping reader for '{}' in the current selection",
                table.entity
            )));
        }

        self.store
            .save_premapping(migration_context.connection_id(), tables)
            .await
    }

    /// Convert every row of the configured product table.
    pub async fn convert(&self) -> Result<ConversionResult> {
        self.convert_table(&self.config.source.product_table).await
    }

    /// Convert every row of `table` instead of the configured product table.
    pub async fn convert_table(&self, table: &str) -> Result<ConversionResult> {
        let migration_context = self.migration_context();
        let context = Context::default();
        let rows = self.gateway.read_table(&migration_context, table).await?;
        info!("Converting {} rows from {}", rows.len(), table);

        let output = convert_all(&self.converter, rows, &context, &migration_context).await?;

        let converted: Vec<_> = output
            .records
            .iter()
            .map(|r| r.converted().clone())
            .collect();
        let media_uuids = self.converter.media_uuids(&converted);

        Ok(ConversionResult {
            connection_id: migration_context.connection_id().to_string(),
            records: output.records,
            media_uuids,
            stats: output.stats,
        })
    }
}
