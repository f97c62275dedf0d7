//! Collaborator traits for record conversion and premapping.
//!
//! This module defines the seams between this crate and the surrounding
//! migration engine:
//!
//! - [`Converter`]: turns one source record into a destination record
//! - [`Gateway`]: reads raw tables from the source system
//! - [`DestinationRepository`]: searches destination-side entities
//! - [`MappingResolver`]: looks up established source → destination ids
//! - [`MappingPersistence`]: loads operator-confirmed premapping overrides
//! - [`PremappingReader`]: builds the operator-facing premapping table
//!
//! # Design Patterns
//!
//! - **Decorator**: converters can wrap other converters and forward every
//!   capability they do not change
//! - **Strategy**: gateways, repositories and mapping stores are swappable
//!   backends behind `Arc<dyn ...>`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::context::{Context, MigrationContext};
use super::premapping::{ConnectionPremappingIndex, PremappingTable};
use super::record::{ConvertedRecord, Record, SourceRecord};

/// Converts source records of one entity type into the destination schema.
///
/// Only [`convert`](Converter::convert), [`supports`](Converter::supports)
/// and [`source_identifier`](Converter::source_identifier) are mandatory.
/// Media extraction and mapping flushes are optional capabilities; the
/// defaults report "nothing to do".
#[async_trait]
pub trait Converter: Send + Sync {
    /// Whether this converter handles records of the given migration.
    fn supports(&self, migration_context: &MigrationContext) -> bool;

    /// Identifier of a source record, used for logging and mapping keys.
    fn source_identifier(&self, record: &SourceRecord) -> String;

    /// Media identifiers referenced by already converted records.
    ///
    /// Returns `None` when the converter does not extract media at all.
    fn media_uuids(&self, _converted: &[Record]) -> Option<Vec<String>> {
        None
    }

    /// Flush identifier mappings created while converting.
    async fn write_mapping(&self, _context: &Context) -> Result<()> {
        Ok(())
    }

    /// Convert one source record.
    async fn convert(
        &self,
        record: SourceRecord,
        context: &Context,
        migration_context: &MigrationContext,
    ) -> Result<ConvertedRecord>;
}

/// Source-system table reader.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Read every row of a source table.
    ///
    /// Rows carry at least `id` and `name` for the entities premapping uses.
    async fn read_table(
        &self,
        migration_context: &MigrationContext,
        table_name: &str,
    ) -> Result<Vec<SourceRecord>>;
}

/// Sort direction for a [`FieldSorting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort on one entity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSorting {
    pub field: String,
    pub direction: SortDirection,
}

impl FieldSorting {
    /// Ascending sort on `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }
}

/// Search criteria for a [`DestinationRepository`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub sortings: Vec<FieldSorting>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sorting; earlier sortings take precedence.
    pub fn add_sorting(mut self, sorting: FieldSorting) -> Self {
        self.sortings.push(sorting);
        self
    }
}

/// A destination-side entity candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationEntity {
    pub id: String,
    pub name: String,
}

/// Destination-side entity search.
#[async_trait]
pub trait DestinationRepository: Send + Sync {
    async fn search(&self, criteria: &Criteria, context: &Context)
        -> Result<Vec<DestinationEntity>>;
}

/// An established source → destination identifier mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub entity_uuid: String,
}

/// Lookup of established identifier mappings.
#[async_trait]
pub trait MappingResolver: Send + Sync {
    /// Destination mapping for `(connection, mapping name, source id)`, or
    /// `None` when no mapping exists yet.
    async fn get_mapping(
        &self,
        connection_id: &str,
        mapping_name: &str,
        source_id: &str,
        context: &Context,
    ) -> Result<Option<Mapping>>;
}

/// Read side of operator-confirmed premapping overrides.
#[async_trait]
pub trait MappingPersistence: Send + Sync {
    async fn load_confirmed(
        &self,
        connection_id: &str,
        mapping_name: &str,
    ) -> Result<ConnectionPremappingIndex>;
}

/// Builds the premapping table for one foreign-entity type.
#[async_trait]
pub trait PremappingReader: Send + Sync {
    /// Mapping name the produced table is stored under.
    fn mapping_name(&self) -> &str;

    /// Whether this reader applies to the migration and selected entity groups.
    fn supports(&self, migration_context: &MigrationContext, entity_groups: &[String]) -> bool;

    /// Build the premapping table.
    async fn get_premapping(
        &self,
        context: &Context,
        migration_context: &MigrationContext,
    ) -> Result<PremappingTable>;
}
