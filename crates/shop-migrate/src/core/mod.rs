//! Core abstractions for record conversion and premapping.
//!
//! This module provides the foundational types and traits used throughout
//! the crate:
//!
//! - [`record`]: untyped source records and converted output
//! - [`context`]: connection, profile and run context
//! - [`premapping`]: operator-facing premapping tables
//! - [`traits`]: collaborator traits (converter, gateway, repository, mapping)
//!
//! # Architecture
//!
//! The core module only defines contracts. Concrete behavior lives in the
//! `converter`, `premapping`, `mapping` and `dump` modules, and the
//! surrounding migration engine can supply its own implementations of every
//! trait.

pub mod context;
pub mod premapping;
pub mod record;
pub mod traits;

// Re-export commonly used types for convenience
pub use context::{Connection, Context, MigrationContext, Profile, ProfileFamily};
pub use premapping::{
    collate, ConnectionPremappingIndex, PremappingChoice, PremappingEntity, PremappingTable,
};
pub use record::{field_as_string, value_as_id, ConvertedRecord, Record, SourceRecord};
pub use traits::{
    Converter, Criteria, DestinationEntity, DestinationRepository, FieldSorting, Gateway,
    Mapping, MappingPersistence, MappingResolver, PremappingReader, SortDirection,
};
