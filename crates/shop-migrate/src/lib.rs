//! # shop-migrate
//!
//! Shop entity record conversion with premapping-based reference resolution.
//!
//! This library converts source-shop records (products) into the
//! destination schema and resolves cross-system references through an
//! operator-confirmed identifier mapping:
//!
//! - **Premapping** of source manufacturers against destination
//!   manufacturers, with deterministic preselection
//! - **Confirmed mappings** persisted per connection and reused across runs
//! - **Decorated conversion**: an existing product converter is wrapped and
//!   only the manufacturer reference is resolved on top of it
//!
//! ## Example
//!
//! ```rust,no_run
//! use shop_migrate::{Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> shop_migrate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let orchestrator = Orchestrator::new(config)?;
//!     let tables = orchestrator.premapping().await?;
//!     orchestrator.confirm(&tables).await?;
//!     let result = orchestrator.convert().await?;
//!     println!("Converted {} records", result.stats.converted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod convert;
pub mod converter;
pub mod core;
pub mod dump;
pub mod error;
pub mod mapping;
pub mod orchestrator;
pub mod premapping;

// Re-exports for convenient access
pub use config::Config;
pub use convert::{convert_all, ConversionOutput, ConversionStats};
pub use converter::{DecoratedProductConverter, FieldMapConverter};
pub use crate::core::{
    ConvertedRecord, Converter, MappingResolver, MigrationContext, PremappingReader,
    PremappingTable, SourceRecord,
};
pub use error::{MigrateError, Result};
pub use mapping::JsonMappingStore;
pub use orchestrator::{ConversionResult, Orchestrator, Plan};
pub use premapping::{ManufacturerReader, PremappingRegistry, PreselectionRule};
