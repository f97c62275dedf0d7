//! Source gateway backed by a JSON table dump.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::core::{Gateway, MigrationContext, SourceRecord};
use crate::error::{MigrateError, Result};

/// Source tables loaded from a JSON object of `table name → [rows]`.
///
/// ```json
/// {
///   "s_articles_supplier": [{"id": "7", "name": "Shopware"}],
///   "s_articles": [{"id": "1", "name": "Chair", "manufacturer": {"id": "7"}}]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceDump {
    tables: HashMap<String, Vec<SourceRecord>>,
}

impl SourceDump {
    /// Create an empty dump.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table.
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<SourceRecord>) -> Self {
        self.tables.insert(name.into(), rows);
        self
    }

    /// Load a dump from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a dump from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: HashMap<String, Vec<SourceRecord>> = serde_json::from_str(json)?;
        Ok(Self { tables })
    }
}

#[async_trait]
impl Gateway for SourceDump {
    async fn read_table(
        &self,
        migration_context: &MigrationContext,
        table_name: &str,
    ) -> Result<Vec<SourceRecord>> {
        let rows = self
            .tables
            .get(table_name)
            .ok_or_else(|| MigrateError::gateway(table_name, "table not present in source dump"))?;

        debug!(
            "Read {} rows from {} for connection {}",
            rows.len(),
            table_name,
            migration_context.connection_id()
        );
        Ok(rows.clone())
    }
}
