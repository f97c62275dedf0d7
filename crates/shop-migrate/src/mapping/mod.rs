//! File-based identifier mapping store.
//!
//! Stores operator-confirmed premapping per connection and mapping name in a
//! single JSON file. The store implements both [`MappingResolver`] (used by
//! converters at conversion time) and [`MappingPersistence`] (used by
//! premapping readers to carry confirmations across runs).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::{
    ConnectionPremappingIndex, Context, Mapping, MappingPersistence, MappingResolver,
    PremappingTable,
};
use crate::error::{MigrateError, Result};

/// A confirmed destination for one source id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Destination identifier.
    pub destination_uuid: String,
    /// When the operator confirmed this entry.
    pub confirmed_at: DateTime<Utc>,
}

/// source id → entry
type EntryMap = BTreeMap<String, MappingEntry>;

/// On-disk layout: connection id → mapping name → source id → entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MappingFile {
    #[serde(default)]
    connections: BTreeMap<String, BTreeMap<String, EntryMap>>,
}

impl MappingFile {
    fn entries(&self, connection_id: &str, mapping_name: &str) -> Option<&EntryMap> {
        self.connections
            .get(connection_id)
            .and_then(|names| names.get(mapping_name))
    }
}

/// JSON file mapping store.
///
/// Without a path the store lives in memory only, which is what tests and
/// dry runs use.
#[derive(Debug)]
pub struct JsonMappingStore {
    path: Option<PathBuf>,
    data: RwLock<MappingFile>,
}

impl JsonMappingStore {
    /// Create an empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(MappingFile::default()),
        }
    }

    /// Open a store file. A missing file yields an empty store that is
    /// created on the first save.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                MigrateError::Mapping(format!(
                    "failed to parse mapping store {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            debug!("Mapping store {} does not exist yet", path.display());
            MappingFile::default()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            data: RwLock::new(data),
        })
    }

    /// Persist operator-confirmed premapping tables for a connection.
    ///
    /// Every resolved entity is stored as confirmed; an entity sent back with
    /// an empty destination drops its previous confirmation. Returns the
    /// number of confirmed entries across all tables.
    pub async fn save_premapping(
        &self,
        connection_id: &str,
        tables: &[PremappingTable],
    ) -> Result<usize> {
        let now = Utc::now();
        let mut confirmed = 0;

        // Changes are applied to a copy and only become visible once persisted.
        let mut data = self.data.write().await;
        let mut updated = data.clone();
        let names = updated
            .connections
            .entry(connection_id.to_string())
            .or_default();

        for table in tables {
            let entries = names.entry(table.entity.clone()).or_default();
            for entity in &table.mapping {
                if !entity.is_resolved() {
                    entries.remove(&entity.source_id);
                    continue;
                }

                confirmed += 1;
                let unchanged = entries
                    .get(&entity.source_id)
                    .is_some_and(|e| e.destination_uuid == entity.destination_uuid);
                if !unchanged {
                    entries.insert(
                        entity.source_id.clone(),
                        MappingEntry {
                            destination_uuid: entity.destination_uuid.clone(),
                            confirmed_at: now,
                        },
                    );
                }
            }
        }

        self.persist(&updated)?;
        *data = updated;
        drop(data);

        info!(
            "Saved {} confirmed premapping entries for connection {}",
            confirmed, connection_id
        );
        Ok(confirmed)
    }

    /// Write the store to disk (atomic write). No-op for in-memory stores.
    pub async fn flush(&self) -> Result<()> {
        let data = self.data.read().await;
        self.persist(&data)
    }

    fn persist(&self, data: &MappingFile) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let content = serde_json::to_string_pretty(data)?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, &content)?;
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Confirmed entry for one source id.
    pub async fn entry(
        &self,
        connection_id: &str,
        mapping_name: &str,
        source_id: &str,
    ) -> Option<MappingEntry> {
        let data = self.data.read().await;
        data.entries(connection_id, mapping_name)
            .and_then(|entries| entries.get(source_id))
            .cloned()
    }
}

#[async_trait]
impl MappingResolver for JsonMappingStore {
    async fn get_mapping(
        &self,
        connection_id: &str,
        mapping_name: &str,
        source_id: &str,
        _context: &Context,
    ) -> Result<Option<Mapping>> {
        Ok(self
            .entry(connection_id, mapping_name, source_id)
            .await
            .map(|e| Mapping {
                entity_uuid: e.destination_uuid,
            }))
    }
}

#[async_trait]
impl MappingPersistence for JsonMappingStore {
    async fn load_confirmed(
        &self,
        connection_id: &str,
        mapping_name: &str,
    ) -> Result<ConnectionPremappingIndex> {
        let data = self.data.read().await;
        Ok(data
            .entries(connection_id, mapping_name)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(id, e)| (id.clone(), e.destination_uuid.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
