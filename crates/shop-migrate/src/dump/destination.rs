//! Destination repository backed by a JSON entity list.

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;

use crate::core::{
    collate, Context, Criteria, DestinationEntity, DestinationRepository, SortDirection,
};
use crate::error::{MigrateError, Result};

/// Destination entities loaded from a JSON array of `{"id", "name"}`.
#[derive(Debug, Clone, Default)]
pub struct DestinationDump {
    entities: Vec<DestinationEntity>,
}

impl DestinationDump {
    pub fn new(entities: Vec<DestinationEntity>) -> Self {
        Self { entities }
    }

    /// Load entities from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse entities from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let entities: Vec<DestinationEntity> = serde_json::from_str(json)?;
        Ok(Self::new(entities))
    }
}

const SORTABLE_FIELDS: &[&str] = &["id", "name"];

fn compare_field(a: &DestinationEntity, b: &DestinationEntity, field: &str) -> Ordering {
    match field {
        "id" => a.id.cmp(&b.id),
        "name" => collate(&a.name, &b.name),
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DestinationRepository for DestinationDump {
    async fn search(
        &self,
        criteria: &Criteria,
        _context: &Context,
    ) -> Result<Vec<DestinationEntity>> {
        if let Some(sorting) = criteria
            .sortings
            .iter()
            .find(|s| !SORTABLE_FIELDS.contains(&s.field.as_str()))
        {
            return Err(MigrateError::Repository(format!(
                "cannot sort destination entities by unknown field '{}'",
                sorting.field
            )));
        }

        let mut entities = self.entities.clone();
        entities.sort_by(|a, b| {
            criteria
                .sortings
                .iter()
                .map(|sorting| {
                    let ord = compare_field(a, b, &sorting.field);
                    match sorting.direction {
                        SortDirection::Ascending => ord,
                        SortDirection::Descending => ord.reverse(),
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(entities)
    }
}
