//! Table-driven field mapping converter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{
    field_as_string, Context, ConvertedRecord, Converter, MigrationContext, ProfileFamily, Record,
    SourceRecord,
};
use crate::error::{MigrateError, Result};

/// Converter that renames configured source fields and reports every other
/// field as unmapped.
#[derive(Debug, Clone)]
pub struct FieldMapConverter {
    /// source field → destination field
    fields: BTreeMap<String, String>,
    /// Destination field holding media ids, if any.
    media_field: Option<String>,
    family: ProfileFamily,
}

impl FieldMapConverter {
    /// Converter for Shopware source records.
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self {
            fields,
            media_field: None,
            family: ProfileFamily::Shopware,
        }
    }

    /// Report media ids found in `field` of converted records.
    pub fn with_media_field(mut self, field: impl Into<String>) -> Self {
        self.media_field = Some(field.into());
        self
    }
}

#[async_trait]
impl Converter for FieldMapConverter {
    fn supports(&self, migration_context: &MigrationContext) -> bool {
        migration_context.profile().family() == self.family
    }

    fn source_identifier(&self, record: &SourceRecord) -> String {
        field_as_string(record, "id").unwrap_or_default()
    }

    fn media_uuids(&self, converted: &[Record]) -> Option<Vec<String>> {
        let field = self.media_field.as_deref()?;
        let mut uuids = Vec::new();
        for record in converted {
            match record.get(field) {
                Some(Value::String(id)) => uuids.push(id.clone()),
                Some(Value::Array(ids)) => {
                    uuids.extend(ids.iter().filter_map(Value::as_str).map(str::to_string))
                }
                _ => {}
            }
        }
        Some(uuids)
    }

    async fn convert(
        &self,
        record: SourceRecord,
        _context: &Context,
        _migration_context: &MigrationContext,
    ) -> Result<ConvertedRecord> {
        if field_as_string(&record, "id").is_none() {
            return Err(MigrateError::conversion(
                "<unknown>",
                "source record has no id field",
            ));
        }

        let mut converted = Record::new();
        let mut unmapped = Record::new();
        for (field, value) in record {
            match self.fields.get(&field) {
                Some(destination) => {
                    converted.insert(destination.clone(), value);
                }
                None => {
                    unmapped.insert(field, value);
                }
            }
        }
        Ok(ConvertedRecord::new(converted, unmapped))
    }
}
