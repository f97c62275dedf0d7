//! Product converter decorator resolving manufacturer references.
//!
//! The wrapped product converter knows nothing about premapped
//! manufacturers. This decorator pulls the nested `manufacturer` sub-record
//! out of each product before the wrapped converter sees it, resolves the
//! manufacturer's source id through the mapping store, and patches the
//! resolved destination id into the converted output.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::core::{
    value_as_id, Context, ConvertedRecord, Converter, MappingResolver, MigrationContext, Record,
    SourceRecord,
};
use crate::error::Result;
use crate::premapping::MANUFACTURER_MAPPING_NAME;

/// Source field holding the nested manufacturer sub-record.
pub const MANUFACTURER_FIELD: &str = "manufacturer";

/// Destination foreign-key field for the manufacturer.
pub const MANUFACTURER_ID_FIELD: &str = "manufacturerId";

/// Wraps a product converter and resolves `manufacturer.id` through
/// premapping.
///
/// Every capability except [`convert`](Converter::convert) is forwarded to
/// the wrapped converter unchanged.
pub struct DecoratedProductConverter<C> {
    inner: C,
    mapping_resolver: Arc<dyn MappingResolver>,
}

impl<C: Converter> DecoratedProductConverter<C> {
    /// Decorate `inner`, resolving manufacturers through `mapping_resolver`.
    pub fn new(inner: C, mapping_resolver: Arc<dyn MappingResolver>) -> Self {
        Self {
            inner,
            mapping_resolver,
        }
    }

    /// The wrapped converter.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

/// Source id of the nested manufacturer, if the record carries one.
pub(crate) fn manufacturer_source_id(record: &SourceRecord) -> Option<String> {
    record
        .get(MANUFACTURER_FIELD)
        .and_then(|manufacturer| manufacturer.get("id"))
        .and_then(value_as_id)
}

#[async_trait]
impl<C: Converter> Converter for DecoratedProductConverter<C> {
    fn supports(&self, migration_context: &MigrationContext) -> bool {
        self.inner.supports(migration_context)
    }

    fn source_identifier(&self, record: &SourceRecord) -> String {
        self.inner.source_identifier(record)
    }

    fn media_uuids(&self, converted: &[Record]) -> Option<Vec<String>> {
        self.inner.media_uuids(converted)
    }

    async fn write_mapping(&self, context: &Context) -> Result<()> {
        self.inner.write_mapping(context).await
    }

    async fn convert(
        &self,
        mut record: SourceRecord,
        context: &Context,
        migration_context: &MigrationContext,
    ) -> Result<ConvertedRecord> {
        let Some(manufacturer_id) = manufacturer_source_id(&record) else {
            return self.inner.convert(record, context, migration_context).await;
        };

        // The wrapped converter must never try to map the manufacturer itself.
        record.remove(MANUFACTURER_FIELD);

        let mapping = self
            .mapping_resolver
            .get_mapping(
                migration_context.connection_id(),
                MANUFACTURER_MAPPING_NAME,
                &manufacturer_id,
                context,
            )
            .await?;

        let record_id = self.inner.source_identifier(&record);
        let converted = self.inner.convert(record, context, migration_context).await?;

        let Some(mapping) = mapping else {
            debug!(
                "No premapping for manufacturer {} of product {}, dropping the reference",
                manufacturer_id, record_id
            );
            return Ok(converted);
        };

        let (mut fields, unmapped) = converted.into_parts();
        fields.insert(
            MANUFACTURER_ID_FIELD.to_string(),
            Value::String(mapping.entity_uuid),
        );
        Ok(ConvertedRecord::new(fields, unmapped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Connection, PremappingEntity, PremappingTable, Profile};
    use crate::error::MigrateError;
    use crate::mapping::JsonMappingStore;
    use serde_json::json;
    use std::sync::Mutex;

    /// Copies every field into `converted` except `legacy_*`, which land in
    /// `unmapped`. Remembers every record it was handed.
    #[derive(Default)]
    struct RecordingConverter {
        seen: Mutex<Vec<SourceRecord>>,
        writes: Mutex<usize>,
    }

    #[async_trait]
    impl Converter for RecordingConverter {
        fn supports(&self, migration_context: &MigrationContext) -> bool {
            migration_context.profile().name() == "shopware55"
        }

        fn source_identifier(&self, record: &SourceRecord) -> String {
            record["id"].as_str().unwrap_or_default().to_string()
        }

        async fn write_mapping(&self, _context: &Context) -> Result<()> {
            *self.writes.lock().unwrap() += 1;
            Ok(())
        }

        async fn convert(
            &self,
            record: SourceRecord,
            _context: &Context,
            _migration_context: &MigrationContext,
        ) -> Result<ConvertedRecord> {
            self.seen.lock().unwrap().push(record.clone());
            let (unmapped, converted): (Record, Record) = record
                .into_iter()
                .partition(|(k, _)| k.starts_with("legacy_"));
            Ok(ConvertedRecord::new(converted, unmapped))
        }
    }

    struct FailingResolver;

    #[async_trait]
    impl MappingResolver for FailingResolver {
        async fn get_mapping(
            &self,
            _connection_id: &str,
            _mapping_name: &str,
            _source_id: &str,
            _context: &Context,
        ) -> Result<Option<crate::core::Mapping>> {
            Err(MigrateError::Mapping("store offline".into()))
        }
    }

    fn migration_ctx() -> MigrationContext {
        MigrationContext::new(Connection {
            id: "conn-1".into(),
            profile: Profile::new("shopware55"),
        })
    }

    async fn store_with(source_id: &str, destination: &str) -> Arc<JsonMappingStore> {
        let store = JsonMappingStore::in_memory();
        store
            .save_premapping(
                "conn-1",
                &[PremappingTable::new(
                    MANUFACTURER_MAPPING_NAME,
                    vec![PremappingEntity::new(source_id, "Shopware", destination)],
                    vec![],
                )],
            )
            .await
            .unwrap();
        Arc::new(store)
    }

    fn record(value: serde_json::Value) -> SourceRecord {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_without_manufacturer_delegates_unchanged() {
        let store = store_with("7", "u-123").await;
        let decorated = DecoratedProductConverter::new(RecordingConverter::default(), store);
        let plain = RecordingConverter::default();

        let input = record(json!({"id": "1", "name": "Chair", "legacy_flag": true}));
        let ctx = Context::default();
        let expected = plain.convert(input.clone(), &ctx, &migration_ctx()).await.unwrap();
        let actual = decorated.convert(input, &ctx, &migration_ctx()).await.unwrap();

        assert_eq!(actual, expected);
        assert!(!actual.converted().contains_key(MANUFACTURER_ID_FIELD));
    }

    #[tokio::test]
    async fn test_resolved_manufacturer_is_patched() {
        let store = store_with("7", "u-123").await;
        let decorated = DecoratedProductConverter::new(RecordingConverter::default(), store);

        let input = record(json!({
            "id": "1",
            "name": "Chair",
            "legacy_flag": true,
            "manufacturer": {"id": "7", "name": "Shopware"}
        }));
        let out = decorated
            .convert(input, &Context::default(), &migration_ctx())
            .await
            .unwrap();

        assert_eq!(out.converted()[MANUFACTURER_ID_FIELD], "u-123");
        assert_eq!(out.converted()["name"], "Chair");
        assert!(!out.converted().contains_key(MANUFACTURER_FIELD));
        assert!(!out.unmapped().contains_key(MANUFACTURER_FIELD));
        assert_eq!(out.unmapped()["legacy_flag"], true);

        let seen = decorated.inner().seen.lock().unwrap();
        assert!(!seen[0].contains_key(MANUFACTURER_FIELD));
    }

    #[tokio::test]
    async fn test_numeric_manufacturer_id() {
        let store = store_with("7", "u-123").await;
        let decorated = DecoratedProductConverter::new(RecordingConverter::default(), store);

        let input = record(json!({"id": "1", "manufacturer": {"id": 7}}));
        let out = decorated
            .convert(input, &Context::default(), &migration_ctx())
            .await
            .unwrap();
        assert_eq!(out.converted()[MANUFACTURER_ID_FIELD], "u-123");
    }

    #[tokio::test]
    async fn test_unresolved_manufacturer_is_dropped() {
        let store = store_with("7", "u-123").await;
        let decorated = DecoratedProductConverter::new(RecordingConverter::default(), store);
        let plain = RecordingConverter::default();

        let input = record(json!({"id": "2", "name": "Desk", "manufacturer": {"id": "8"}}));
        let mut stripped = input.clone();
        stripped.remove(MANUFACTURER_FIELD);

        let ctx = Context::default();
        let expected = plain.convert(stripped, &ctx, &migration_ctx()).await.unwrap();
        let actual = decorated.convert(input, &ctx, &migration_ctx()).await.unwrap();

        assert_eq!(actual, expected);
        assert!(!actual.converted().contains_key(MANUFACTURER_ID_FIELD));
    }

    #[tokio::test]
    async fn test_null_manufacturer_id_is_not_a_reference() {
        let store = store_with("7", "u-123").await;
        let decorated = DecoratedProductConverter::new(RecordingConverter::default(), store);

        let input = record(json!({"id": "3", "manufacturer": {"id": null}}));
        let out = decorated
            .convert(input, &Context::default(), &migration_ctx())
            .await
            .unwrap();
        assert!(out.converted().contains_key(MANUFACTURER_FIELD));
        assert!(!out.converted().contains_key(MANUFACTURER_ID_FIELD));
    }

    #[tokio::test]
    async fn test_resolver_error_propagates() {
        let decorated =
            DecoratedProductConverter::new(RecordingConverter::default(), Arc::new(FailingResolver));
        let input = record(json!({"id": "1", "manufacturer": {"id": "7"}}));
        let err = decorated
            .convert(input, &Context::default(), &migration_ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, MigrateError::Mapping(_)));
    }

    #[tokio::test]
    async fn test_capabilities_are_forwarded() {
        let store = store_with("7", "u-123").await;
        let decorated = DecoratedProductConverter::new(RecordingConverter::default(), store);

        assert!(decorated.supports(&migration_ctx()));
        let other = MigrationContext::new(Connection {
            id: "conn-1".into(),
            profile: Profile::new("shopware54"),
        });
        assert!(!decorated.supports(&other));

        assert_eq!(decorated.source_identifier(&record(json!({"id": "42"}))), "42");
        assert_eq!(decorated.media_uuids(&[]), None);

        decorated.write_mapping(&Context::default()).await.unwrap();
        assert_eq!(*decorated.inner().writes.lock().unwrap(), 1);
    }
}
