//! Sequential conversion of a batch of source records.
//!
//! Batching and pagination belong to the engine driving the migration; this
//! module only converts the records it is handed, one at a time, and keeps
//! the counts an engine reports in its run statistics.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::converter::{manufacturer_source_id, MANUFACTURER_ID_FIELD};
use crate::core::{Context, ConvertedRecord, Converter, MigrationContext, SourceRecord};
use crate::error::Result;

/// Statistics from one conversion batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Records handed to the converter.
    pub records: usize,

    /// Records converted.
    pub converted: usize,

    /// Records that referenced a manufacturer the mapping could not resolve.
    pub unresolved_references: usize,

    /// Source ids of the records with unresolved references.
    pub unresolved_record_ids: Vec<String>,

    /// Time spent converting.
    #[serde(skip)]
    pub convert_time: Duration,
}

/// Converted batch plus its statistics.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutput {
    pub records: Vec<ConvertedRecord>,
    pub stats: ConversionStats,
}

/// Convert `records` with `converter`, then flush its mappings once.
///
/// Returns an empty output when the converter does not support the
/// migration. A converter error aborts the batch.
pub async fn convert_all<C: Converter + ?Sized>(
    converter: &C,
    records: Vec<SourceRecord>,
    context: &Context,
    migration_context: &MigrationContext,
) -> Result<ConversionOutput> {
    let mut output = ConversionOutput::default();
    output.stats.records = records.len();

    if !converter.supports(migration_context) {
        info!(
            "Converter does not support profile {}, skipping {} records",
            migration_context.profile().name(),
            records.len()
        );
        return Ok(output);
    }

    let start = Instant::now();
    for record in records {
        let had_reference = manufacturer_source_id(&record).is_some();
        let record_id = converter.source_identifier(&record);

        let converted = converter.convert(record, context, migration_context).await?;

        if had_reference && !converted.converted().contains_key(MANUFACTURER_ID_FIELD) {
            debug!("Record {} lost its manufacturer reference", record_id);
            output.stats.unresolved_references += 1;
            output.stats.unresolved_record_ids.push(record_id);
        }
        output.records.push(converted);
        output.stats.converted += 1;
    }

    converter.write_mapping(context).await?;
    output.stats.convert_time = start.elapsed();

    info!(
        "Converted {}/{} records ({} unresolved manufacturer references) in {:?}",
        output.stats.converted,
        output.stats.records,
        output.stats.unresolved_references,
        output.stats.convert_time
    );
    Ok(output)
}
