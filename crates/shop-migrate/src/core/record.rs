//! Record types exchanged between the source gateway and converters.
//!
//! Source rows are untyped JSON objects; converters turn them into
//! destination-shaped objects plus the leftover fields they could not map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An untyped field name → value object.
pub type Record = Map<String, Value>;

/// One row read from the source system.
pub type SourceRecord = Record;

/// Output of a single conversion call.
///
/// Holds the destination-shaped fields and the subset of source fields that
/// could not be mapped. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConvertedRecord {
    converted: Record,
    unmapped: Record,
}

impl ConvertedRecord {
    /// Create a converted record from its two halves.
    pub fn new(converted: Record, unmapped: Record) -> Self {
        Self {
            converted,
            unmapped,
        }
    }

    /// Destination-shaped fields.
    pub fn converted(&self) -> &Record {
        &self.converted
    }

    /// Source fields that could not be mapped.
    pub fn unmapped(&self) -> &Record {
        &self.unmapped
    }

    /// Split into `(converted, unmapped)`.
    pub fn into_parts(self) -> (Record, Record) {
        (self.converted, self.unmapped)
    }
}

/// Render a JSON scalar as an identifier string.
///
/// Source systems hand out ids as strings or integers depending on the
/// table, so both are accepted. Anything else is not an identifier.
pub fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a string field from a record, rendering numbers as text.
pub fn field_as_string(record: &Record, field: &str) -> Option<String> {
    record.get(field).and_then(value_as_id)
}
