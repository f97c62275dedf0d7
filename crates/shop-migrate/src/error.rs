//! Error types for the migration library.

use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for source gateway failures.
pub const EXIT_GATEWAY_ERROR: u8 = 3;
/// Exit code for destination repository failures.
pub const EXIT_REPOSITORY_ERROR: u8 = 4;
/// Exit code for mapping store failures.
pub const EXIT_MAPPING_ERROR: u8 = 5;
/// Exit code for conversion failures.
pub const EXIT_CONVERSION_ERROR: u8 = 6;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source system read failed
    #[error("Gateway error reading {table}: {message}")]
    Gateway { table: String, message: String },

    /// Destination repository search failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// Mapping store read or write failed
    #[error("Mapping store error: {0}")]
    Mapping(String),

    /// A wrapped converter rejected a record
    #[error("Conversion failed for record {record}: {message}")]
    Conversion { record: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create a Gateway error for a specific source table
    pub fn gateway(table: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Gateway {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a Conversion error
    pub fn conversion(record: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Conversion {
            record: record.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrateError::Config(_) | MigrateError::Yaml(_) => EXIT_CONFIG_ERROR,
            MigrateError::Gateway { .. } => EXIT_GATEWAY_ERROR,
            MigrateError::Repository(_) => EXIT_REPOSITORY_ERROR,
            MigrateError::Mapping(_) => EXIT_MAPPING_ERROR,
            MigrateError::Conversion { .. } | MigrateError::Json(_) => EXIT_CONVERSION_ERROR,
            MigrateError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
