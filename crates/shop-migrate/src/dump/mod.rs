//! Dump-backed source and destination collaborators.
//!
//! These let the converter and premapping readers run against JSON exports
//! instead of a live shop connection.

mod destination;
mod source;

pub use destination::DestinationDump;
pub use source::SourceDump;
