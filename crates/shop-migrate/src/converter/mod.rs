//! Record converters.
//!
//! - [`DecoratedProductConverter`]: wraps any product converter and resolves
//!   manufacturer references through premapping
//! - [`FieldMapConverter`]: plain field-renaming converter used as the
//!   wrapped converter when no engine-provided one is available

mod decorated;
mod field_map;

pub(crate) use decorated::manufacturer_source_id;
pub use decorated::{DecoratedProductConverter, MANUFACTURER_FIELD, MANUFACTURER_ID_FIELD};
pub use field_map::FieldMapConverter;
