//! Remote schema: field descriptors and typed casting
//!
//! Fields are fetched per call from `{resource}/schema_fields` and are not
//! cached by the adapter.

mod cast;
mod field;

pub use cast::CastValue;
pub use field::{decode_fields, primary_key, FieldDescriptor, FieldType};
