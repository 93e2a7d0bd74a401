pub mod convert;
pub mod lookup;
pub mod types;

pub use convert::{TypeConversionError, convert_field, convert_rows, raw_values};
pub use lookup::{SCHEMA_TABLE, schema_query};
pub use types::{ColumnKind, ColumnTypes, SchemaCache};

#[cfg(test)]
mod lookup_test;
