pub mod decoder;
pub mod value;

pub use decoder::{DecodedResponse, LIST_SEPARATOR, RawRow, decode};
pub use value::Value;

#[cfg(test)]
mod value_test;
