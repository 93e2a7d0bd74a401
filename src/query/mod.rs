pub mod encoder;
pub mod errors;
pub mod filter;
pub mod model;

pub use encoder::{encode, encode_text};
pub use errors::QueryError;
pub use filter::{FilterExpr, FilterOp};
pub use model::{Query, TimeFormat};

#[cfg(test)]
mod encoder_test;
#[cfg(test)]
mod filter_test;
