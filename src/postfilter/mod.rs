pub mod builtin;
pub mod pipeline;

pub use builtin::{DetectNumbers, EmptyToNull};
pub use pipeline::{NamedFilter, PostFilter, PostFilterError, apply_row, apply_rows, named};
