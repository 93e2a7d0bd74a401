use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::response::Value;

/// A caller-supplied transform applied to every field after decoding.
///
/// Closures `Fn(Value) -> Result<Value, String>` implement this directly;
/// use [`named`] to give one a readable name for error messages.
pub trait PostFilter: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn apply(&self, value: Value) -> Result<Value, String>;
}

impl<F> PostFilter for F
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    fn apply(&self, value: Value) -> Result<Value, String> {
        self(value)
    }
}

pub struct NamedFilter<F> {
    name: String,
    func: F,
}

impl<F> PostFilter for NamedFilter<F>
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: Value) -> Result<Value, String> {
        (self.func)(value)
    }
}

pub fn named<F>(name: impl Into<String>, func: F) -> NamedFilter<F>
where
    F: Fn(Value) -> Result<Value, String> + Send + Sync,
{
    NamedFilter {
        name: name.into(),
        func,
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Post-filter #{position} ({filter}) failed on {value:?}: {reason}")]
pub struct PostFilterError {
    pub position: usize,
    pub filter: String,
    pub value: String,
    pub reason: String,
}

/// Runs every filter, in order, over each field of `row`.
///
/// Each filter sees the previous filter's output. The row is only returned
/// when every filter succeeded on every field.
pub fn apply_row(filters: &[Arc<dyn PostFilter>], row: &[Value]) -> Result<Vec<Value>, PostFilterError> {
    if filters.is_empty() {
        return Ok(row.to_vec());
    }

    row.iter()
        .map(|field| {
            filters
                .iter()
                .enumerate()
                .try_fold(field.clone(), |value, (position, filter)| {
                    let shown = value.to_string();
                    filter.apply(value).map_err(|reason| {
                        warn!(
                            target: "livestatus::postfilter",
                            position,
                            filter = filter.name(),
                            value = %shown,
                            "Post-filter failed"
                        );
                        PostFilterError {
                            position,
                            filter: filter.name().to_string(),
                            value: shown,
                            reason,
                        }
                    })
                })
        })
        .collect()
}

pub fn apply_rows(
    filters: &[Arc<dyn PostFilter>],
    rows: &[Vec<Value>],
) -> Result<Vec<Vec<Value>>, PostFilterError> {
    rows.iter().map(|row| apply_row(filters, row)).collect()
}
