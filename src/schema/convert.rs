use chrono::DateTime;
use thiserror::Error;
use tracing::debug;

use super::ColumnKind;
use crate::query::TimeFormat;
use crate::response::{LIST_SEPARATOR, RawRow, Value};

/// A field that did not match its column's declared type.
///
/// Recorded on the result set; the field itself becomes `Value::Invalid`
/// and the rest of its row stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{endpoint}: row {row}, column '{column}': cannot convert {raw:?} ({reason})")]
pub struct TypeConversionError {
    pub endpoint: String,
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub reason: String,
}

pub fn convert_field(raw: &str, kind: &ColumnKind, time_format: TimeFormat) -> Result<Value, String> {
    match kind {
        ColumnKind::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| "not an integer".to_string()),
        ColumnKind::Float => parse_float(raw).map(Value::Float),
        ColumnKind::Number => match raw.trim().parse::<i64>() {
            Ok(i) => Ok(Value::Int(i)),
            Err(_) => parse_float(raw).map(Value::Float),
        },
        ColumnKind::Bool => match raw.trim() {
            "1" | "true" => Ok(Value::Bool(true)),
            "0" | "false" => Ok(Value::Bool(false)),
            _ => Err("not a boolean".to_string()),
        },
        ColumnKind::Time => {
            let seconds = parse_float(raw)?;
            match time_format {
                TimeFormat::Stamp => Ok(Value::Float(seconds)),
                TimeFormat::DateTime => {
                    let whole = seconds.floor();
                    let nanos = ((seconds - whole) * 1e9) as u32;
                    DateTime::from_timestamp(whole as i64, nanos)
                        .map(Value::Time)
                        .ok_or_else(|| "timestamp out of range".to_string())
                }
            }
        }
        ColumnKind::List if raw.is_empty() => Ok(Value::List(Vec::new())),
        ColumnKind::List => Ok(Value::List(
            raw.split(LIST_SEPARATOR).map(str::to_string).collect(),
        )),
        ColumnKind::String | ColumnKind::Other(_) => Ok(Value::Str(raw.to_string())),
    }
}

fn parse_float(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        _ => Err("not a number".to_string()),
    }
}

/// Converts one endpoint's rows field by field.
///
/// `columns` and `kinds` are parallel slices matching the row width. Every
/// failed field is pushed onto `errors`.
pub fn convert_rows(
    endpoint: &str,
    columns: &[String],
    kinds: &[ColumnKind],
    rows: Vec<RawRow>,
    time_format: TimeFormat,
    errors: &mut Vec<TypeConversionError>,
) -> Vec<Vec<Value>> {
    let before = errors.len();
    let converted = rows
        .into_iter()
        .enumerate()
        .map(|(row_index, row)| {
            row.into_iter()
                .zip(columns.iter().zip(kinds))
                .map(|(raw, (column, kind))| match convert_field(&raw, kind, time_format) {
                    Ok(value) => value,
                    Err(reason) => {
                        errors.push(TypeConversionError {
                            endpoint: endpoint.to_string(),
                            row: row_index,
                            column: column.clone(),
                            raw: raw.clone(),
                            reason: reason.clone(),
                        });
                        Value::Invalid { raw, reason }
                    }
                })
                .collect()
        })
        .collect();

    if errors.len() > before {
        debug!(
            target: "livestatus::types",
            endpoint,
            failed_fields = errors.len() - before,
            "Some fields did not match their declared type"
        );
    }
    converted
}

/// Wraps every field as `Value::Str`, for runs without type detection.
pub fn raw_values(rows: Vec<RawRow>) -> Vec<Vec<Value>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(Value::Str).collect())
        .collect()
}
