use super::PostFilter;
use crate::response::Value;

/// Trims string fields and turns empty ones into `Value::Null`.
pub struct EmptyToNull;

impl PostFilter for EmptyToNull {
    fn name(&self) -> &str {
        "empty_to_null"
    }

    fn apply(&self, value: Value) -> Result<Value, String> {
        match value {
            Value::Str(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(Value::Str(trimmed.to_string()))
                }
            }
            other => Ok(other),
        }
    }
}

/// Converts numeric-looking string fields into `Int` or `Float`.
pub struct DetectNumbers;

impl PostFilter for DetectNumbers {
    fn name(&self) -> &str {
        "detect_numbers"
    }

    fn apply(&self, value: Value) -> Result<Value, String> {
        let Value::Str(s) = value else {
            return Ok(value);
        };
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::Int(i));
            }
        }
        if s.contains('.') {
            if let Ok(f) = s.parse::<f64>() {
                if f.is_finite() {
                    return Ok(Value::Float(f));
                }
            }
        }
        Ok(Value::Str(s))
    }
}
