use serde_json::Value as JsonValue;
use tracing::debug;

use crate::endpoint::EndpointError;
use crate::transport::{RawResponse, STATUS_OK};

/// Separator used inside list fields.
pub const LIST_SEPARATOR: char = ',';

pub type RawRow = Vec<String>;

/// Rows of one endpoint's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResponse {
    /// Present when the server led with a header row.
    pub header: Option<Vec<String>>,
    pub rows: Vec<RawRow>,
}

/// Decodes a response into string rows.
///
/// `expected_columns` is the field count every record must have; `None`
/// means the query named no columns and the first record is the header row.
/// A single bad record rejects the whole response.
pub fn decode(
    endpoint: &str,
    response: &RawResponse,
    expected_columns: Option<usize>,
) -> Result<DecodedResponse, EndpointError> {
    if response.status != STATUS_OK {
        let message = String::from_utf8_lossy(&response.body).trim().to_string();
        return Err(EndpointError::RemoteQuery {
            endpoint: endpoint.to_string(),
            status: response.status,
            message,
        });
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Err(EndpointError::EmptyResponse(endpoint.to_string()));
    }

    let payload: JsonValue = serde_json::from_slice(&response.body)
        .map_err(|e| EndpointError::MalformedPayload(e.to_string()))?;
    let JsonValue::Array(records) = payload else {
        return Err(EndpointError::MalformedPayload(
            "expected an array of rows".to_string(),
        ));
    };

    let mut records = records.into_iter();
    let (header, expected) = match expected_columns {
        Some(count) => (None, count),
        None => match records.next() {
            Some(first) => {
                let header = decode_record(first, 0)?;
                let count = header.len();
                (Some(header), count)
            }
            // A monitor always leads with the header row when no columns
            // were requested; without it there is nothing to name the fields.
            None => return Err(EndpointError::EmptyResponse(endpoint.to_string())),
        },
    };
    let offset = usize::from(header.is_some());

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.enumerate() {
        let record_index = index + offset;
        let row = decode_record(record, record_index)?;
        if row.len() != expected {
            return Err(EndpointError::FieldCountMismatch {
                record: record_index,
                expected,
                found: row.len(),
            });
        }
        rows.push(row);
    }

    debug!(
        target: "livestatus::decoder",
        endpoint,
        rows = rows.len(),
        columns = expected,
        "Decoded response"
    );
    Ok(DecodedResponse { header, rows })
}

fn decode_record(record: JsonValue, index: usize) -> Result<RawRow, EndpointError> {
    match record {
        JsonValue::Array(fields) => Ok(fields.into_iter().map(field_to_string).collect()),
        other => Err(EndpointError::MalformedPayload(format!(
            "record {} is not an array: {}",
            index, other
        ))),
    }
}

fn field_to_string(field: JsonValue) -> String {
    match field {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        JsonValue::Bool(b) => String::from(if b { "1" } else { "0" }),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(items) => items
            .into_iter()
            .map(field_to_string)
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string()),
        other @ JsonValue::Object(_) => other.to_string(),
    }
}
