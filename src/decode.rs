use std::sync::Arc;

use crate::{
    value::Number,
    wire::{CypherRequest, CypherResponse},
    ColumnDescriptor, CypherError, CypherResult, Row, Statement, WireValue,
};

pub(crate) fn build_request(statement: Statement) -> CypherRequest {
    CypherRequest {
        query: statement.query,
        params: statement
            .params
            .0
            .into_iter()
            .map(|(name, value)| (name, encode_value(value)))
            .collect(),
    }
}

/// Builds rows from a decoded response; descriptors are created once and
/// shared by every row.
pub(crate) fn decode_response(response: CypherResponse) -> Result<CypherResult, CypherError> {
    let columns: Arc<[ColumnDescriptor]> = response
        .columns
        .into_iter()
        .map(ColumnDescriptor::untyped)
        .collect();

    let rows = response
        .data
        .into_iter()
        .enumerate()
        .map(|(index, cells)| {
            if cells.len() != columns.len() {
                return Err(CypherError::Decode(format!(
                    "row {index} has {} values for {} columns",
                    cells.len(),
                    columns.len()
                )));
            }
            let values = cells.into_iter().map(decode_value).collect();
            Row::new(Arc::clone(&columns), values).map_err(CypherError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "tracing")]
    tracing::trace!("decoded {} rows over {} columns", rows.len(), columns.len());

    Ok(CypherResult { columns, rows })
}

pub(crate) fn decode_value(value: serde_json::Value) -> WireValue {
    match value {
        serde_json::Value::Null => WireValue::Null,
        serde_json::Value::Bool(flag) => WireValue::Bool(flag),
        // With `arbitrary_precision` the literal text is preserved verbatim.
        serde_json::Value::Number(number) => WireValue::Number(Number::from_literal(number.to_string())),
        serde_json::Value::String(text) => WireValue::Text(text),
        serde_json::Value::Array(items) => {
            WireValue::List(items.into_iter().map(decode_value).collect())
        }
        serde_json::Value::Object(entries) => WireValue::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key, decode_value(value)))
                .collect(),
        ),
    }
}

pub(crate) fn encode_value(value: WireValue) -> serde_json::Value {
    match value {
        WireValue::Null => serde_json::Value::Null,
        WireValue::Bool(flag) => serde_json::Value::Bool(flag),
        WireValue::Number(number) => number
            .as_str()
            .parse::<serde_json::Number>()
            .map(serde_json::Value::Number)
            // Not a JSON number literal; send the text and let the server reject it.
            .unwrap_or_else(|_| serde_json::Value::String(number.to_string())),
        WireValue::Text(text) => serde_json::Value::String(text),
        WireValue::List(items) => {
            serde_json::Value::Array(items.into_iter().map(encode_value).collect())
        }
        WireValue::Map(entries) => serde_json::Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, encode_value(value)))
                .collect(),
        ),
    }
}
