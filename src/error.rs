/// Failure to narrow a row, column or result set into a typed value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// No column with this name (case-insensitive) exists in the row.
    #[error("column '{name}' not found, available columns: [{}]", .available.join(", "))]
    ColumnNotFound {
        name: String,
        /// Column names of the row, in original order and case.
        available: Vec<String>,
    },
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// An element of a list or nested value failed to convert.
    #[error("inner type mismatch: {0}")]
    InnerTypeMismatch(String),
    #[error("unexpected null in column '{column}'")]
    UnexpectedNull { column: String },
    #[error("empty result set")]
    EmptyResultSet,
    #[error("mapping error: {0}")]
    Mapping(String),
}

/// Outcome of a column conversion.
pub type ConversionResult<T> = std::result::Result<T, ConversionError>;

/// Outcome of a row or result-set parser.
pub type ParseOutcome<T> = ConversionResult<T>;

/// Error type returned by the HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum CypherError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Cypher failure reported by the server.
    #[error("neo4j error: {message}")]
    Neo4j {
        message: String,
        /// Server-side exception name, e.g. `SyntaxException`.
        exception: Option<String>,
    },
    /// Response decoding or protocol-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// Rows were received but could not be parsed into the requested type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[cfg(test)]
mod tests {
    use crate::{ConversionError, CypherError};

    #[test]
    fn column_not_found_lists_available_columns() {
        let err = ConversionError::ColumnNotFound {
            name: "name".to_owned(),
            available: vec!["age".to_owned(), "city".to_owned()],
        };
        assert_eq!(
            err.to_string(),
            "column 'name' not found, available columns: [age, city]"
        );
    }

    #[test]
    fn conversion_error_converts_into_client_error() {
        let err: CypherError = ConversionError::EmptyResultSet.into();
        assert!(matches!(
            err,
            CypherError::Conversion(ConversionError::EmptyResultSet)
        ));
        assert_eq!(err.to_string(), "empty result set");
    }
}
