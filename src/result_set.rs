use std::fmt;
use std::sync::Arc;

use crate::{ConversionError, ParseOutcome, Row, RowParser};

/// Aggregates a whole result set into a typed value.
///
/// [`list`](Self::list), [`single`](Self::single) and
/// [`single_opt`](Self::single_opt) cover the common cardinalities; any other
/// aggregation can be written with [`ResultSetParser::new`].
pub struct ResultSetParser<T> {
    parse: Arc<dyn Fn(&[Row]) -> ParseOutcome<T> + Send + Sync>,
}

impl<T> Clone for ResultSetParser<T> {
    fn clone(&self) -> Self {
        Self {
            parse: Arc::clone(&self.parse),
        }
    }
}

impl<T> fmt::Debug for ResultSetParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSetParser").finish_non_exhaustive()
    }
}

impl<T: 'static> ResultSetParser<T> {
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&[Row]) -> ParseOutcome<T> + Send + Sync + 'static,
    {
        Self {
            parse: Arc::new(parse),
        }
    }

    pub fn parse(&self, rows: &[Row]) -> ParseOutcome<T> {
        (self.parse)(rows)
    }

    pub fn map<U, F>(self, f: F) -> ResultSetParser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        ResultSetParser::new(move |rows| self.parse(rows).map(&f))
    }
}

impl<T: 'static> ResultSetParser<Vec<T>> {
    /// Parses every row in order.
    ///
    /// Stops at the first failing row and returns its error; later rows are
    /// not parsed. No rows yield an empty list.
    pub fn list(row: RowParser<T>) -> Self {
        ResultSetParser::new(move |rows| rows.iter().map(|r| row.parse(r)).collect())
    }
}

impl<T: 'static> ResultSetParser<T> {
    /// Exactly one row: zero rows is [`ConversionError::EmptyResultSet`],
    /// more than one is a mapping error.
    pub fn single(row: RowParser<T>) -> Self {
        ResultSetParser::new(move |rows| match rows {
            [] => Err(ConversionError::EmptyResultSet),
            [only] => row.parse(only),
            _ => Err(more_than_one_row(rows.len())),
        })
    }
}

impl<T: 'static> ResultSetParser<Option<T>> {
    /// At most one row: zero rows is `None`, more than one is a mapping
    /// error rather than silently taking the first.
    pub fn single_opt(row: RowParser<T>) -> Self {
        ResultSetParser::new(move |rows| match rows {
            [] => Ok(None),
            [only] => row.parse(only).map(Some),
            _ => Err(more_than_one_row(rows.len())),
        })
    }
}

fn more_than_one_row(count: usize) -> ConversionError {
    #[cfg(feature = "tracing")]
    tracing::debug!("expected at most one row, got {}", count);

    #[cfg(not(feature = "tracing"))]
    let _ = count;

    ConversionError::Mapping("more than one row".to_owned())
}
