use std::sync::Arc;

use crate::{ColumnDescriptor, ParseOutcome, ResultSetParser, Row};

/// Rows returned by one Cypher statement.
#[derive(Clone, Debug)]
pub struct CypherResult {
    pub columns: Arc<[ColumnDescriptor]>,
    pub rows: Vec<Row>,
}

impl CypherResult {
    pub fn parse<T: 'static>(&self, parser: &ResultSetParser<T>) -> ParseOutcome<T> {
        parser.parse(&self.rows)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }
}
