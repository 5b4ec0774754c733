//! `cypher-rows` turns loosely-typed Neo4j Cypher result rows into typed
//! Rust values.
//!
//! - [`Row::get`] narrows one column through its [`FromColumn`] converter.
//! - [`RowParser`] values are combined with [`RowParser::and`] and flattened
//!   with [`flatten3`] .. [`flatten8`].
//! - [`ResultSetParser`] aggregates rows as a list, a single row, an optional
//!   row, or any custom fold.
//! - [`CypherClient`] runs statements against the REST Cypher endpoint.

mod client;
mod column;
mod convert;
mod decode;
mod error;
mod graph;
mod numeric;
mod options;
mod params;
mod parser;
mod result_set;
mod row;
mod types;
mod value;
mod wire;

pub use client::{cypher_endpoint_url, CypherClient};
pub use column::ColumnDescriptor;
pub use convert::{non_null, ColumnConverter, FromColumn};
pub use error::{ConversionError, ConversionResult, CypherError, ParseOutcome};
pub use graph::{map_column, FromWireMap, NeoNode, NeoRelationship};
pub use numeric::Decimal;
pub use options::ClientOptions;
pub use params::{Params, Statement};
pub use parser::{
    combine, flatten3, flatten4, flatten5, flatten6, flatten7, flatten8, get, RowParser,
};
pub use result_set::ResultSetParser;
pub use row::Row;
pub use types::CypherResult;
pub use value::{Number, WireValue};

pub use num_bigint::BigInt;

pub type Result<T> = std::result::Result<T, CypherError>;
