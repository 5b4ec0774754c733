//! Graph entities as returned by the Neo4j REST API.
//!
//! Nodes and relationships arrive as string-keyed maps carrying their own
//! resource URL (`self`) and a `data` map of properties.

use std::collections::BTreeMap;

use crate::{
    convert::{mismatch, non_null},
    ColumnDescriptor, ConversionError, ConversionResult, FromColumn, WireValue,
};

/// Decodes a domain object from a string-keyed map.
pub trait FromWireMap: Sized {
    fn from_wire_map(map: &BTreeMap<String, WireValue>) -> ConversionResult<Self>;
}

/// Column converter for any [`FromWireMap`] type: only non-null maps are
/// accepted.
pub fn map_column<T: FromWireMap>(
    value: &WireValue,
    column: &ColumnDescriptor,
) -> ConversionResult<T> {
    non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
        WireValue::Map(map) => T::from_wire_map(map),
        other => Err(mismatch(other, "Map", column)),
    })(value, column)
}

#[derive(Clone, Debug, PartialEq)]
pub struct NeoNode {
    pub id: i64,
    pub props: BTreeMap<String, WireValue>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NeoRelationship {
    pub id: i64,
    pub rel_type: String,
    /// Id of the start node.
    pub start: i64,
    /// Id of the end node.
    pub end: i64,
    pub props: BTreeMap<String, WireValue>,
}

impl FromWireMap for NeoNode {
    fn from_wire_map(map: &BTreeMap<String, WireValue>) -> ConversionResult<Self> {
        Ok(Self {
            id: id_from_url(map, "self")?,
            props: properties(map)?,
        })
    }
}

impl FromWireMap for NeoRelationship {
    fn from_wire_map(map: &BTreeMap<String, WireValue>) -> ConversionResult<Self> {
        let rel_type = match map.get("type") {
            Some(WireValue::Text(rel_type)) => rel_type.clone(),
            _ => {
                return Err(ConversionError::Mapping(
                    "relationship map has no text 'type'".to_owned(),
                ))
            }
        };

        Ok(Self {
            id: id_from_url(map, "self")?,
            rel_type,
            start: id_from_url(map, "start")?,
            end: id_from_url(map, "end")?,
            props: properties(map)?,
        })
    }
}

impl FromColumn for NeoNode {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        map_column(value, column)
    }
}

impl FromColumn for NeoRelationship {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        map_column(value, column)
    }
}

/// Reads the trailing numeric segment of a resource URL such as
/// `http://localhost:7474/db/data/node/12`.
fn id_from_url(map: &BTreeMap<String, WireValue>, key: &str) -> ConversionResult<i64> {
    let url = match map.get(key) {
        Some(WireValue::Text(url)) => url,
        _ => {
            return Err(ConversionError::Mapping(format!(
                "entity map has no text '{key}' url"
            )))
        }
    };

    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<i64>().ok())
        .ok_or_else(|| ConversionError::Mapping(format!("cannot read id from {key} url '{url}'")))
}

fn properties(map: &BTreeMap<String, WireValue>) -> ConversionResult<BTreeMap<String, WireValue>> {
    match map.get("data") {
        Some(WireValue::Map(props)) => Ok(props.clone()),
        None => Ok(BTreeMap::new()),
        Some(other) => Err(ConversionError::Mapping(format!(
            "entity 'data' must be a map, got {other}"
        ))),
    }
}
