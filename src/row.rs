use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use crate::{ColumnDescriptor, ConversionError, ConversionResult, FromColumn, WireValue};

/// One record of a query result: column descriptors and aligned values.
///
/// Descriptors are shared by all rows of a result set. Column lookup is
/// case-insensitive; the name index is built on first lookup.
#[derive(Clone, Debug)]
pub struct Row {
    columns: Arc<[ColumnDescriptor]>,
    values: Vec<WireValue>,
    index: OnceLock<HashMap<String, usize>>,
}

impl Row {
    /// Builds a row; `values` must be positionally aligned with `columns`.
    pub fn new(
        columns: impl Into<Arc<[ColumnDescriptor]>>,
        values: Vec<WireValue>,
    ) -> ConversionResult<Self> {
        let columns = columns.into();
        if columns.len() != values.len() {
            return Err(ConversionError::Mapping(format!(
                "row has {} values for {} columns",
                values.len(),
                columns.len()
            )));
        }
        Ok(Self {
            columns,
            values,
            index: OnceLock::new(),
        })
    }

    /// Converts the named column with its [`FromColumn`] converter.
    pub fn get<T: FromColumn>(&self, name: &str) -> ConversionResult<T> {
        self.get_with(name, T::from_column)
    }

    /// Converts the named column with a caller-supplied converter.
    pub fn get_with<T, F>(&self, name: &str, convert: F) -> ConversionResult<T>
    where
        F: Fn(&WireValue, &ColumnDescriptor) -> ConversionResult<T>,
    {
        let (column, value) = self.lookup(name)?;
        convert(value, column)
    }

    /// Unchecked accessor for columns the caller asserts exist and convert.
    ///
    /// # Panics
    ///
    /// Panics with the conversion error if [`Row::get`] would fail.
    pub fn apply<T: FromColumn>(&self, name: &str) -> T {
        match self.get(name) {
            Ok(value) => value,
            Err(err) => panic!("Row::apply({name}) failed: {err}"),
        }
    }

    /// Descriptor and raw value of the named column.
    pub fn lookup(&self, name: &str) -> ConversionResult<(&ColumnDescriptor, &WireValue)> {
        let position = self
            .name_index()
            .get(&name.to_uppercase())
            .copied()
            .ok_or_else(|| ConversionError::ColumnNotFound {
                name: name.to_owned(),
                available: self.column_names().map(str::to_owned).collect(),
            })?;
        Ok((&self.columns[position], &self.values[position]))
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Positional view of the values.
    pub fn values(&self) -> &[WireValue] {
        &self.values
    }

    /// Name to value view, keyed by the original column names.
    pub fn as_map(&self) -> BTreeMap<&str, &WireValue> {
        self.column_names().zip(self.values.iter()).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnDescriptor, &WireValue)> {
        self.columns.iter().zip(self.values.iter())
    }

    // Repeated names resolve to the last column carrying them.
    fn name_index(&self) -> &HashMap<String, usize> {
        self.index.get_or_init(|| {
            self.columns
                .iter()
                .enumerate()
                .map(|(position, column)| (column.name.to_uppercase(), position))
                .collect()
        })
    }
}

impl IntoIterator for Row {
    type Item = WireValue;
    type IntoIter = std::vec::IntoIter<WireValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
