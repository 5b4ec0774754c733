//! Per-type column converters.
//!
//! Each target type implements [`FromColumn`]; the implementation chosen at
//! a call site such as `row.get::<i32>("age")` is the converter for that
//! column. Callers with one-off needs can pass any [`ColumnConverter`]-shaped
//! closure to [`crate::Row::get_with`] instead.

use std::collections::BTreeMap;

use num_bigint::BigInt;

use crate::{ColumnDescriptor, ConversionError, ConversionResult, Decimal, WireValue};

/// Function shape of a column converter.
pub type ColumnConverter<T> = fn(&WireValue, &ColumnDescriptor) -> ConversionResult<T>;

/// Narrows a wire value into `Self`.
pub trait FromColumn: Sized {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self>;
}

/// Wraps a converter that assumes a non-null input.
///
/// `Null` short-circuits with [`ConversionError::UnexpectedNull`]; any other
/// value is handed to `convert`.
pub fn non_null<T, F>(convert: F) -> impl Fn(&WireValue, &ColumnDescriptor) -> ConversionResult<T>
where
    F: Fn(&WireValue, &ColumnDescriptor) -> ConversionResult<T>,
{
    move |value: &WireValue, column: &ColumnDescriptor| match value {
        WireValue::Null => Err(ConversionError::UnexpectedNull {
            column: column.name.clone(),
        }),
        other => convert(other, column),
    }
}

pub(crate) fn mismatch(value: &WireValue, target: &str, column: &ColumnDescriptor) -> ConversionError {
    ConversionError::TypeMismatch(format!(
        "cannot convert {value} to {target} for column {}",
        column.name
    ))
}

impl FromColumn for String {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
            WireValue::Text(text) => Ok(text.clone()),
            other => Err(mismatch(other, "String", column)),
        })(value, column)
    }
}

impl FromColumn for bool {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
            WireValue::Bool(flag) => Ok(*flag),
            other => Err(mismatch(other, "bool", column)),
        })(value, column)
    }
}

// Exact narrowing: the literal must denote an integer that fits the width.
macro_rules! integer_from_column {
    ($($ty:ty),*) => {
        $(
            impl FromColumn for $ty {
                fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
                    non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
                        WireValue::Number(number) => number
                            .to_bigint()
                            .and_then(|int| <$ty>::try_from(&int).ok())
                            .ok_or_else(|| mismatch(value, stringify!($ty), column)),
                        other => Err(mismatch(other, stringify!($ty), column)),
                    })(value, column)
                }
            }
        )*
    };
}

integer_from_column!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl FromColumn for f64 {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
            WireValue::Number(number) => number
                .to_f64()
                .ok_or_else(|| mismatch(value, "f64", column)),
            other => Err(mismatch(other, "f64", column)),
        })(value, column)
    }
}

impl FromColumn for f32 {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        f64::from_column(value, column).map(|float| float as f32)
    }
}

impl FromColumn for BigInt {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
            WireValue::Number(number) => number
                .to_bigint()
                .ok_or_else(|| mismatch(value, "BigInt", column)),
            other => Err(mismatch(other, "BigInt", column)),
        })(value, column)
    }
}

impl FromColumn for Decimal {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
            WireValue::Number(number) => number
                .to_decimal()
                .ok_or_else(|| mismatch(value, "Decimal", column)),
            other => Err(mismatch(other, "Decimal", column)),
        })(value, column)
    }
}

/// Raw passthrough; accepts any value, `Null` included.
impl FromColumn for WireValue {
    fn from_column(value: &WireValue, _column: &ColumnDescriptor) -> ConversionResult<Self> {
        Ok(value.clone())
    }
}

impl FromColumn for BTreeMap<String, WireValue> {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
            WireValue::Map(entries) => Ok(entries.clone()),
            other => Err(mismatch(other, "Map", column)),
        })(value, column)
    }
}

impl<T: FromColumn> FromColumn for Option<T> {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        match value {
            WireValue::Null => Ok(None),
            other => T::from_column(other, column).map(Some),
        }
    }
}

/// Lists convert element by element and stop at the first failing element.
impl<T: FromColumn> FromColumn for Vec<T> {
    fn from_column(value: &WireValue, column: &ColumnDescriptor) -> ConversionResult<Self> {
        non_null(|value: &WireValue, column: &ColumnDescriptor| match value {
            WireValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    T::from_column(item, column).map_err(|err| {
                        ConversionError::InnerTypeMismatch(format!(
                            "element {index} of {value} in column {}: {err}",
                            column.name
                        ))
                    })
                })
                .collect(),
            other => Err(mismatch(other, "List", column)),
        })(value, column)
    }
}
