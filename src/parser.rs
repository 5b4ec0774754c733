//! Row parsers and their combinators.
//!
//! `flatten3`..`flatten8` take the left-nested pairs that chained `and`
//! builds, `((a, b), c)`. A right-nested `combine(a, combine(b, c))` yields
//! `(a, (b, c))`, which they do not accept.
//!
//! ```
//! use cypher_rows::{flatten3, get, ColumnDescriptor, Row, RowParser, WireValue};
//!
//! let person: RowParser<(String, i32, Option<String>)> = get::<String>("name")
//!     .and(get::<i32>("age"))
//!     .and(get::<Option<String>>("city"))
//!     .map(flatten3);
//!
//! let row = Row::new(
//!     vec![
//!         ColumnDescriptor::untyped("name"),
//!         ColumnDescriptor::untyped("age"),
//!         ColumnDescriptor::untyped("city"),
//!     ],
//!     vec![WireValue::text("Kit"), WireValue::number(42), WireValue::Null],
//! )
//! .unwrap();
//!
//! assert_eq!(person.parse(&row), Ok(("Kit".to_owned(), 42, None)));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::{FromColumn, ParseOutcome, ResultSetParser, Row};

/// Extracts a typed value from one [`Row`].
pub struct RowParser<T> {
    parse: Arc<dyn Fn(&Row) -> ParseOutcome<T> + Send + Sync>,
}

impl<T> Clone for RowParser<T> {
    fn clone(&self) -> Self {
        Self {
            parse: Arc::clone(&self.parse),
        }
    }
}

impl<T> fmt::Debug for RowParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowParser").finish_non_exhaustive()
    }
}

impl<T: 'static> RowParser<T> {
    pub fn new<F>(parse: F) -> Self
    where
        F: Fn(&Row) -> ParseOutcome<T> + Send + Sync + 'static,
    {
        Self {
            parse: Arc::new(parse),
        }
    }

    pub fn parse(&self, row: &Row) -> ParseOutcome<T> {
        (self.parse)(row)
    }

    pub fn map<U, F>(self, f: F) -> RowParser<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        RowParser::new(move |row| self.parse(row).map(&f))
    }

    /// Chains a fallible step after a successful parse.
    pub fn and_then<U, F>(self, f: F) -> RowParser<U>
    where
        U: 'static,
        F: Fn(T) -> ParseOutcome<U> + Send + Sync + 'static,
    {
        RowParser::new(move |row| self.parse(row).and_then(&f))
    }

    /// Sequential composition, see [`combine`].
    pub fn and<U: 'static>(self, next: RowParser<U>) -> RowParser<(T, U)> {
        combine(self, next)
    }

    /// Applies this parser to every row, see [`ResultSetParser::list`].
    pub fn many(self) -> ResultSetParser<Vec<T>> {
        ResultSetParser::list(self)
    }

    /// See [`ResultSetParser::single`].
    pub fn single(self) -> ResultSetParser<T> {
        ResultSetParser::single(self)
    }

    /// See [`ResultSetParser::single_opt`].
    pub fn single_opt(self) -> ResultSetParser<Option<T>> {
        ResultSetParser::single_opt(self)
    }
}

/// Parser reading one column with its [`FromColumn`] converter.
pub fn get<T: FromColumn + 'static>(name: impl Into<String>) -> RowParser<T> {
    let name = name.into();
    RowParser::new(move |row| row.get::<T>(&name))
}

/// Runs `first`, then `second` on the same row.
///
/// The first failure is returned as is; `second` does not run when `first`
/// fails.
pub fn combine<A, B>(first: RowParser<A>, second: RowParser<B>) -> RowParser<(A, B)>
where
    A: 'static,
    B: 'static,
{
    RowParser::new(move |row| {
        let a = first.parse(row)?;
        let b = second.parse(row)?;
        Ok((a, b))
    })
}

// Flattening of left-nested pair chains built by repeated `and`.

pub fn flatten3<A, B, C>(((a, b), c): ((A, B), C)) -> (A, B, C) {
    (a, b, c)
}

pub fn flatten4<A, B, C, D>((((a, b), c), d): (((A, B), C), D)) -> (A, B, C, D) {
    (a, b, c, d)
}

pub fn flatten5<A, B, C, D, E>(
    ((((a, b), c), d), e): ((((A, B), C), D), E),
) -> (A, B, C, D, E) {
    (a, b, c, d, e)
}

pub fn flatten6<A, B, C, D, E, F>(
    (((((a, b), c), d), e), f): (((((A, B), C), D), E), F),
) -> (A, B, C, D, E, F) {
    (a, b, c, d, e, f)
}

pub fn flatten7<A, B, C, D, E, F, G>(
    ((((((a, b), c), d), e), f), g): ((((((A, B), C), D), E), F), G),
) -> (A, B, C, D, E, F, G) {
    (a, b, c, d, e, f, g)
}

pub fn flatten8<A, B, C, D, E, F, G, H>(
    (((((((a, b), c), d), e), f), g), h): (((((((A, B), C), D), E), F), G), H),
) -> (A, B, C, D, E, F, G, H) {
    (a, b, c, d, e, f, g, h)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::{
        combine, flatten4, flatten8, get, ColumnDescriptor, ConversionError, Row, RowParser,
        WireValue,
    };

    fn row() -> Row {
        Row::new(
            vec![
                ColumnDescriptor::untyped("id"),
                ColumnDescriptor::untyped("name"),
                ColumnDescriptor::untyped("score"),
                ColumnDescriptor::untyped("tags"),
            ],
            vec![
                WireValue::number(7),
                WireValue::text("Kit"),
                WireValue::number(1.5),
                WireValue::list([WireValue::text("a")]),
            ],
        )
        .expect("must build row")
    }

    #[test]
    fn combine_pairs_values_in_order() {
        let parser = combine(get::<i64>("id"), get::<String>("name"));
        assert_eq!(parser.parse(&row()), Ok((7, "Kit".to_owned())));
    }

    #[test]
    fn combine_stops_at_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = {
            let calls = Arc::clone(&calls);
            RowParser::new(move |row| {
                calls.fetch_add(1, Ordering::SeqCst);
                row.get::<i64>("id")
            })
        };

        let err = get::<i64>("missing")
            .and(counted)
            .parse(&row())
            .expect_err("must fail");
        assert!(matches!(err, ConversionError::ColumnNotFound { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn combine_reports_second_failure() {
        let err = get::<i64>("id")
            .and(get::<i64>("name"))
            .parse(&row())
            .expect_err("must fail");
        assert!(matches!(err, ConversionError::TypeMismatch(_)));
    }

    #[test]
    fn map_and_flatten() {
        let parser = get::<i64>("id")
            .and(get::<String>("name"))
            .and(get::<f64>("score"))
            .and(get::<Vec<String>>("tags"))
            .map(flatten4);
        assert_eq!(
            parser.parse(&row()),
            Ok((7, "Kit".to_owned(), 1.5, vec!["a".to_owned()]))
        );

        let label = get::<String>("name").map(|name| name.len());
        assert_eq!(label.parse(&row()), Ok(3));
    }

    #[test]
    fn flatten8_keeps_combination_order() {
        let chain = (((((((1, 2), 3), 4), 5), 6), 7), 8);
        assert_eq!(flatten8(chain), (1, 2, 3, 4, 5, 6, 7, 8));
    }

    #[test]
    fn and_then_can_reject() {
        let positive = get::<i64>("id").and_then(|id| {
            if id > 10 {
                Ok(id)
            } else {
                Err(ConversionError::Mapping(format!("id {id} too small")))
            }
        });
        assert!(matches!(
            positive.parse(&row()),
            Err(ConversionError::Mapping(_))
        ));
    }

    #[test]
    fn parsers_are_shareable_across_threads() {
        let parser = get::<String>("name");
        let handle = std::thread::spawn({
            let parser = parser.clone();
            move || parser.parse(&row())
        });
        assert_eq!(handle.join().expect("thread must finish"), parser.parse(&row()));
    }
}
