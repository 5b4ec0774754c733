use std::collections::BTreeMap;

use crate::WireValue;

/// Named Cypher parameters, referenced as `{name}` / `$name` in a query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(pub BTreeMap<String, WireValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds parameters from name/value pairs.
    ///
    /// Names can be provided with or without a `$` prefix.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<WireValue>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (normalize_name(name.as_ref()), value.into()))
                .collect(),
        )
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<WireValue>) {
        self.0.insert(normalize_name(name.as_ref()), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<BTreeMap<String, WireValue>> for Params {
    fn from(values: BTreeMap<String, WireValue>) -> Self {
        Self(values)
    }
}

/// A Cypher query plus its parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub query: String,
    pub params: Params,
}

impl Statement {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Params::default(),
        }
    }

    pub fn with_params<P: Into<Params>>(query: impl Into<String>, params: P) -> Self {
        Self {
            query: query.into(),
            params: params.into(),
        }
    }

    /// Binds one named parameter.
    pub fn on(mut self, name: impl AsRef<str>, value: impl Into<WireValue>) -> Self {
        self.params.insert(name, value);
        self
    }
}

impl From<&str> for Statement {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for Statement {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim_start_matches('$').to_owned()
}
