use std::fmt;

/// A single query-string value before it is rendered as text.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => f.write_str(s),
            QueryValue::Integer(n) => write!(f, "{}", n),
            QueryValue::Float(n) => write!(f, "{}", n),
            QueryValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Integer(value.into())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Query parameters for `HttpClient::get`.
///
/// A `None` value marks the key as absent. Absent keys and empty strings are
/// dropped by [`QueryParams::retained`] before the request is sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. Accepts plain values as well as `Option`s.
    pub fn set<V>(mut self, key: impl Into<String>, value: V) -> Self
    where
        V: Into<Option<QueryValue>>,
    {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// The key/value pairs that will actually be transmitted.
    pub fn retained(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| match value {
                None => None,
                Some(QueryValue::Text(s)) if s.is_empty() => None,
                Some(v) => Some((key.clone(), v.to_string())),
            })
            .collect()
    }

    /// Parse a `key=value` pair as given on the command line.
    ///
    /// A pair without `=` or with nothing after it yields an empty value,
    /// which is then omitted like any other empty string.
    pub fn parse_pair(raw: &str) -> (String, Option<QueryValue>) {
        match raw.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(QueryValue::from(value))),
            None => (raw.to_string(), Some(QueryValue::Text(String::new()))),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<Option<QueryValue>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
