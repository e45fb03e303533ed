//! Query string composition.

use indexmap::IndexMap;
use url::form_urlencoded;

/// Query parameter values keyed by name. `None` values are skipped.
pub type QueryParams = IndexMap<String, Option<QueryValue>>;

/// A scalar or a list of scalars, already stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    One(String),
    Many(Vec<String>),
}

macro_rules! scalar_query_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::One(value.to_string())
                }
            }

            impl From<Vec<$ty>> for QueryValue {
                fn from(values: Vec<$ty>) -> Self {
                    QueryValue::Many(values.iter().map(ToString::to_string).collect())
                }
            }
        )*
    };
}

scalar_query_value!(String, &str, bool, i32, i64, u16, u32, u64, usize, f64);

/// Append the encoded `query` to `path`, using `&` when `path` already has a
/// query string.
pub fn append_query(path: &str, query: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        match value {
            None => {}
            Some(QueryValue::One(v)) => {
                serializer.append_pair(key, v);
            }
            Some(QueryValue::Many(values)) => {
                for v in values {
                    serializer.append_pair(key, v);
                }
            }
        }
    }
    let encoded = serializer.finish();

    if encoded.is_empty() {
        return path.to_string();
    }
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{encoded}")
}
