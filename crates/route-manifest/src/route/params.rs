/// Route parameter values
///
/// Values extracted from a matched path and values handed to a generator share
/// one representation so that a match can be fed straight back into
/// [`ResolvedRoute::generate`](crate::ResolvedRoute::generate).
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Parameter name → value
pub type Params = HashMap<String, ParamValue>;

/// A single parameter value
///
/// Spread parameters may be given as a list of path components; they are
/// joined with `/` when filling a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// Renders the value as it appears in a path, `None` for an empty list
    pub fn to_path_value(&self) -> Option<String> {
        match self {
            ParamValue::One(value) => Some(value.clone()),
            ParamValue::Many(parts) if parts.is_empty() => None,
            ParamValue::Many(parts) => Some(parts.join("/")),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::One(value) => Some(value),
            ParamValue::Many(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::One(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::One(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(parts: Vec<String>) -> Self {
        ParamValue::Many(parts)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(parts: Vec<&str>) -> Self {
        ParamValue::Many(parts.into_iter().map(String::from).collect())
    }
}

/// Builds a [`Params`] map from `(name, value)` pairs
///
/// # Examples
///
/// ```
/// use route_manifest::route::params::{params_from, ParamValue};
///
/// let params = params_from([("lang", "en"), ("slug", "post-1")]);
/// assert_eq!(params.get("lang"), Some(&ParamValue::One("en".to_string())));
/// ```
pub fn params_from<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParamValue>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}
