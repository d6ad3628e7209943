use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Value;

/// One step in the path from the result root to a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single entry of the `errors` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
}

impl ResponseError {
    /// A request-level error, not tied to any field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }

    pub fn at(message: impl Into<String>, path: Vec<PathSegment>) -> Self {
        Self {
            message: message.into(),
            path,
        }
    }

    /// Dotted rendering of the path, e.g. `list.0.title`.
    pub fn path_string(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// The `{data, errors}` envelope.
///
/// `data` is `None` (serialized as `null`) when the request failed before
/// execution started. `errors` is omitted from the JSON when empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,
}

impl Response {
    pub fn new(data: Value, errors: Vec<ResponseError>) -> Self {
        Self {
            data: Some(data),
            errors,
        }
    }

    /// A response for a request that never reached execution.
    pub fn from_error(error: ResponseError) -> Self {
        Self {
            data: None,
            errors: vec![error],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// `true` when some data was produced alongside errors.
    pub fn is_partial(&self) -> bool {
        self.data.is_some() && !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_errors_are_omitted() {
        let resp = Response::new(json!({"list": []}), vec![]);
        assert_eq!(serde_json::to_value(&resp).unwrap(), json!({"data": {"list": []}}));
        assert!(resp.is_ok());
    }

    #[test]
    fn request_error_has_null_data() {
        let resp = Response::from_error(ResponseError::new("syntax error"));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"data": null, "errors": [{"message": "syntax error"}]})
        );
        assert!(!resp.is_partial());
    }

    #[test]
    fn path_mixes_keys_and_indices() {
        let err = ResponseError::at("boom", vec!["list".into(), 1.into(), "title".into()]);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"message": "boom", "path": ["list", 1, "title"]})
        );
        assert_eq!(err.path_string(), "list.1.title");
    }
}
