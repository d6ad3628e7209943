use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;
use crate::{Map, Value};

/// An inbound GraphQL request.
///
/// Deserializes from the conventional `{"query", "operationName", "variables"}`
/// JSON object. `variables: null` is treated as an empty map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Map::is_empty")]
    pub variables: Map,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map, D::Error> {
    Ok(Option::<Map>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    /// A request carrying only document text.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    pub fn with_variables(mut self, variables: Map) -> Self {
        self.variables = variables;
        self
    }

    /// Decode an HTTP request body.
    ///
    /// A body holding a JSON object is read as a structured request. Any
    /// other body is taken verbatim as the document text, so both
    /// `curl -d '{ list { id } }'` and GraphiQL's JSON payloads work.
    pub fn from_body(body: &[u8]) -> Result<Self, TypeError> {
        let text = std::str::from_utf8(body).map_err(|_| TypeError::InvalidUtf8)?;
        match serde_json::from_str::<Value>(text) {
            Ok(value @ Value::Object(_)) => {
                serde_json::from_value(value).map_err(|e| TypeError::InvalidJson(e.to_string()))
            }
            _ => Ok(Self::new(text)),
        }
    }

    /// Build a request from `GET` query-string parameters.
    ///
    /// `variables`, when present, must be a JSON object encoded as a string.
    pub fn from_params(
        query: String,
        operation_name: Option<String>,
        variables: Option<&str>,
    ) -> Result<Self, TypeError> {
        let variables = match variables.map(str::trim).filter(|v| !v.is_empty()) {
            None => Map::new(),
            Some(raw) => match serde_json::from_str::<Value>(raw)
                .map_err(|e| TypeError::InvalidJson(e.to_string()))?
            {
                Value::Object(map) => map,
                Value::Null => Map::new(),
                _ => return Err(TypeError::VariablesNotObject),
            },
        };
        Ok(Self {
            query,
            operation_name: operation_name.filter(|n| !n.is_empty()),
            variables,
        })
    }
}
