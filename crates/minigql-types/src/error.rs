use thiserror::Error;

/// Errors produced while decoding wire types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("request body is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid request JSON: {0}")]
    InvalidJson(String),

    #[error("variables must be a JSON object")]
    VariablesNotObject,
}
