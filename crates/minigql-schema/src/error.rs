use thiserror::Error;

/// Errors raised while building a schema. All of them are startup errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("type already defined: {0}")]
    DuplicateType(String),

    #[error("{0} root already defined")]
    DuplicateRoot(String),

    #[error("field {field} defined twice on type {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("argument {argument} defined twice on {type_name}.{field}")]
    DuplicateArgument {
        type_name: String,
        field: String,
        argument: String,
    },

    #[error("root field {type_name}.{field} has no resolver")]
    MissingResolver { type_name: String, field: String },

    #[error("schema has no query root")]
    MissingQueryRoot,

    #[error("{type_name}.{field} references unknown type {referenced}")]
    UnknownType {
        type_name: String,
        field: String,
        referenced: String,
    },

    #[error("argument {argument} of {type_name}.{field} must be a scalar, got {referenced}")]
    InvalidArgumentType {
        type_name: String,
        field: String,
        argument: String,
        referenced: String,
    },

    #[error("default of argument {argument} on {type_name}.{field} is invalid: {reason}")]
    InvalidDefault {
        type_name: String,
        field: String,
        argument: String,
        reason: String,
    },

    #[error("type {0} has no fields")]
    EmptyType(String),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
