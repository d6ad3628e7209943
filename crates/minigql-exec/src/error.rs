use thiserror::Error;

/// Errors raised while parsing or executing a request.
///
/// The first three variants abort the whole request. The others are
/// recorded against a single field path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("syntax error at {line}:{column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("variable ${name} is invalid: {reason}")]
    InvalidVariable { name: String, reason: String },

    #[error("cannot query field \"{field}\" on type \"{type_name}\"")]
    UnknownField { type_name: String, field: String },

    #[error("argument \"{argument}\" of field \"{field}\" is invalid: {reason}")]
    ArgumentType {
        field: String,
        argument: String,
        reason: String,
    },

    #[error("{0}")]
    FieldResolution(String),

    #[error("{0}")]
    Completion(String),
}

pub type ExecResult<T> = Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let parse = ExecError::Parse {
            message: "expected '}'".into(),
            line: 1,
            column: 4,
        };
        assert_eq!(parse.to_string(), "syntax error at 1:4: expected '}'");
        let arg = ExecError::ArgumentType {
            field: "tutorial".into(),
            argument: "id".into(),
            reason: "Int cannot represent \"abc\"".into(),
        };
        assert_eq!(
            arg.to_string(),
            "argument \"id\" of field \"tutorial\" is invalid: Int cannot represent \"abc\""
        );
    }
}
