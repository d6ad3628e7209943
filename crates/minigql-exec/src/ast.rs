use std::fmt;

use minigql_schema::{RootKind, TypeRef};

/// 1-based source position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A parsed request document.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub operations: Vec<Operation>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub kind: RootKind,
    pub name: Option<String>,
    pub variables: Vec<VariableDef>,
    pub selection: Vec<Field>,
}

/// `$name: Type = default` in an operation header.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<InputValue>,
}

/// One selected field, with its arguments and subfields.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<(String, InputValue)>,
    pub selection: Vec<Field>,
}

impl Field {
    /// Key under which this field appears in the result.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A literal or variable reference in argument position.
#[derive(Clone, Debug, PartialEq)]
pub enum InputValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<InputValue>),
    Object(Vec<(String, InputValue)>),
    Variable(String),
}
