use std::fmt;

use minigql_types::Value;
use serde_json::Number;

/// Built-in scalar types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Float,
    String,
    Boolean,
    Id,
}

impl ScalarType {
    pub const ALL: [ScalarType; 5] = [
        Self::Int,
        Self::Float,
        Self::String,
        Self::Boolean,
        Self::Id,
    ];

    /// The GraphQL name of the scalar.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Float => "Float",
            Self::String => "String",
            Self::Boolean => "Boolean",
            Self::Id => "ID",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Coerce a non-null input value to this scalar.
    ///
    /// `Int` also accepts strings holding a base-10 integer. Both forms must
    /// fit in 32 bits.
    pub fn coerce_input(self, value: Value) -> Result<Value, String> {
        match self {
            Self::Int => {
                let n = match &value {
                    Value::Number(n) => n.as_i64(),
                    Value::String(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                match n.filter(|n| i32::try_from(*n).is_ok()) {
                    Some(n) => Ok(Value::from(n)),
                    None => Err(format!("{self} cannot represent {value}")),
                }
            }
            Self::Float => match value.as_f64().and_then(Number::from_f64) {
                Some(n) if value.is_number() => Ok(Value::Number(n)),
                _ => Err(format!("{self} cannot represent {value}")),
            },
            Self::String => match value {
                Value::String(_) => Ok(value),
                _ => Err(format!("{self} cannot represent {value}")),
            },
            Self::Boolean => match value {
                Value::Bool(_) => Ok(value),
                _ => Err(format!("{self} cannot represent {value}")),
            },
            Self::Id => match &value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::String(n.to_string())),
                _ => Err(format!("{self} cannot represent {value}")),
            },
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reference to a type from a field or argument declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    /// Wrap in non-null. Wrapping an already non-null type is a no-op.
    pub fn non_null(inner: TypeRef) -> Self {
        match inner {
            nn @ Self::NonNull(_) => nn,
            other => Self::NonNull(Box::new(other)),
        }
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        Self::named(scalar.name())
    }

    /// Name of the innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Coerce a JSON value to this input type.
    ///
    /// A single value given for a list type is wrapped. Object types are
    /// not input types.
    pub fn coerce_input(&self, value: Value) -> Result<Value, String> {
        match self {
            Self::NonNull(inner) => {
                if value.is_null() {
                    Err(format!("expected non-null value of type {self}"))
                } else {
                    inner.coerce_input(value)
                }
            }
            _ if value.is_null() => Ok(Value::Null),
            Self::List(inner) => match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| inner.coerce_input(item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                single => Ok(Value::Array(vec![inner.coerce_input(single)?])),
            },
            Self::Named(name) => match ScalarType::from_name(name) {
                Some(scalar) => scalar.coerce_input(value),
                None => Err(format!("{name} is not an input type")),
            },
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}
