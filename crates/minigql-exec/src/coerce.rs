//! Input and output coercion between literals, JSON values, and scalars.
//!
//! Input values are checked with [`minigql_schema::TypeRef::coerce_input`],
//! the same rule the schema applies to argument defaults when it is built.

use minigql_schema::{FieldDef, ScalarType};
use minigql_types::{Map, Value};
use serde_json::Number;

use crate::ast::{Field, InputValue, VariableDef};
use crate::error::{ExecError, ExecResult};

/// Coerce a resolved value to the scalar a field declares.
///
/// `Int` results must fit in 32 bits.
pub fn coerce_output(scalar: ScalarType, value: Value) -> Result<Value, String> {
    match scalar {
        ScalarType::Int => {
            let n = match &value {
                Value::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
                        .map(|f| f as i64)
                }),
                Value::Bool(b) => Some(i64::from(*b)),
                _ => None,
            };
            match n.and_then(|n| i32::try_from(n).ok()) {
                Some(n) => Ok(Value::from(n)),
                None => Err(format!("{scalar} cannot represent value {value}")),
            }
        }
        ScalarType::Float => match &value {
            Value::Number(_) => Ok(value.clone()),
            _ => Err(format!("{scalar} cannot represent value {value}")),
        },
        ScalarType::String => match &value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            Value::Bool(b) => Ok(Value::String(b.to_string())),
            _ => Err(format!("{scalar} cannot represent value {value}")),
        },
        ScalarType::Boolean => match &value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(format!("{scalar} cannot represent value {value}")),
        },
        ScalarType::Id => match &value {
            Value::String(_) => Ok(value.clone()),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::String(n.to_string())),
            _ => Err(format!("{scalar} cannot represent value {value}")),
        },
    }
}

/// Turn a literal into JSON, substituting variables.
///
/// Returns `Ok(None)` for a reference to a variable that was declared but
/// not supplied, which callers treat as an omitted argument.
fn resolve_literal(literal: &InputValue, variables: &Map) -> Result<Option<Value>, String> {
    let value = match literal {
        InputValue::Variable(name) => return Ok(variables.get(name).cloned()),
        InputValue::Null => Value::Null,
        InputValue::Int(i) => Value::from(*i),
        InputValue::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| format!("float {f} is not representable"))?,
        InputValue::String(s) => Value::String(s.clone()),
        InputValue::Boolean(b) => Value::Bool(*b),
        InputValue::Enum(name) => return Err(format!("unexpected enum value {name}")),
        InputValue::List(items) => Value::Array(
            items
                .iter()
                .map(|item| -> Result<Value, String> {
                    Ok(resolve_literal(item, variables)?.unwrap_or(Value::Null))
                })
                .collect::<Result<Vec<_>, String>>()?,
        ),
        InputValue::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| -> Result<(String, Value), String> {
                    Ok((k.clone(), resolve_literal(v, variables)?.unwrap_or(Value::Null)))
                })
                .collect::<Result<Map, String>>()?,
        ),
    };
    Ok(Some(value))
}

/// Coerce the operation's variables: supplied values first, then defaults.
///
/// Variables are keyed without the `$`. A missing non-null variable without
/// a default fails the request.
pub fn coerce_variables(defs: &[VariableDef], supplied: &Map) -> ExecResult<Map> {
    let mut out = Map::new();
    for def in defs {
        let invalid = |reason: String| ExecError::InvalidVariable {
            name: def.name.clone(),
            reason,
        };
        if ScalarType::from_name(def.ty.base_name()).is_none() {
            return Err(invalid(format!("{} is not an input type", def.ty)));
        }
        let raw = match supplied.get(&def.name) {
            Some(value) => Some(value.clone()),
            None => match &def.default {
                Some(literal) => resolve_literal(literal, &Map::new()).map_err(invalid)?,
                None => None,
            },
        };
        match raw {
            Some(value) => {
                let coerced = def.ty.coerce_input(value).map_err(invalid)?;
                out.insert(def.name.clone(), coerced);
            }
            None if def.ty.is_non_null() => {
                return Err(invalid(format!(
                    "required variable of type {} was not provided",
                    def.ty
                )));
            }
            None => {}
        }
    }
    Ok(out)
}

/// Coerce the arguments supplied to `field` against `def`'s argument schema.
pub fn coerce_arguments<C>(
    def: &FieldDef<C>,
    field: &Field,
    variables: &Map,
    declared: &[VariableDef],
) -> ExecResult<Map> {
    let arg_error = |argument: &str, reason: String| ExecError::ArgumentType {
        field: field.name.clone(),
        argument: argument.to_string(),
        reason,
    };

    let mut out = Map::new();
    for (name, literal) in &field.arguments {
        let arg_def = def
            .arg_def(name)
            .ok_or_else(|| arg_error(name, "unknown argument".into()))?;
        if let InputValue::Variable(var) = literal {
            if !declared.iter().any(|d| &d.name == var) {
                return Err(arg_error(name, format!("variable ${var} is not defined")));
            }
        }
        let resolved = resolve_literal(literal, variables).map_err(|r| arg_error(name, r))?;
        let Some(value) = resolved else {
            continue;
        };
        let coerced = arg_def.ty.coerce_input(value).map_err(|r| arg_error(name, r))?;
        out.insert(name.clone(), coerced);
    }

    for arg_def in &def.args {
        if out.contains_key(&arg_def.name) {
            continue;
        }
        match &arg_def.default {
            Some(default) => {
                out.insert(arg_def.name.clone(), default.clone());
            }
            None if arg_def.ty.is_non_null() => {
                return Err(arg_error(
                    &arg_def.name,
                    format!("required argument of type {} was not provided", arg_def.ty),
                ));
            }
            None => {}
        }
    }
    Ok(out)
}
