use std::fmt;
use std::sync::Arc;

use minigql_types::{Map, PathSegment, Value};
use serde::Serialize;

/// Error returned by a resolver. Scoped to the field that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FieldError {}

impl From<serde_json::Error> for FieldError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("serialization error: {e}"))
    }
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Convert a typed record into the dynamic value resolvers hand back.
pub fn to_value<T: Serialize>(value: &T) -> FieldResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Everything a resolver is called with.
pub struct ResolveParams<'a, C> {
    /// Value of the enclosing object. `Null` for root fields.
    pub parent: &'a Value,
    /// Arguments after variable substitution and coercion.
    pub args: &'a Map,
    /// Shared per-schema context, e.g. a record store handle.
    pub context: &'a C,
    /// Path of this field in the response.
    pub path: &'a [PathSegment],
    pub field_name: &'a str,
}

impl<C> ResolveParams<'_, C> {
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    pub fn arg_i64(&self, name: &str) -> Option<i64> {
        self.arg(name).and_then(Value::as_i64)
    }

    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.arg(name).and_then(Value::as_str)
    }

    /// A required string argument. Coercion already rejects a missing
    /// non-null argument, so the error here only fires on schema mistakes.
    pub fn required_str(&self, name: &str) -> FieldResult<&str> {
        self.arg_str(name)
            .ok_or_else(|| FieldError::new(format!("missing argument {name}")))
    }
}

type ResolveFn<C> = dyn Fn(&ResolveParams<'_, C>) -> FieldResult<Value> + Send + Sync;

/// A function producing a field's value from its parent and arguments.
pub struct Resolver<C> {
    func: Arc<ResolveFn<C>>,
}

impl<C> Resolver<C> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&ResolveParams<'_, C>) -> FieldResult<Value> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Resolver reading `key` from the parent object.
    ///
    /// A missing key or a non-object parent resolves to `null`.
    pub fn property(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(move |params| Ok(params.parent.get(&key).cloned().unwrap_or(Value::Null)))
    }

    pub fn call(&self, params: &ResolveParams<'_, C>) -> FieldResult<Value> {
        (self.func)(params)
    }
}

impl<C> Clone for Resolver<C> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<C> fmt::Debug for Resolver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(resolver: &Resolver<()>, parent: &Value, args: &Map) -> FieldResult<Value> {
        resolver.call(&ResolveParams {
            parent,
            args,
            context: &(),
            path: &[],
            field_name: "f",
        })
    }

    #[test]
    fn property_reads_parent_key() {
        let r = Resolver::property("title");
        let parent = json!({"id": 1, "title": "Go GraphQL Tutorial"});
        assert_eq!(call(&r, &parent, &Map::new()).unwrap(), json!("Go GraphQL Tutorial"));
    }

    #[test]
    fn property_on_missing_key_or_null_parent_is_null() {
        let r = Resolver::property("author");
        assert_eq!(call(&r, &json!({"id": 1}), &Map::new()).unwrap(), Value::Null);
        assert_eq!(call(&r, &Value::Null, &Map::new()).unwrap(), Value::Null);
    }

    #[test]
    fn custom_resolver_sees_args() {
        let r = Resolver::new(|p| match p.arg_i64("id") {
            Some(id) => Ok(json!(id * 2)),
            None => Err(FieldError::new("no id")),
        });
        let mut args = Map::new();
        args.insert("id".into(), json!(21));
        assert_eq!(call(&r, &Value::Null, &args).unwrap(), json!(42));
        assert_eq!(call(&r, &Value::Null, &Map::new()).unwrap_err().message, "no id");
    }

    #[test]
    fn null_argument_reads_as_absent() {
        let mut args = Map::new();
        args.insert("id".into(), Value::Null);
        let r = Resolver::<()>::new(|p| Ok(json!(p.arg("id").is_none())));
        assert_eq!(call(&r, &Value::Null, &args).unwrap(), json!(true));
    }
}
