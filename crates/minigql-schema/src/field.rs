use minigql_types::Value;

use crate::resolver::{FieldResult, ResolveParams, Resolver};
use crate::types::TypeRef;

/// Declaration of one field argument.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            description: None,
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

/// Declaration of one field on an object type.
#[derive(Debug)]
pub struct FieldDef<C> {
    pub name: String,
    pub ty: TypeRef,
    pub description: Option<String>,
    pub args: Vec<ArgumentDef>,
    pub(crate) resolver: Option<Resolver<C>>,
}

impl<C> FieldDef<C> {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            args: Vec::new(),
            resolver: None,
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn argument(mut self, arg: ArgumentDef) -> Self {
        self.args.push(arg);
        self
    }

    pub fn resolver(mut self, resolver: Resolver<C>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Bind a resolver closure.
    pub fn resolve<F>(self, func: F) -> Self
    where
        F: Fn(&ResolveParams<'_, C>) -> FieldResult<Value> + Send + Sync + 'static,
    {
        self.resolver(Resolver::new(func))
    }

    pub fn arg_def(&self, name: &str) -> Option<&ArgumentDef> {
        self.args.iter().find(|a| a.name == name)
    }

    /// The bound resolver. Always present on fields of a built schema.
    pub fn bound_resolver(&self) -> Option<&Resolver<C>> {
        self.resolver.as_ref()
    }
}

/// An object type: a name and an ordered list of fields.
#[derive(Debug)]
pub struct ObjectType<C> {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDef<C>>,
}

impl<C> ObjectType<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn field(mut self, field: FieldDef<C>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef<C>> {
        self.fields.iter().find(|f| f.name == name)
    }
}
