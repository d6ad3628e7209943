use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{SchemaError, SchemaResult};
use crate::field::ObjectType;
use crate::resolver::Resolver;
use crate::types::ScalarType;

/// Which root an operation starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RootKind {
    Query,
    Mutation,
}

impl RootKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// What a type name resolves to.
#[derive(Debug)]
pub enum TypeKind<'a, C> {
    Scalar(ScalarType),
    Object(&'a ObjectType<C>),
}

/// Collects type and root declarations, then validates them once.
pub struct SchemaBuilder<C> {
    types: Vec<ObjectType<C>>,
    names: HashSet<String>,
    query: Option<ObjectType<C>>,
    mutation: Option<ObjectType<C>>,
}

impl<C> SchemaBuilder<C> {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            names: ScalarType::ALL.iter().map(|s| s.name().to_string()).collect(),
            query: None,
            mutation: None,
        }
    }

    /// Register an object type.
    ///
    /// Fields without a resolver get [`Resolver::property`] for their own name.
    pub fn define_type(&mut self, mut ty: ObjectType<C>) -> SchemaResult<&mut Self> {
        self.claim_name(&ty)?;
        for field in &mut ty.fields {
            if field.resolver.is_none() {
                field.resolver = Some(Resolver::property(field.name.clone()));
            }
        }
        self.types.push(ty);
        Ok(self)
    }

    /// Register the query or mutation root. Every root field needs a resolver.
    pub fn define_root(&mut self, kind: RootKind, ty: ObjectType<C>) -> SchemaResult<&mut Self> {
        let slot = match kind {
            RootKind::Query => &self.query,
            RootKind::Mutation => &self.mutation,
        };
        if slot.is_some() {
            return Err(SchemaError::DuplicateRoot(kind.to_string()));
        }
        if let Some(field) = ty.fields.iter().find(|f| f.resolver.is_none()) {
            return Err(SchemaError::MissingResolver {
                type_name: ty.name.clone(),
                field: field.name.clone(),
            });
        }
        self.claim_name(&ty)?;
        match kind {
            RootKind::Query => self.query = Some(ty),
            RootKind::Mutation => self.mutation = Some(ty),
        }
        Ok(self)
    }

    fn claim_name(&mut self, ty: &ObjectType<C>) -> SchemaResult<()> {
        check_fields(ty)?;
        if !self.names.insert(ty.name.clone()) {
            return Err(SchemaError::DuplicateType(ty.name.clone()));
        }
        Ok(())
    }

    /// Validate every type reference and produce the immutable schema.
    pub fn build(self) -> SchemaResult<Schema<C>> {
        let query = self.query.ok_or(SchemaError::MissingQueryRoot)?;
        let types: HashMap<String, ObjectType<C>> = self
            .types
            .into_iter()
            .map(|ty| (ty.name.clone(), ty))
            .collect();
        let mut schema = Schema {
            order: {
                let mut order: Vec<String> = types.keys().cloned().collect();
                order.sort();
                order
            },
            types,
            query,
            mutation: self.mutation,
        };
        schema.check_references()?;
        schema.coerce_defaults()?;
        tracing::debug!(
            types = schema.types.len(),
            mutation = schema.mutation.is_some(),
            "schema built"
        );
        Ok(schema)
    }
}

impl<C> Default for SchemaBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_fields<C>(ty: &ObjectType<C>) -> SchemaResult<()> {
    if ty.fields.is_empty() {
        return Err(SchemaError::EmptyType(ty.name.clone()));
    }
    let mut seen = HashSet::new();
    for field in &ty.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                type_name: ty.name.clone(),
                field: field.name.clone(),
            });
        }
        let mut args = HashSet::new();
        for arg in &field.args {
            if !args.insert(arg.name.as_str()) {
                return Err(SchemaError::DuplicateArgument {
                    type_name: ty.name.clone(),
                    field: field.name.clone(),
                    argument: arg.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// A validated, immutable schema.
pub struct Schema<C> {
    types: HashMap<String, ObjectType<C>>,
    /// Type names sorted, for stable SDL output.
    order: Vec<String>,
    query: ObjectType<C>,
    mutation: Option<ObjectType<C>>,
}

impl<C> Schema<C> {
    pub fn query_root(&self) -> &ObjectType<C> {
        &self.query
    }

    pub fn mutation_root(&self) -> Option<&ObjectType<C>> {
        self.mutation.as_ref()
    }

    pub fn root(&self, kind: RootKind) -> Option<&ObjectType<C>> {
        match kind {
            RootKind::Query => Some(&self.query),
            RootKind::Mutation => self.mutation.as_ref(),
        }
    }

    /// A non-root object type by name.
    pub fn object(&self, name: &str) -> Option<&ObjectType<C>> {
        self.types.get(name)
    }

    /// Resolve a type name to a scalar or a non-root object type.
    pub fn kind_of(&self, name: &str) -> Option<TypeKind<'_, C>> {
        ScalarType::from_name(name)
            .map(TypeKind::Scalar)
            .or_else(|| self.object(name).map(TypeKind::Object))
    }

    /// Non-root object types, sorted by name.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectType<C>> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    fn check_references(&self) -> SchemaResult<()> {
        let all = self
            .objects()
            .chain(std::iter::once(&self.query))
            .chain(self.mutation.iter());
        for ty in all {
            for field in &ty.fields {
                let referenced = field.ty.base_name();
                if self.kind_of(referenced).is_none() {
                    return Err(SchemaError::UnknownType {
                        type_name: ty.name.clone(),
                        field: field.name.clone(),
                        referenced: referenced.to_string(),
                    });
                }
                for arg in &field.args {
                    let referenced = arg.ty.base_name();
                    if ScalarType::from_name(referenced).is_none() {
                        return Err(SchemaError::InvalidArgumentType {
                            type_name: ty.name.clone(),
                            field: field.name.clone(),
                            argument: arg.name.clone(),
                            referenced: referenced.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Coerce argument defaults to their declared types, in place, so the
    /// executor can hand them to resolvers as they are.
    fn coerce_defaults(&mut self) -> SchemaResult<()> {
        let all = std::iter::once(&mut self.query)
            .chain(self.mutation.as_mut())
            .chain(self.types.values_mut());
        for ty in all {
            for field in &mut ty.fields {
                for arg in &mut field.args {
                    let Some(default) = arg.default.take() else {
                        continue;
                    };
                    match arg.ty.coerce_input(default) {
                        Ok(value) => arg.default = Some(value),
                        Err(reason) => {
                            return Err(SchemaError::InvalidDefault {
                                type_name: ty.name.clone(),
                                field: field.name.clone(),
                                argument: arg.name.clone(),
                                reason,
                            })
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl<C> fmt::Debug for Schema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("types", &self.order)
            .field("query", &self.query.name)
            .field("mutation", &self.mutation.as_ref().map(|m| &m.name))
            .finish()
    }
}
