use minigql_schema::{ObjectType, ResolveParams, Schema, TypeKind, TypeRef};
use minigql_types::{Map, PathSegment, Request, Response, ResponseError, Value};
use tracing::debug;

use crate::ast::{Document, Field, Operation, VariableDef};
use crate::coerce::{coerce_arguments, coerce_output, coerce_variables};
use crate::error::{ExecError, ExecResult};
use crate::parser::parse;

const TYPENAME: &str = "__typename";

/// Parse and execute `request` against `schema`.
pub fn execute<C>(schema: &Schema<C>, context: &C, request: &Request) -> Response {
    Executor::new(schema).execute(context, request)
}

/// Runs requests against one schema.
pub struct Executor<'s, C> {
    schema: &'s Schema<C>,
}

impl<'s, C> Executor<'s, C> {
    pub fn new(schema: &'s Schema<C>) -> Self {
        Self { schema }
    }

    /// Execute a request, folding request-level failures into the envelope.
    pub fn execute(&self, context: &C, request: &Request) -> Response {
        let result = parse(&request.query).and_then(|doc| {
            self.execute_document(
                context,
                &doc,
                request.operation_name.as_deref(),
                &request.variables,
            )
        });
        match result {
            Ok((data, errors)) => Response::new(Value::Object(data), errors),
            Err(err) => {
                debug!(error = %err, "request rejected");
                Response::from_error(ResponseError::new(err.to_string()))
            }
        }
    }

    /// Execute an already-parsed document.
    ///
    /// Returns the result tree and the field errors collected on the way.
    /// `Err` means the request failed as a whole.
    pub fn execute_document(
        &self,
        context: &C,
        document: &Document,
        operation_name: Option<&str>,
        variables: &Map,
    ) -> ExecResult<(Map, Vec<ResponseError>)> {
        let operation = select_operation(document, operation_name)?;
        let root = self.schema.root(operation.kind).ok_or_else(|| {
            ExecError::UnknownOperation(format!("schema does not support {}", operation.kind))
        })?;
        let variables = coerce_variables(&operation.variables, variables)?;
        debug!(
            kind = %operation.kind,
            name = operation.name.as_deref().unwrap_or("<anonymous>"),
            fields = operation.selection.len(),
            "executing operation"
        );

        let mut run = Execution {
            schema: self.schema,
            context,
            variables,
            declared: &operation.variables,
            errors: Vec::new(),
        };
        let mut path = Vec::new();
        let data = run.selection_set(root, &Value::Null, &operation.selection, &mut path);
        Ok((data, run.errors))
    }
}

fn select_operation<'d>(document: &'d Document, name: Option<&str>) -> ExecResult<&'d Operation> {
    match name {
        Some(name) => document
            .operations
            .iter()
            .find(|op| op.name.as_deref() == Some(name))
            .ok_or_else(|| ExecError::UnknownOperation(format!("no operation named {name}"))),
        None => match document.operations.as_slice() {
            [only] => Ok(only),
            _ => Err(ExecError::UnknownOperation(
                "an operation name is required when the document has several operations".into(),
            )),
        },
    }
}

/// State of one operation run.
struct Execution<'a, C> {
    schema: &'a Schema<C>,
    context: &'a C,
    variables: Map,
    declared: &'a [VariableDef],
    errors: Vec<ResponseError>,
}

impl<C> Execution<'_, C> {
    fn record(&mut self, path: &[PathSegment], err: ExecError) {
        debug!(path = ?path, error = %err, "field error");
        self.errors.push(ResponseError::at(err.to_string(), path.to_vec()));
    }

    /// Resolve every field of `selection` on `ty`, in request order.
    fn selection_set(
        &mut self,
        ty: &ObjectType<C>,
        parent: &Value,
        selection: &[Field],
        path: &mut Vec<PathSegment>,
    ) -> Map {
        let mut out = Map::new();
        for field in selection {
            path.push(PathSegment::Key(field.response_key().to_string()));
            let value = match self.field(ty, parent, field, path) {
                Ok(value) => value,
                Err(err) => {
                    self.record(path, err);
                    Value::Null
                }
            };
            path.pop();
            out.insert(field.response_key().to_string(), value);
        }
        out
    }

    fn field(
        &mut self,
        ty: &ObjectType<C>,
        parent: &Value,
        field: &Field,
        path: &mut Vec<PathSegment>,
    ) -> ExecResult<Value> {
        if field.name == TYPENAME {
            return Ok(Value::String(ty.name.clone()));
        }
        let def = ty.field_def(&field.name).ok_or_else(|| ExecError::UnknownField {
            type_name: ty.name.clone(),
            field: field.name.clone(),
        })?;
        self.check_shape(&def.ty, field)?;
        let args = coerce_arguments(def, field, &self.variables, self.declared)?;
        let resolver = def.bound_resolver().ok_or_else(|| {
            ExecError::FieldResolution(format!("{}.{} has no resolver", ty.name, def.name))
        })?;
        let value = resolver
            .call(&ResolveParams {
                parent,
                args: &args,
                context: self.context,
                path: path.as_slice(),
                field_name: &field.name,
            })
            .map_err(|e| ExecError::FieldResolution(e.message))?;
        self.complete(&def.ty, value, field, path)
    }

    /// Objects need subfields and scalars must not have any.
    fn check_shape(&self, ty: &TypeRef, field: &Field) -> ExecResult<()> {
        let base = ty.base_name();
        match self.schema.kind_of(base) {
            Some(TypeKind::Scalar(_)) if !field.selection.is_empty() => Err(ExecError::Completion(
                format!("field \"{}\" of type \"{ty}\" must not have a selection", field.name),
            )),
            Some(TypeKind::Object(_)) if field.selection.is_empty() => {
                Err(ExecError::Completion(format!(
                    "field \"{}\" of type \"{ty}\" must have a selection of subfields",
                    field.name
                )))
            }
            Some(_) => Ok(()),
            None => Err(ExecError::Completion(format!("unknown type {base}"))),
        }
    }

    /// Shape `value` to the declared type, recursing into objects and lists.
    fn complete(
        &mut self,
        ty: &TypeRef,
        value: Value,
        field: &Field,
        path: &mut Vec<PathSegment>,
    ) -> ExecResult<Value> {
        let schema = self.schema;
        match ty {
            TypeRef::NonNull(inner) => {
                let completed = self.complete(inner, value, field, path)?;
                if completed.is_null() {
                    return Err(ExecError::Completion(format!(
                        "cannot return null for non-nullable field \"{}\"",
                        field.name
                    )));
                }
                Ok(completed)
            }
            _ if value.is_null() => Ok(Value::Null),
            TypeRef::List(inner) => {
                let Value::Array(items) = value else {
                    return Err(ExecError::Completion(format!(
                        "expected a list for field \"{}\"",
                        field.name
                    )));
                };
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    let completed = match self.complete(inner, item, field, path) {
                        Ok(v) => v,
                        Err(err) => {
                            self.record(path, err);
                            Value::Null
                        }
                    };
                    path.pop();
                    out.push(completed);
                }
                Ok(Value::Array(out))
            }
            TypeRef::Named(name) => match schema.kind_of(name) {
                Some(TypeKind::Scalar(scalar)) => {
                    coerce_output(scalar, value).map_err(ExecError::Completion)
                }
                Some(TypeKind::Object(object)) => {
                    if !value.is_object() {
                        return Err(ExecError::Completion(format!(
                            "expected an object of type \"{name}\" for field \"{}\"",
                            field.name
                        )));
                    }
                    Ok(Value::Object(self.selection_set(
                        object,
                        &value,
                        &field.selection,
                        path,
                    )))
                }
                None => Err(ExecError::Completion(format!("unknown type {name}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use minigql_schema::{
        ArgumentDef, FieldDef, FieldError, ObjectType, RootKind, ScalarType, SchemaBuilder,
    };
    use serde_json::json;

    /// Context: a list of items plus a counter bumped by the mutation.
    struct Ctx {
        items: Mutex<Vec<Value>>,
    }

    fn ctx() -> Ctx {
        Ctx {
            items: Mutex::new(vec![
                json!({"id": 1, "name": "one", "tags": ["a"]}),
                json!({"id": 2, "name": "two", "tags": []}),
            ]),
        }
    }

    fn schema() -> Schema<Ctx> {
        let int = || TypeRef::scalar(ScalarType::Int);
        let string = || TypeRef::scalar(ScalarType::String);
        let mut b = SchemaBuilder::<Ctx>::new();
        b.define_type(
            ObjectType::new("Item")
                .field(FieldDef::new("id", TypeRef::non_null(int())))
                .field(FieldDef::new("name", string()))
                .field(FieldDef::new("tags", TypeRef::list(string())))
                .field(FieldDef::new("fragile", string()).resolve(|p| {
                    if p.parent["id"] == json!(2) {
                        Err(FieldError::new("fragile item"))
                    } else {
                        Ok(json!("fine"))
                    }
                }))
                .field(FieldDef::new("missing", TypeRef::non_null(string()))),
        )
        .unwrap();
        b.define_root(
            RootKind::Query,
            ObjectType::new("RootQuery")
                .field(
                    FieldDef::<Ctx>::new("items", TypeRef::list(TypeRef::named("Item")))
                        .resolve(|p| Ok(Value::Array(p.context.items.lock().unwrap().clone()))),
                )
                .field(
                    FieldDef::<Ctx>::new("item", TypeRef::named("Item"))
                        .argument(ArgumentDef::new("id", int()))
                        .resolve(|p| {
                            let id = p.arg_i64("id");
                            let items = p.context.items.lock().unwrap();
                            Ok(items
                                .iter()
                                .find(|i| i["id"].as_i64() == id)
                                .cloned()
                                .unwrap_or(Value::Null))
                        }),
                )
                .field(FieldDef::new("greeting", string()).resolve(|_| Ok(json!("hello"))))
                .field(
                    FieldDef::new("broken", string())
                        .resolve(|_| Err(FieldError::new("resolver failed"))),
                )
                .field(FieldDef::new("wrongShape", TypeRef::list(int())).resolve(|_| Ok(json!(3)))),
        )
        .unwrap();
        b.define_root(
            RootKind::Mutation,
            ObjectType::new("Mutation").field(
                FieldDef::<Ctx>::new("add", TypeRef::named("Item"))
                    .argument(ArgumentDef::new("name", TypeRef::non_null(string())))
                    .resolve(|p| {
                        let mut items = p.context.items.lock().unwrap();
                        let name = p.required_str("name")?;
                        let item = json!({"id": items.len() + 1, "name": name, "tags": []});
                        items.push(item.clone());
                        Ok(item)
                    }),
            ),
        )
        .unwrap();
        b.build().unwrap()
    }

    fn run(query: &str) -> Response {
        execute(&schema(), &ctx(), &Request::new(query))
    }

    #[test]
    fn selects_only_requested_fields_in_order() {
        let resp = run("{ items { name id } }");
        assert!(resp.is_ok(), "{:?}", resp.errors);
        let data = resp.data.unwrap();
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"items":[{"name":"one","id":1},{"name":"two","id":2}]}"#
        );
    }

    #[test]
    fn sibling_error_is_partial() {
        let resp = run("{ greeting broken }");
        assert!(resp.is_partial());
        assert_eq!(resp.data.unwrap(), json!({"greeting": "hello", "broken": null}));
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].path, vec![PathSegment::from("broken")]);
        assert_eq!(resp.errors[0].message, "resolver failed");
    }

    #[test]
    fn nested_error_path_includes_list_index() {
        let resp = run("{ items { id fragile } }");
        assert_eq!(
            resp.data.unwrap(),
            json!({"items": [{"id": 1, "fragile": "fine"}, {"id": 2, "fragile": null}]})
        );
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].path_string(), "items.1.fragile");
    }

    #[test]
    fn unknown_field_is_scoped() {
        let resp = run("{ greeting nope }");
        assert_eq!(resp.data.unwrap(), json!({"greeting": "hello", "nope": null}));
        assert_eq!(
            resp.errors[0].message,
            "cannot query field \"nope\" on type \"RootQuery\""
        );
    }

    #[test]
    fn argument_type_error_is_scoped() {
        let resp = run(r#"{ greeting item(id: "abc") { name } }"#);
        assert_eq!(resp.data.unwrap(), json!({"greeting": "hello", "item": null}));
        assert_eq!(resp.errors.len(), 1);
        assert!(resp.errors[0].message.contains("Int cannot represent"));
        assert_eq!(resp.errors[0].path_string(), "item");
    }

    #[test]
    fn absent_record_is_null_without_error() {
        let resp = run("{ item(id: 42) { name } }");
        assert!(resp.is_ok());
        assert_eq!(resp.data.unwrap(), json!({"item": null}));
    }

    #[test]
    fn selection_shape_is_checked() {
        let resp = run("{ greeting { x } items }");
        assert_eq!(resp.data.unwrap(), json!({"greeting": null, "items": null}));
        assert_eq!(resp.errors.len(), 2);
        assert!(resp.errors[0].message.contains("must not have a selection"));
        assert!(resp.errors[1].message.contains("must have a selection of subfields"));
    }

    #[test]
    fn non_null_violation() {
        let resp = run("{ item(id: 1) { id missing } }");
        assert_eq!(resp.data.unwrap(), json!({"item": {"id": 1, "missing": null}}));
        assert_eq!(resp.errors[0].path_string(), "item.missing");
    }

    #[test]
    fn list_shape_mismatch() {
        let resp = run("{ wrongShape }");
        assert_eq!(resp.data.unwrap(), json!({"wrongShape": null}));
        assert!(resp.errors[0].message.contains("expected a list"));
    }

    #[test]
    fn aliases_and_typename() {
        let resp = run("{ a: item(id: 1) { __typename name } b: item(id: 2) { name } }");
        assert_eq!(
            resp.data.unwrap(),
            json!({"a": {"__typename": "Item", "name": "one"}, "b": {"name": "two"}})
        );
    }

    #[test]
    fn mutation_appends() {
        let schema = schema();
        let ctx = ctx();
        let add = Request::new(r#"mutation { add(name: "three") { id name } }"#);
        let resp = execute(&schema, &ctx, &add);
        assert_eq!(resp.data.unwrap(), json!({"add": {"id": 3, "name": "three"}}));
        let list = execute(&schema, &ctx, &Request::new("{ items { id } }"));
        assert_eq!(list.data.unwrap()["items"][2], json!({"id": 3}));
    }

    #[test]
    fn missing_required_argument() {
        let resp = run("mutation { add { id } }");
        assert_eq!(resp.data.unwrap(), json!({"add": null}));
        assert!(resp.errors[0].message.contains("was not provided"));
    }

    #[test]
    fn variables_flow_into_arguments() {
        let mut vars = Map::new();
        vars.insert("id".into(), json!(2));
        let req = Request::new("query Q($id: Int) { item(id: $id) { name } }").with_variables(vars);
        let resp = execute(&schema(), &ctx(), &req);
        assert_eq!(resp.data.unwrap(), json!({"item": {"name": "two"}}));
    }

    #[test]
    fn parse_error_has_no_data() {
        let resp = run("{ items { id }");
        assert!(resp.data.is_none());
        assert_eq!(resp.errors.len(), 1);
        assert!(resp.errors[0].message.starts_with("syntax error"));
        assert!(resp.errors[0].path.is_empty());
    }

    #[test]
    fn operation_selection() {
        let doc = "query A { greeting } query B { items { id } }";
        let resp = execute(&schema(), &ctx(), &Request::new(doc).with_operation_name("B"));
        assert_eq!(resp.data.unwrap(), json!({"items": [{"id": 1}, {"id": 2}]}));

        let resp = execute(&schema(), &ctx(), &Request::new(doc));
        assert!(resp.data.is_none());
        assert!(resp.errors[0].message.starts_with("unknown operation"));

        let resp = execute(&schema(), &ctx(), &Request::new(doc).with_operation_name("C"));
        assert!(resp.errors[0].message.contains("no operation named C"));
    }

    #[test]
    fn missing_mutation_root() {
        let mut b = SchemaBuilder::<()>::new();
        b.define_root(
            RootKind::Query,
            ObjectType::new("Q").field(
                FieldDef::new("x", TypeRef::scalar(ScalarType::Int)).resolve(|_| Ok(json!(1))),
            ),
        )
        .unwrap();
        let schema = b.build().unwrap();
        let resp = execute(&schema, &(), &Request::new("mutation { x }"));
        assert!(resp.data.is_none());
        assert_eq!(resp.errors[0].message, "unknown operation: schema does not support mutation");
    }

    #[test]
    fn repeated_queries_are_identical() {
        let schema = schema();
        let ctx = ctx();
        let first = execute(&schema, &ctx, &Request::new("{ items { id name tags } }"));
        let second = execute(&schema, &ctx, &Request::new("{ items { id name tags } }"));
        assert_eq!(first, second);
    }
}
