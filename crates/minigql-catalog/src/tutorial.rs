//! The tutorials dataset.

use std::sync::Arc;

use minigql_schema::{
    to_value, ArgumentDef, FieldDef, FieldResult, ObjectType, ResolveParams, RootKind, ScalarType,
    Schema, SchemaBuilder, SchemaResult, TypeRef,
};
use minigql_store::{Record, RecordStore};
use minigql_types::{RecordKey, Value};
use serde::{Deserialize, Serialize};

use crate::store_error;

/// Resolver context for the tutorials schema.
pub type TutorialStore = Arc<dyn RecordStore<Tutorial>>;

/// Database the tutorials collection lives in.
pub const DATABASE: &str = "miniGraphql";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tutorial {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Author of a tutorial. Field names are capitalised on the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Tutorials", default)]
    pub tutorials: Vec<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub body: String,
}

impl Tutorial {
    /// An unsaved tutorial. The store assigns its id on `create`.
    pub fn draft(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl Comment {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl Record for Tutorial {
    const COLLECTION: &'static str = "tutorial";

    fn key(&self) -> RecordKey {
        RecordKey::Int(self.id)
    }

    fn assign_key(&mut self, seq: i64) {
        self.id = seq;
    }
}

/// The records every tutorials service starts with.
pub fn mock_tutorials() -> Vec<Tutorial> {
    let author = Author {
        name: "Elliot Forbes".into(),
        tutorials: vec![1, 2],
    };
    vec![
        Tutorial {
            id: 1,
            title: "Go GraphQL Tutorial".into(),
            author: Some(author.clone()),
            comments: vec![Comment::new("First Comment")],
        },
        Tutorial {
            id: 2,
            title: "Go GraphQL Tutorial - Part 2".into(),
            author: Some(author),
            comments: vec![Comment::new("Second Comment")],
        },
    ]
}

fn tutorial_by_id(p: &ResolveParams<'_, TutorialStore>) -> FieldResult<Value> {
    let Some(id) = p.arg_i64("id") else {
        return Ok(Value::Null);
    };
    match p.context.get(&RecordKey::Int(id)).map_err(|e| store_error(p, e))? {
        Some(tutorial) => to_value(&tutorial),
        None => Ok(Value::Null),
    }
}

fn list_tutorials(p: &ResolveParams<'_, TutorialStore>) -> FieldResult<Value> {
    let tutorials = p.context.list().map_err(|e| store_error(p, e))?;
    to_value(&tutorials)
}

fn create_tutorial(p: &ResolveParams<'_, TutorialStore>) -> FieldResult<Value> {
    let title = p.required_str("title")?;
    let created = p.context.create(Tutorial::draft(title)).map_err(|e| store_error(p, e))?;
    to_value(&created)
}

/// Build the tutorials schema.
///
/// ```graphql
/// type RootQuery { tutorial(id: Int): Tutorial  list: [Tutorial] }
/// type Mutation { create(title: String!): Tutorial }
/// ```
pub fn schema() -> SchemaResult<Schema<TutorialStore>> {
    let mut builder = SchemaBuilder::new();
    builder
        .define_type(
            ObjectType::new("Author")
                .field(FieldDef::new("Name", TypeRef::scalar(ScalarType::String)))
                .field(FieldDef::new(
                    "Tutorials",
                    TypeRef::list(TypeRef::scalar(ScalarType::Int)),
                )),
        )?
        .define_type(
            ObjectType::new("Comment")
                .field(FieldDef::new("body", TypeRef::scalar(ScalarType::String))),
        )?
        .define_type(
            ObjectType::new("Tutorial")
                .field(FieldDef::new("id", TypeRef::scalar(ScalarType::Int)))
                .field(FieldDef::new("title", TypeRef::scalar(ScalarType::String)))
                .field(FieldDef::new("author", TypeRef::named("Author")))
                .field(FieldDef::new(
                    "comments",
                    TypeRef::list(TypeRef::named("Comment")),
                )),
        )?
        .define_root(
            RootKind::Query,
            ObjectType::new("RootQuery")
                .field(
                    FieldDef::new("tutorial", TypeRef::named("Tutorial"))
                        .description("Get Tutorial By ID")
                        .argument(
                            ArgumentDef::new("id", TypeRef::scalar(ScalarType::Int))
                                .description("Numeric tutorial id"),
                        )
                        .resolve(tutorial_by_id),
                )
                .field(
                    FieldDef::new("list", TypeRef::list(TypeRef::named("Tutorial")))
                        .description("Get Tutorial List")
                        .resolve(list_tutorials),
                ),
        )?
        .define_root(
            RootKind::Mutation,
            ObjectType::new("Mutation").field(
                FieldDef::new("create", TypeRef::named("Tutorial"))
                    .description("Create a new Tutorial")
                    .argument(ArgumentDef::new(
                        "title",
                        TypeRef::non_null(TypeRef::scalar(ScalarType::String)),
                    ))
                    .resolve(create_tutorial),
            ),
        )?;
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minigql_exec::execute;
    use minigql_store::InMemoryRecordStore;
    use minigql_types::{PathSegment, Request, Response};
    use serde_json::json;

    fn seeded() -> (Schema<TutorialStore>, TutorialStore) {
        let store: TutorialStore =
            Arc::new(InMemoryRecordStore::with_records(mock_tutorials()).unwrap());
        (schema().unwrap(), store)
    }

    fn run(schema: &Schema<TutorialStore>, store: &TutorialStore, query: &str) -> Response {
        execute(schema, store, &Request::new(query))
    }

    #[test]
    fn list_returns_seeded_tutorials_in_order() {
        let (schema, store) = seeded();
        let resp = run(
            &schema,
            &store,
            "{ list { id title comments { body } author { Name Tutorials } } }",
        );
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        assert_eq!(
            resp.data.unwrap(),
            json!({"list": [
                {
                    "id": 1,
                    "title": "Go GraphQL Tutorial",
                    "comments": [{"body": "First Comment"}],
                    "author": {"Name": "Elliot Forbes", "Tutorials": [1, 2]}
                },
                {
                    "id": 2,
                    "title": "Go GraphQL Tutorial - Part 2",
                    "comments": [{"body": "Second Comment"}],
                    "author": {"Name": "Elliot Forbes", "Tutorials": [1, 2]}
                }
            ]})
        );
    }

    #[test]
    fn list_with_partial_selection_has_only_requested_keys() {
        let (schema, store) = seeded();
        let data = run(&schema, &store, "{ list { id title } }").data.unwrap();
        let list = data["list"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        for entry in list {
            let keys: Vec<_> = entry.as_object().unwrap().keys().collect();
            assert_eq!(keys, ["id", "title"]);
        }
    }

    #[test]
    fn tutorial_by_id_finds_record() {
        let (schema, store) = seeded();
        let resp = run(&schema, &store, "{ tutorial(id: 2) { title } }");
        assert_eq!(
            resp.data.unwrap(),
            json!({"tutorial": {"title": "Go GraphQL Tutorial - Part 2"}})
        );
    }

    #[test]
    fn missing_tutorial_is_null_without_errors() {
        let (schema, store) = seeded();
        let resp = run(&schema, &store, "{ tutorial(id: 99) { title } }");
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.unwrap(), json!({"tutorial": null}));

        let resp = run(&schema, &store, "{ tutorial { title } }");
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.unwrap(), json!({"tutorial": null}));
    }

    #[test]
    fn non_numeric_id_is_a_field_error() {
        let (schema, store) = seeded();
        let resp = run(&schema, &store, r#"{ tutorial(id: "abc") { title } list { id } }"#);
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(resp.errors[0].path, vec![PathSegment::from("tutorial")]);
        let data = resp.data.unwrap();
        assert_eq!(data["tutorial"], Value::Null);
        assert_eq!(data["list"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn create_appends_exactly_one_record() {
        let (schema, store) = seeded();
        let resp = run(
            &schema,
            &store,
            r#"mutation {
                create(title: "Rust GraphQL") { id title author { Name } comments { body } }
            }"#,
        );
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        assert_eq!(
            resp.data.unwrap(),
            json!({"create": {"id": 3, "title": "Rust GraphQL", "author": null, "comments": []}})
        );

        let data = run(&schema, &store, "{ list { title } }").data.unwrap();
        let titles: Vec<_> = data["list"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            titles,
            ["Go GraphQL Tutorial", "Go GraphQL Tutorial - Part 2", "Rust GraphQL"]
        );
    }

    #[test]
    fn created_tutorial_is_retrievable_by_id() {
        let (schema, store) = seeded();
        run(&schema, &store, r#"mutation { create(title: "a") { id } }"#);
        let resp = run(&schema, &store, r#"mutation { create(title: "b") { id } }"#);
        assert_eq!(resp.data.unwrap(), json!({"create": {"id": 4}}));

        let resp = run(&schema, &store, "{ tutorial(id: 4) { title } }");
        assert_eq!(resp.data.unwrap(), json!({"tutorial": {"title": "b"}}));
    }

    #[test]
    fn create_without_title_fails_and_stores_nothing() {
        let (schema, store) = seeded();
        let resp = run(&schema, &store, "mutation { create { id } }");
        assert_eq!(resp.errors.len(), 1);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn read_queries_are_idempotent() {
        let (schema, store) = seeded();
        let query = "{ list { id title author { Name } } tutorial(id: 1) { comments { body } } }";
        let first = run(&schema, &store, query);
        let second = run(&schema, &store, query);
        assert_eq!(first, second);
    }

    #[test]
    fn author_json_uses_capitalised_names() {
        let author = Author {
            name: "Elliot Forbes".into(),
            tutorials: vec![1],
        };
        assert_eq!(
            serde_json::to_value(&author).unwrap(),
            json!({"Name": "Elliot Forbes", "Tutorials": [1]})
        );
    }
}
