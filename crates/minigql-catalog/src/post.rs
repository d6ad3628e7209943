//! The posts dataset: blog posts looked up by slug.

use std::sync::Arc;

use minigql_schema::{
    to_value, ArgumentDef, FieldDef, FieldResult, ObjectType, ResolveParams, RootKind, ScalarType,
    Schema, SchemaBuilder, SchemaResult, TypeRef,
};
use minigql_store::{Record, RecordStore};
use minigql_types::{RecordKey, Value};
use serde::{Deserialize, Serialize};

use crate::store_error;

pub type PostStore = Arc<dyn RecordStore<Post>>;

pub const DATABASE: &str = "minimalGraphql";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,
}

impl Post {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: title.into(),
        }
    }
}

impl Record for Post {
    const COLLECTION: &'static str = "post";

    fn key(&self) -> RecordKey {
        RecordKey::from(self.id.as_str())
    }

    fn assign_key(&mut self, seq: i64) {
        self.id = seq.to_string();
    }
}

pub fn mock_posts() -> Vec<Post> {
    vec![
        Post::new("1", "first-post", "First post"),
        Post::new("2", "second-post", "Second post"),
        Post::new("3", "third-post", "Third post"),
    ]
}

fn post_by_slug(p: &ResolveParams<'_, PostStore>) -> FieldResult<Value> {
    let slug = p.required_str("slug")?;
    match p.context.find(&|post: &Post| post.slug == slug).map_err(|e| store_error(p, e))? {
        Some(post) => to_value(&post),
        None => Ok(Value::Null),
    }
}

/// Build the posts schema.
pub fn schema() -> SchemaResult<Schema<PostStore>> {
    let required = |scalar| TypeRef::non_null(TypeRef::scalar(scalar));
    let mut builder = SchemaBuilder::new();
    builder
        .define_type(
            ObjectType::new("Post")
                .field(FieldDef::new("id", required(ScalarType::Id)))
                .field(FieldDef::new("slug", required(ScalarType::String)))
                .field(FieldDef::new("title", required(ScalarType::String))),
        )?
        .define_root(
            RootKind::Query,
            ObjectType::new("Query").field(
                FieldDef::new("post", TypeRef::named("Post"))
                    .argument(ArgumentDef::new("slug", required(ScalarType::String)))
                    .resolve(post_by_slug),
            ),
        )?;
    builder.build()
}
