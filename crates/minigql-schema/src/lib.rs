//! Schema registry for minigql.
//!
//! A schema is a set of object types plus a query root and an optional
//! mutation root. It is declared once at startup through [`SchemaBuilder`],
//! validated by [`SchemaBuilder::build`], and then shared read-only by every
//! request.
//!
//! Every field carries a [`Resolver`]. Root fields must supply one
//! explicitly; other fields default to [`Resolver::property`], which reads
//! the same-named key from the parent value. There is no runtime reflection.
//!
//! ```
//! use minigql_schema::{FieldDef, ObjectType, Resolver, RootKind, SchemaBuilder, TypeRef};
//! use serde_json::json;
//!
//! let mut builder = SchemaBuilder::<()>::new();
//! builder
//!     .define_type(
//!         ObjectType::new("Comment").field(FieldDef::new("body", TypeRef::named("String"))),
//!     )
//!     .unwrap();
//! builder
//!     .define_root(
//!         RootKind::Query,
//!         ObjectType::new("Query").field(
//!             FieldDef::new("hello", TypeRef::named("String"))
//!                 .resolve(|_| Ok(json!("world"))),
//!         ),
//!     )
//!     .unwrap();
//! let schema = builder.build().unwrap();
//! assert!(schema.object("Comment").is_some());
//! ```

pub mod error;
pub mod field;
pub mod registry;
pub mod resolver;
pub mod sdl;
pub mod types;

pub use error::{SchemaError, SchemaResult};
pub use field::{ArgumentDef, FieldDef, ObjectType};
pub use registry::{RootKind, Schema, SchemaBuilder, TypeKind};
pub use resolver::{to_value, FieldError, FieldResult, ResolveParams, Resolver};
pub use types::{ScalarType, TypeRef};
