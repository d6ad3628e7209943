//! Demo datasets served by minigql.
//!
//! Two services share the same engine:
//!
//! - [`tutorial`]: `Tutorial` records with an embedded author and comments.
//!   Queries `tutorial(id: Int)` and `list`, mutation `create(title: String!)`.
//! - [`post`]: `Post` records looked up by slug with `post(slug: String!)`.
//!
//! [`service::open_service`] wires one of them together: it seeds the
//! document collection with the mock records, hydrates a shared record
//! store from it, and binds the schema to that store.

pub mod error;
pub mod post;
pub mod service;
pub mod tutorial;

pub use error::{CatalogError, CatalogResult};
pub use post::Post;
pub use service::{
    open_service, seed_collection, GraphQlService, Service, ServiceKind, ServiceOptions,
};
pub use tutorial::{Author, Comment, Tutorial};

use minigql_schema::{FieldError, ResolveParams};
use minigql_store::StoreError;

/// Store failures surface to clients as field errors, logged with the
/// response path of the field that hit them.
pub(crate) fn store_error<C>(p: &ResolveParams<'_, C>, err: StoreError) -> FieldError {
    tracing::warn!(field = p.field_name, path = ?p.path, error = %err, "record store failure");
    FieldError::new(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minigql_types::{Map, PathSegment, RecordKey, Value};

    #[test]
    fn store_failures_become_field_errors() {
        let args = Map::new();
        let path = [PathSegment::from("create")];
        let p = ResolveParams {
            parent: &Value::Null,
            args: &args,
            context: &(),
            path: &path,
            field_name: "create",
        };
        let err = store_error(&p, StoreError::DuplicateKey(RecordKey::Int(3)));
        assert_eq!(err.message, "duplicate record key: 3");
    }
}
