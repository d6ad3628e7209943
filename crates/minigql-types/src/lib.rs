//! Foundation types for minigql.
//!
//! Every other minigql crate depends on `minigql-types`. It holds the shapes
//! that cross crate boundaries: the inbound [`Request`], the outbound
//! [`Response`] envelope, error paths, and record identifiers.
//!
//! # Key Types
//!
//! - [`Request`]: document text plus optional operation name and variables
//! - [`Response`]: the `{data, errors}` envelope returned to clients
//! - [`ResponseError`]: one error entry, with the field path it applies to
//! - [`PathSegment`]: a response key or list index inside a path
//! - [`RecordKey`]: integer or string identifier of a stored record

pub mod error;
pub mod key;
pub mod request;
pub mod response;

pub use error::TypeError;
pub use key::RecordKey;
pub use request::Request;
pub use response::{PathSegment, Response, ResponseError};

/// Dynamic value flowing through resolvers and into result trees.
pub type Value = serde_json::Value;

/// Ordered string-keyed map of [`Value`]s. Insertion order is preserved.
pub type Map = serde_json::Map<String, Value>;
