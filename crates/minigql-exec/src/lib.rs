//! Query executor for minigql.
//!
//! Turns a [`Request`](minigql_types::Request) into a
//! [`Response`](minigql_types::Response) against a
//! [`Schema`](minigql_schema::Schema):
//!
//! 1. [`parser`] builds a [`Document`] from the request text.
//! 2. The operation is chosen by name (or as the only one) and its root type
//!    looked up.
//! 3. Root fields are resolved in request order. Arguments are coerced to
//!    their declared scalar types by [`coerce`] first.
//! 4. Object and list values are completed recursively against the requested
//!    subfields.
//!
//! Parse and operation-selection failures abort the request. Every other
//! failure is scoped to one field: the error is recorded with its path, the
//! field becomes `null`, and its siblings still resolve.

pub mod ast;
pub mod coerce;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;

pub use ast::{Document, Field, InputValue, Operation, Pos, VariableDef};
pub use error::{ExecError, ExecResult};
pub use executor::{execute, Executor};
pub use parser::{parse, MAX_DEPTH};
