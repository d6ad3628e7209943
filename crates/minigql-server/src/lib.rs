//! HTTP server for minigql.
//!
//! Serves one demo GraphQL service over HTTP:
//!
//! | route | |
//! |---|---|
//! | `POST /graphql` | JSON `{"query", "variables", "operationName"}` body, or the raw document |
//! | `GET /graphql` | same, from the query string |
//! | `GET /` | GraphiQL page |
//! | `GET /health` | liveness and record count |
//! | `GET /schema` | SDL of the served schema |

pub mod config;
pub mod error;
mod graphiql;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::AppState;
pub use server::MiniGqlServer;
