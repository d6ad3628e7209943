use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use minigql_catalog::{ServiceKind, ServiceOptions};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server settings, loadable from a TOML file.
///
/// Every key is optional:
///
/// ```toml
/// bind_addr = "0.0.0.0:8080"
/// service = "tutorials"
/// data_dir = "./data"
/// seed_on_start = true
/// graphiql = true
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub service: ServiceKind,
    /// Where JSON collections live. Unset means in-memory only.
    pub data_dir: Option<PathBuf>,
    pub seed_on_start: bool,
    /// Serve the GraphiQL page at `/`.
    pub graphiql: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            service: ServiceKind::Tutorials,
            data_dir: None,
            seed_on_start: true,
            graphiql: true,
        }
    }
}

impl ServerConfig {
    pub fn from_toml(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            kind: self.service,
            data_dir: self.data_dir.clone(),
            seed: self.seed_on_start,
        }
    }
}
