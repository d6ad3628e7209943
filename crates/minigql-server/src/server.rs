use std::sync::Arc;

use minigql_catalog::{open_service, GraphQlService};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// HTTP front end for one GraphQL service.
pub struct MiniGqlServer {
    config: ServerConfig,
    service: Arc<dyn GraphQlService>,
}

impl MiniGqlServer {
    /// Open the configured service, seeding its collection if asked to.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let service = open_service(&config.service_options())?;
        Ok(Self::with_service(config, service))
    }

    pub fn with_service(config: ServerConfig, service: Arc<dyn GraphQlService>) -> Self {
        Self { config, service }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn service(&self) -> &Arc<dyn GraphQlService> {
        &self.service
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let state = AppState {
            service: Arc::clone(&self.service),
        };
        build_router(state, self.config.graphiql)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            service = %self.service.kind(),
            records = self.service.record_count(),
            "minigql server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minigql_catalog::ServiceKind;

    #[test]
    fn server_construction() {
        let server = MiniGqlServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr.port(), 8080);
        assert_eq!(server.service().kind(), ServiceKind::Tutorials);
        assert_eq!(server.service().record_count(), 2);
    }

    #[test]
    fn server_seeds_file_collection() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            service: ServiceKind::Posts,
            data_dir: Some(dir.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let server = MiniGqlServer::new(config).unwrap();
        assert_eq!(server.service().record_count(), 3);
        assert!(dir.path().join("minimalGraphql/post.json").exists());
    }

    #[test]
    fn router_builds() {
        let server = MiniGqlServer::new(ServerConfig::default()).unwrap();
        let _router = server.router();
    }
}
