use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use minigql_catalog::GraphQlService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handler;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn GraphQlService>,
}

/// Build the axum router with all minigql endpoints.
///
/// Each request runs inside a `request` span tagged with a fresh UUID v7.
pub fn build_router(state: AppState, graphiql: bool) -> Router {
    let mut router = Router::new()
        .route(
            "/graphql",
            get(handler::graphql_get).post(handler::graphql_post),
        )
        .route("/health", get(handler::health_handler))
        .route("/schema", get(handler::schema_handler));
    if graphiql {
        router = router.route("/", get(handler::graphiql_handler));
    }

    router
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    id = %Uuid::now_v7(),
                    method = %req.method(),
                    uri = %req.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
