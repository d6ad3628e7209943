use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use bytes::Bytes;
use minigql_types::{
    Request as GraphQlRequest, Response as GraphQlResponse, ResponseError, TypeError,
};
use serde::Deserialize;
use serde_json::json;

use crate::graphiql;
use crate::router::AppState;

/// Query-string parameters of `GET /graphql`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlParams {
    pub query: Option<String>,
    pub operation_name: Option<String>,
    pub variables: Option<String>,
}

/// `POST /graphql`.
pub async fn graphql_post(State(state): State<AppState>, body: Bytes) -> Response {
    match GraphQlRequest::from_body(&body) {
        Ok(request) => run(&state, &request),
        Err(err) => bad_request(err),
    }
}

/// `GET /graphql`.
pub async fn graphql_get(
    State(state): State<AppState>,
    Query(params): Query<GraphQlParams>,
) -> Response {
    let Some(query) = params.query else {
        return (
            StatusCode::BAD_REQUEST,
            Json(GraphQlResponse::from_error(ResponseError::new(
                "missing query parameter",
            ))),
        )
            .into_response();
    };
    match GraphQlRequest::from_params(query, params.operation_name, params.variables.as_deref()) {
        Ok(request) => run(&state, &request),
        Err(err) => bad_request(err),
    }
}

fn run(state: &AppState, request: &GraphQlRequest) -> Response {
    let response = state.service.execute(request);
    for error in &response.errors {
        tracing::warn!(path = %error.path_string(), "{}", error.message);
    }
    Json(response).into_response()
}

fn bad_request(err: TypeError) -> Response {
    tracing::debug!(error = %err, "unreadable request");
    (
        StatusCode::BAD_REQUEST,
        Json(GraphQlResponse::from_error(ResponseError::new(err.to_string()))),
    )
        .into_response()
}

/// `GET /`.
pub async fn graphiql_handler() -> Html<&'static str> {
    Html(graphiql::PAGE)
}

/// `GET /health`.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": state.service.kind().name(),
        "records": state.service.record_count(),
    }))
}

/// `GET /schema`.
pub async fn schema_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.service.sdl(),
    )
}
