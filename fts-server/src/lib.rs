//! HTTP front: one route that parses query parameters, invokes the engine
//! and emits its JSON.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fts_core::engine::{Engine, SearchParams};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

/// Query parameters as received on the wire. Numeric fields fall back to
/// their defaults when missing or unparseable rather than rejecting the
/// request.
#[derive(Deserialize)]
pub struct RawSearchParams {
    #[serde(default)]
    q: String,
    exact: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

impl RawSearchParams {
    fn into_params(self) -> SearchParams {
        SearchParams {
            query: self.q,
            exact: self.exact.as_deref() == Some("true"),
            page: parse_or(self.page, DEFAULT_PAGE),
            limit: parse_or(self.limit, DEFAULT_LIMIT),
        }
    }
}

fn parse_or(raw: Option<String>, default: usize) -> usize {
    raw.and_then(|s| s.parse().ok()).unwrap_or(default)
}

pub fn build_app(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(search_handler))
        .with_state(AppState { engine })
        .layer(cors)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(raw): Query<RawSearchParams>,
) -> Response {
    if raw.q.is_empty() {
        return (StatusCode::BAD_REQUEST, "Search term cannot be blank").into_response();
    }

    let params = raw.into_params();
    match state.engine.search(&params) {
        Ok(results) => Json(results).into_response(),
        Err(err) => {
            tracing::error!(%err, query = %params.query, "search failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
