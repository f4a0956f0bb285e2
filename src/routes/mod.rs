use axum::{
    http::{header, Method, StatusCode, Uri},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod menu;
pub mod recommendations;
mod state;

pub use state::AppState;

/// Creates the application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(menu_routes())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// Catalog and recommendation routes under /menu
fn menu_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/menu", post(menu::create).get(menu::list))
        .route("/menu/search", get(menu::search))
        .route("/menu/group-by-category", get(menu::group_by_category))
        .route("/menu/recommendations", post(recommendations::recommend))
        .route(
            "/menu/:id",
            get(menu::get_by_id).put(menu::update).delete(menu::delete),
        )
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "menu API running" })),
    )
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found", "path": uri.path() })),
    )
}
