use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResult},
    routes::{menu::json_body, AppState},
    services::recommendation,
};

/// Handler for POST /menu/recommendations
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResult>> {
    let request = json_body(body)?;

    tracing::info!(
        request_id = %request_id,
        query = %request.query,
        generative = state.resolver.has_generator(),
        "Processing recommendation request"
    );

    let result =
        recommendation::recommend_menus(&state.menu_service, &state.resolver, request).await?;

    tracing::info!(
        request_id = %request_id,
        recommendations = result.recommendations.len(),
        "Recommendation completed"
    );

    Ok(Json(result))
}
