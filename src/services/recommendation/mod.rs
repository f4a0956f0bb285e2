//! Recommendation resolution pipeline
//!
//! query + constraints → catalog listing → structural filters → resolver
//! (generative attempt, else heuristics) → composed result.

use crate::{
    error::{AppError, AppResult},
    models::{RecommendationRequest, RecommendationResult},
    services::menu::MenuService,
};

pub mod composer;
pub mod filter;
pub mod heuristic;
pub mod parser;
pub mod prompt;
pub mod resolver;

pub use filter::apply_structural_filters;
pub use resolver::{FallbackCause, RecommendationResolver, Resolution};

/// Hard cap on recommendations in any result
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Produces menu recommendations for a free-text query
///
/// Only a blank query or a failing catalog lookup produce an error; generative
/// failures degrade to heuristic recommendations.
pub async fn recommend_menus(
    menu_service: &MenuService,
    resolver: &RecommendationResolver,
    request: RecommendationRequest,
) -> AppResult<RecommendationResult> {
    if request.query.trim().is_empty() {
        return Err(AppError::InvalidInput("Query is required".to_string()));
    }

    let catalog = menu_service
        .catalog_for_recommendation(request.price_ceiling())
        .await?;
    let catalog_size = catalog.len();

    let items = apply_structural_filters(catalog, &request);

    tracing::info!(
        query = %request.query,
        catalog = catalog_size,
        filtered = items.len(),
        diet = request.diet_tag().unwrap_or("-"),
        excluded = request.exclude.len(),
        "Structural filters applied"
    );

    Ok(resolver.resolve(&request, &items).await)
}
