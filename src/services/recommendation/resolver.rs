use std::{sync::Arc, time::Duration};

use crate::{
    models::{MenuItem, MenuRecommendation, RecommendationRequest, RecommendationResult},
    services::providers::GenerativeClient,
};

use super::{
    composer,
    heuristic::{self, HeuristicThresholds},
    parser, prompt, MAX_RECOMMENDATIONS,
};

pub const DEFAULT_GENERATIVE_TIMEOUT: Duration = Duration::from_secs(15);

/// Why a request ended up on the heuristic path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackCause {
    /// No generative client configured
    NotConfigured,
    /// Generative call exceeded the timeout
    Timeout,
    /// Transport error, bad status or empty completion
    Upstream,
    /// Completion contained no usable `Menu:` lines
    Unparseable,
}

impl FallbackCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackCause::NotConfigured => "not_configured",
            FallbackCause::Timeout => "timeout",
            FallbackCause::Upstream => "upstream_error",
            FallbackCause::Unparseable => "unparseable",
        }
    }

    /// The direct path and the post-failure path keep their own thresholds
    pub fn thresholds(&self) -> HeuristicThresholds {
        match self {
            FallbackCause::NotConfigured => HeuristicThresholds::DIRECT,
            _ => HeuristicThresholds::GENERATIVE_FALLBACK,
        }
    }
}

/// Outcome of the generative attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Generative(Vec<MenuRecommendation>),
    Fallback(FallbackCause),
}

/// Turns a filtered item set into a recommendation result
///
/// Tries the generative client once, falls back to the heuristic matcher on any
/// failure, and never surfaces generative errors to the caller.
#[derive(Clone)]
pub struct RecommendationResolver {
    generator: Option<Arc<dyn GenerativeClient>>,
    timeout: Duration,
}

impl RecommendationResolver {
    pub fn new(generator: Option<Arc<dyn GenerativeClient>>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Resolver without a generative client; every request takes the heuristic path
    pub fn heuristic_only() -> Self {
        Self::new(None, DEFAULT_GENERATIVE_TIMEOUT)
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Resolves recommendations for items that already passed the structural filters
    pub async fn resolve(
        &self,
        request: &RecommendationRequest,
        items: &[MenuItem],
    ) -> RecommendationResult {
        if items.is_empty() {
            tracing::info!(query = %request.query, "No menu items left after filtering");
            return composer::compose(request, Vec::new(), 0);
        }

        let resolution = match &self.generator {
            Some(generator) => self.attempt_generative(generator.as_ref(), request, items).await,
            None => Resolution::Fallback(FallbackCause::NotConfigured),
        };

        let mut recommendations = match resolution {
            Resolution::Generative(recommendations) => {
                tracing::info!(
                    path = "generative",
                    parsed = recommendations.len(),
                    "Recommendations resolved"
                );
                recommendations
            }
            Resolution::Fallback(cause) => {
                let recommendations = heuristic::recommend(items, request, cause.thresholds());
                tracing::info!(
                    path = "heuristic",
                    cause = cause.as_str(),
                    matched = recommendations.len(),
                    "Recommendations resolved"
                );
                recommendations
            }
        };

        recommendations.truncate(MAX_RECOMMENDATIONS);
        composer::compose(request, recommendations, items.len())
    }

    /// One bounded call to the generator followed by parsing
    async fn attempt_generative(
        &self,
        generator: &dyn GenerativeClient,
        request: &RecommendationRequest,
        items: &[MenuItem],
    ) -> Resolution {
        let prompt = prompt::build_prompt(request, items);

        let text = match tokio::time::timeout(self.timeout, generator.generate(&prompt, self.timeout))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Generative recommendation failed, using heuristics");
                return Resolution::Fallback(FallbackCause::Upstream);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Generative recommendation timed out, using heuristics"
                );
                return Resolution::Fallback(FallbackCause::Timeout);
            }
        };

        tracing::debug!(response = %text, "Generative response");

        let recommendations = parser::parse_recommendations(&text, items);
        if recommendations.is_empty() {
            tracing::warn!(
                chars = text.len(),
                "Generative response had no usable recommendations, using heuristics"
            );
            return Resolution::Fallback(FallbackCause::Unparseable);
        }

        Resolution::Generative(recommendations)
    }
}
