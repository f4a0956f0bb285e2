use crate::models::{MenuRecommendation, RecommendationRequest, RecommendationResult};

const NO_MATCH_SUGGESTIONS: [&str; 2] = [
    "Try more specific keywords",
    "Browse the popular picks in the foods category",
];

const FEW_MATCHES_SUGGESTION: &str = "Try adding 'ayam' or 'seafood' for more options";

fn summary(query: &str, found: usize, available: usize) -> String {
    match (found, available) {
        (_, 0) => format!(
            "No menu items are available, so no match found for '{}'",
            query
        ),
        (0, _) => format!("No match found for '{}'", query),
        (n, _) => format!("{} matches found for '{}'", n, query),
    }
}

fn suggestions(found: usize) -> Option<Vec<String>> {
    match found {
        0 => Some(NO_MATCH_SUGGESTIONS.iter().map(|s| s.to_string()).collect()),
        1 | 2 => Some(vec![FEW_MATCHES_SUGGESTION.to_string()]),
        _ => None,
    }
}

/// Wraps the final recommendation list with a summary and follow-up suggestions
///
/// `available` is the size of the filtered item set the list was drawn from.
pub fn compose(
    request: &RecommendationRequest,
    recommendations: Vec<MenuRecommendation>,
    available: usize,
) -> RecommendationResult {
    let found = recommendations.len();

    RecommendationResult {
        query: request.query.clone(),
        search_summary: summary(&request.query, found, available),
        suggestions: suggestions(found),
        recommendations,
    }
}
