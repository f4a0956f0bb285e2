use serde::{Deserialize, Deserializer, Serialize};

use super::MenuItem;

/// Request body for `POST /menu/recommendations`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exclude: Vec<String>,
}

/// Treats an explicit `null` list the same as a missing one
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl RecommendationRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Price ceiling, if one applies. Zero or negative means no ceiling.
    pub fn price_ceiling(&self) -> Option<f64> {
        self.max_price.filter(|p| *p > 0.0)
    }

    /// Diet tag, if non-blank
    pub fn diet_tag(&self) -> Option<&str> {
        self.diet.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }

    /// Non-blank exclusion terms
    pub fn exclusions(&self) -> impl Iterator<Item = &str> {
        self.exclude
            .iter()
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
    }
}

/// One recommended menu with the reason it was picked
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuRecommendation {
    pub menu: MenuItem,
    pub match_reason: String,
}

impl MenuRecommendation {
    pub fn new(menu: MenuItem, match_reason: impl Into<String>) -> Self {
        Self {
            menu,
            match_reason: match_reason.into(),
        }
    }
}

/// Complete response for a recommendation request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResult {
    pub query: String,
    pub recommendations: Vec<MenuRecommendation>,
    pub search_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_optionals_accepted() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{"query": "minuman", "exclude": null, "diet": null, "max_price": null}"#,
        )
        .unwrap();

        assert!(request.exclude.is_empty());
        assert_eq!(request.diet_tag(), None);
        assert_eq!(request.price_ceiling(), None);
    }

    #[test]
    fn test_exclusions_skip_blank_terms() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"query": "x", "exclude": [" susu ", "", "  "]}"#).unwrap();
        assert_eq!(request.exclusions().collect::<Vec<_>>(), vec!["susu"]);
    }
}
