use crate::models::{Category, MenuItem, MenuRecommendation, RecommendationRequest};

use super::MAX_RECOMMENDATIONS;

pub const SPICY_REASON: &str = "Spicy, just as you asked";
pub const HEALTHY_REASON: &str = "Healthy with controlled calories";
pub const AFFORDABLE_REASON: &str = "Affordable price";
pub const DRINKS_REASON: &str = "A refreshing drink";
pub const FOODS_REASON: &str = "A tasty dish";
pub const DEFAULT_REASON: &str = "Popular pick";

/// Thresholds for the "healthy" and "cheap" rules
///
/// The direct path and the generative-fallback path use different values; both are
/// kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicThresholds {
    /// Calories must be strictly below this to count as healthy
    pub healthy_max_calories: i32,
    /// Price must be strictly below this to count as affordable
    pub affordable_max_price: f64,
}

impl HeuristicThresholds {
    /// Used when no generative client is configured
    pub const DIRECT: Self = Self {
        healthy_max_calories: 400,
        affordable_max_price: 30000.0,
    };

    /// Used when the generative attempt failed or produced nothing usable
    pub const GENERATIVE_FALLBACK: Self = Self {
        healthy_max_calories: 500,
        affordable_max_price: 50000.0,
    };
}

/// Picks a reason for one item; first matching rule wins
fn match_reason(query: &str, item: &MenuItem, thresholds: HeuristicThresholds) -> &'static str {
    let text = format!("{} {}", item.name, item.description).to_lowercase();

    if query.contains("pedas") && text.contains("pedas") {
        SPICY_REASON
    } else if query.contains("sehat")
        && item
            .calories
            .is_some_and(|c| c < thresholds.healthy_max_calories)
    {
        HEALTHY_REASON
    } else if query.contains("murah") && item.price < thresholds.affordable_max_price {
        AFFORDABLE_REASON
    } else if query.contains("minuman") && item.category == Category::Drinks {
        DRINKS_REASON
    } else if query.contains("makanan") && item.category == Category::Foods {
        FOODS_REASON
    } else {
        DEFAULT_REASON
    }
}

/// Keyword-based recommendations over the first few filtered items
///
/// Deterministic: catalog order is kept and no ranking is applied beyond the cap.
pub fn recommend(
    items: &[MenuItem],
    request: &RecommendationRequest,
    thresholds: HeuristicThresholds,
) -> Vec<MenuRecommendation> {
    let query = request.query.to_lowercase();

    items
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|item| MenuRecommendation::new(item.clone(), match_reason(&query, item, thresholds)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn menu(id: i64, name: &str, category: Category, price: f64, calories: Option<i32>) -> MenuItem {
        MenuItem {
            id,
            name: name.to_string(),
            category,
            calories,
            price,
            ingredients: vec![],
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reasons(recs: &[MenuRecommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.match_reason.as_str()).collect()
    }

    #[test]
    fn test_category_scenario() {
        let items = vec![
            menu(1, "Es Jeruk", Category::Drinks, 10000.0, None),
            menu(2, "Nasi Goreng", Category::Foods, 20000.0, None),
        ];
        let recs = recommend(
            &items,
            &RecommendationRequest::new("minuman segar"),
            HeuristicThresholds::DIRECT,
        );

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].menu.name, "Es Jeruk");
        assert_eq!(reasons(&recs), vec![DRINKS_REASON, DEFAULT_REASON]);
    }

    #[test]
    fn test_spicy_rule_checks_description() {
        let mut item = menu(1, "Mie Setan", Category::Foods, 15000.0, Some(300));
        item.description = "Level PEDAS bisa dipilih".to_string();

        let recs = recommend(
            &[item],
            &RecommendationRequest::new("Makanan Pedas yang sehat"),
            HeuristicThresholds::DIRECT,
        );
        assert_eq!(reasons(&recs), vec![SPICY_REASON]);
    }

    #[test]
    fn test_thresholds_differ_per_profile() {
        let items = vec![
            menu(1, "Salad", Category::Foods, 40000.0, Some(450)),
            menu(2, "Gado-gado", Category::Foods, 25000.0, Some(350)),
        ];

        let healthy = RecommendationRequest::new("yang sehat");
        assert_eq!(
            reasons(&recommend(&items, &healthy, HeuristicThresholds::DIRECT)),
            vec![DEFAULT_REASON, HEALTHY_REASON]
        );
        assert_eq!(
            reasons(&recommend(&items, &healthy, HeuristicThresholds::GENERATIVE_FALLBACK)),
            vec![HEALTHY_REASON, HEALTHY_REASON]
        );

        let cheap = RecommendationRequest::new("yang murah");
        assert_eq!(
            reasons(&recommend(&items, &cheap, HeuristicThresholds::DIRECT)),
            vec![DEFAULT_REASON, AFFORDABLE_REASON]
        );
        assert_eq!(
            reasons(&recommend(&items, &cheap, HeuristicThresholds::GENERATIVE_FALLBACK)),
            vec![AFFORDABLE_REASON, AFFORDABLE_REASON]
        );
    }

    #[test]
    fn test_caps_at_five_in_catalog_order() {
        let items: Vec<MenuItem> = (1..=8)
            .map(|i| menu(i, &format!("Menu {}", i), Category::Snacks, 1000.0, None))
            .collect();
        let recs = recommend(
            &items,
            &RecommendationRequest::new("camilan"),
            HeuristicThresholds::DIRECT,
        );

        let ids: Vec<i64> = recs.iter().map(|r| r.menu.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let items = vec![
            menu(1, "Es Teh", Category::Drinks, 5000.0, Some(90)),
            menu(2, "Soto", Category::Foods, 18000.0, Some(420)),
        ];
        let request = RecommendationRequest::new("minuman murah");

        let first = recommend(&items, &request, HeuristicThresholds::GENERATIVE_FALLBACK);
        let second = recommend(&items, &request, HeuristicThresholds::GENERATIVE_FALLBACK);
        assert_eq!(first, second);
    }
}
