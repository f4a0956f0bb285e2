use crate::models::{MenuItem, RecommendationRequest};

use super::MAX_RECOMMENDATIONS;

/// Human-readable summary of the request's hard constraints
pub fn format_criteria(request: &RecommendationRequest) -> String {
    let mut criteria = Vec::new();

    if let Some(max_price) = request.price_ceiling() {
        criteria.push(format!("max Rp {:.0}", max_price));
    }
    if let Some(diet) = request.diet_tag() {
        criteria.push(diet.to_string());
    }
    let exclusions: Vec<&str> = request.exclusions().collect();
    if !exclusions.is_empty() {
        criteria.push(format!("avoid: {}", exclusions.join(", ")));
    }

    if criteria.is_empty() {
        "no additional criteria".to_string()
    } else {
        criteria.join(", ")
    }
}

fn format_item(position: usize, item: &MenuItem) -> String {
    let mut line = format!(
        "{}. {} (Rp {:.0}) - {}",
        position, item.name, item.price, item.category
    );
    if let Some(calories) = item.calories {
        line.push_str(&format!(" - {} kcal", calories));
    }
    if !item.ingredients.is_empty() {
        line.push_str(&format!(" - Ingredients: {}", item.ingredients.join(", ")));
    }
    line
}

/// Builds the recommendation prompt for the generative service
pub fn build_prompt(request: &RecommendationRequest, items: &[MenuItem]) -> String {
    let listing = items
        .iter()
        .enumerate()
        .map(|(i, item)| format_item(i + 1, item))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"YOU ARE A RESTAURANT MENU RECOMMENDATION EXPERT.

USER QUERY: "{query}"
ADDITIONAL CRITERIA: {criteria}

AVAILABLE MENU:
{listing}

IMPORTANT INSTRUCTIONS:
1. ONLY RECOMMEND MENU ITEMS THAT TRULY MATCH the user query
2. If the query asks for drinks ("minuman"), ONLY recommend items in the "drinks" category
3. If the query asks for food ("makanan"), ONLY recommend items in the "foods" category
4. If the query asks for dessert, ONLY recommend items in the "desserts" category
5. If the query asks for a snack, ONLY recommend items in the "snacks" category
6. GIVE A SPECIFIC REASON why each item matches the query
7. Use menu names exactly as listed above
8. AT MOST {max} RECOMMENDATIONS
9. ORDER from the BEST match to the weakest

EXAMPLE FOR QUERY "minuman segar":
- Menu: Es Jeruk, Reason: Fresh orange juice, great for hot weather, affordable

OUTPUT FORMAT (one line per item):
- Menu: [menu_name], Reason: [short_specific_reason]

RECOMMENDATIONS FOR "{query}":"#,
        query = request.query.trim(),
        criteria = format_criteria(request),
        listing = listing,
        max = MAX_RECOMMENDATIONS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn menu(name: &str, calories: Option<i32>, ingredients: &[&str]) -> MenuItem {
        MenuItem {
            id: 1,
            name: name.to_string(),
            category: Category::Foods,
            calories,
            price: 25000.0,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_criteria_formatting() {
        assert_eq!(
            format_criteria(&RecommendationRequest::new("apa saja")),
            "no additional criteria"
        );

        let request = RecommendationRequest {
            query: "makan siang".to_string(),
            max_price: Some(30000.0),
            diet: Some("vegetarian".to_string()),
            exclude: vec!["kacang".to_string(), " ".to_string(), "seledri".to_string()],
        };
        assert_eq!(
            format_criteria(&request),
            "max Rp 30000, vegetarian, avoid: kacang, seledri"
        );
    }

    #[test]
    fn test_item_listing() {
        assert_eq!(
            format_item(1, &menu("Gado-gado", Some(350), &["sayur", "kacang"])),
            "1. Gado-gado (Rp 25000) - foods - 350 kcal - Ingredients: sayur, kacang"
        );
        assert_eq!(
            format_item(2, &menu("Nasi Putih", None, &[])),
            "2. Nasi Putih (Rp 25000) - foods"
        );
    }

    #[test]
    fn test_prompt_contains_query_listing_and_format() {
        let items = vec![menu("Soto Ayam", None, &["ayam"]), menu("Gado-gado", None, &[])];
        let prompt = build_prompt(&RecommendationRequest::new("  makanan hangat "), &items);

        assert!(prompt.contains("USER QUERY: \"makanan hangat\""));
        assert!(prompt.contains("1. Soto Ayam (Rp 25000) - foods - Ingredients: ayam\n2. Gado-gado"));
        assert!(prompt.contains("- Menu: [menu_name], Reason: [short_specific_reason]"));
        assert!(prompt.ends_with("RECOMMENDATIONS FOR \"makanan hangat\":"));
    }
}
