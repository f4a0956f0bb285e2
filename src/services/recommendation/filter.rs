use crate::models::{MenuItem, RecommendationRequest};

/// Ingredient keywords that disqualify an item for vegetarians
const MEAT_KEYWORDS: &[&str] = &["ayam", "daging", "sapi", "babi", "ikan", "udang", "cumi"];

/// Additional keywords that disqualify an item for vegans (dairy, cheese, egg, honey, butter)
const ANIMAL_PRODUCT_KEYWORDS: &[&str] = &["susu", "keju", "telur", "madu", "mentega"];

const LOW_CARB_MAX_CALORIES: i32 = 400;

/// Recognised diet tags. Anything else has no filtering effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diet {
    Vegetarian,
    Vegan,
    LowCarb,
}

impl Diet {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "vegetarian" => Some(Diet::Vegetarian),
            "vegan" => Some(Diet::Vegan),
            "low-carb" => Some(Diet::LowCarb),
            _ => None,
        }
    }

    fn allows(&self, item: &MenuItem) -> bool {
        match self {
            Diet::Vegetarian => !contains_any(&item.ingredients, MEAT_KEYWORDS),
            Diet::Vegan => {
                !contains_any(&item.ingredients, MEAT_KEYWORDS)
                    && !contains_any(&item.ingredients, ANIMAL_PRODUCT_KEYWORDS)
            }
            Diet::LowCarb => item.calories.is_some_and(|c| c < LOW_CARB_MAX_CALORIES),
        }
    }
}

/// Case-insensitive substring match of any keyword against any ingredient
fn contains_any<S: AsRef<str>>(ingredients: &[String], keywords: &[S]) -> bool {
    ingredients.iter().any(|ingredient| {
        let ingredient = ingredient.to_lowercase();
        keywords
            .iter()
            .any(|keyword| ingredient.contains(&keyword.as_ref().to_lowercase()))
    })
}

/// Applies the request's hard constraints (price ceiling, diet, exclusions)
///
/// Pure; order of the surviving items is preserved.
pub fn apply_structural_filters(items: Vec<MenuItem>, request: &RecommendationRequest) -> Vec<MenuItem> {
    let ceiling = request.price_ceiling();
    let diet = request.diet_tag().and_then(Diet::parse);
    let exclusions: Vec<&str> = request.exclusions().collect();

    if let Some(tag) = request.diet_tag().filter(|_| diet.is_none()) {
        tracing::debug!(diet = %tag, "Unrecognised diet tag, not filtering on it");
    }

    items
        .into_iter()
        .filter(|item| ceiling.map_or(true, |max| item.price <= max))
        .filter(|item| diet.map_or(true, |diet| diet.allows(item)))
        .filter(|item| !contains_any(&item.ingredients, &exclusions))
        .collect()
}
