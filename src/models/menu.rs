use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, fmt::Display, str::FromStr};

/// Menu category. Closed set, stored as its lowercase wire name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Foods,
    Drinks,
    Desserts,
    Snacks,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Foods => "foods",
            Category::Drinks => "drinks",
            Category::Desserts => "desserts",
            Category::Snacks => "snacks",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foods" => Ok(Category::Foods),
            "drinks" => Ok(Category::Drinks),
            "desserts" => Ok(Category::Desserts),
            "snacks" => Ok(Category::Snacks),
            other => Err(format!("unknown menu category '{}'", other)),
        }
    }
}

/// A catalog entry as stored and returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub calories: Option<i32>,
    pub price: f64,
    pub ingredients: Vec<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a menu item
#[derive(Debug, Clone, Deserialize)]
pub struct MenuDraft {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub calories: Option<i32>,
    pub price: f64,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl MenuDraft {
    /// Trims text fields and drops blank ingredients
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            ingredients: self
                .ingredients
                .into_iter()
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .collect(),
            description: self.description.trim().to_string(),
            ..self
        }
    }

    /// Returns every rule the draft violates, empty when valid
    pub fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        let name_len = self.name.trim().chars().count();
        if !(3..=255).contains(&name_len) {
            violations.push("name must be between 3 and 255 characters".to_string());
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            violations.push("price must be greater than 0".to_string());
        }
        if matches!(self.calories, Some(c) if c < 0) {
            violations.push("calories must not be negative".to_string());
        }
        if self.ingredients.iter().all(|i| i.trim().is_empty()) {
            violations.push("at least one ingredient is required".to_string());
        }
        if self.description.chars().count() > 1000 {
            violations.push("description must be at most 1000 characters".to_string());
        }

        violations
    }
}

/// Query-string filters for listing menus
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFilters {
    pub q: Option<String>,
    pub category: Option<Category>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub max_cal: Option<i32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<String>,
}

impl MenuFilters {
    /// Text filter, if non-blank
    pub fn text(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price.filter(|p| *p > 0.0)
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price.filter(|p| *p > 0.0)
    }

    pub fn max_calories(&self) -> Option<i32> {
        self.max_cal.filter(|c| *c > 0)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort.as_deref().map(SortOrder::parse).unwrap_or_default()
    }

    /// In-process evaluation of the same predicate the SQL store applies
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(text) = self.text() {
            if !item.name.to_lowercase().contains(&text)
                && !item.description.to_lowercase().contains(&text)
            {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != item.category) {
            return false;
        }
        if self.min_price().is_some_and(|min| item.price < min) {
            return false;
        }
        if self.max_price().is_some_and(|max| item.price > max) {
            return false;
        }
        if let Some(max_cal) = self.max_calories() {
            // NULL calories never satisfy `calories <= n`
            if !item.calories.is_some_and(|c| c <= max_cal) {
                return false;
            }
        }
        true
    }
}

/// Free-text search across name, description and ingredients
pub fn matches_search(item: &MenuItem, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.name.to_lowercase().contains(&needle)
        || item.description.to_lowercase().contains(&needle)
        || item
            .ingredients
            .iter()
            .any(|ingredient| ingredient.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Category,
    Price,
    Calories,
    CreatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Category => "category",
            SortField::Price => "price",
            SortField::Calories => "calories",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl SortOrder {
    /// Parses `field:direction`. Unknown fields or malformed input fall back to
    /// newest-first; an unknown direction means ascending.
    pub fn parse(raw: &str) -> Self {
        let Some((field, direction)) = raw.split_once(':') else {
            return Self::default();
        };
        if direction.contains(':') {
            return Self::default();
        }

        let field = match field.trim() {
            "name" => SortField::Name,
            "category" => SortField::Category,
            "price" => SortField::Price,
            "calories" => SortField::Calories,
            "created_at" => SortField::CreatedAt,
            _ => return Self::default(),
        };

        Self {
            field,
            descending: direction.trim().eq_ignore_ascii_case("desc"),
        }
    }

    pub fn sql(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{} {}, id ASC", self.field.column(), direction)
    }

    pub fn compare(&self, a: &MenuItem, b: &MenuItem) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::Price => a.price.total_cmp(&b.price),
            // Postgres sorts NULL last ascending and first descending
            SortField::Calories => match (a.calories, b.calories) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let ordering = if self.descending {
            ordering.reverse()
        } else {
            ordering
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }
}

/// Normalised page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: u32 = 10;
    pub const MAX_PER_PAGE: u32 = 100;

    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let per_page = per_page
            .filter(|p| *p >= 1)
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .min(Self::MAX_PER_PAGE);
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(total: u64, pagination: Pagination) -> Self {
        Self {
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            total_pages: total.div_ceil(u64::from(pagination.per_page)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuListResponse {
    pub data: Vec<MenuItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: MenuItem,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Query parameters for `/menu/group-by-category`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupingQuery {
    pub mode: Option<String>,
    pub per_category: Option<u32>,
}

/// Category grouping in either count or list form
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CategoryGrouping {
    Counts(BTreeMap<Category, u64>),
    Lists(BTreeMap<Category, Vec<MenuItem>>),
}

#[derive(Debug, Serialize)]
pub struct GroupByCategoryResponse {
    pub data: CategoryGrouping,
}
