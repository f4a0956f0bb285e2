use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    db::MenuStore,
    error::{AppError, AppResult},
    models::{MenuDraft, MenuFilters, MenuItem, Pagination, SortOrder},
};

const SELECT_MENUS: &str = "SELECT id, name, category, calories, price::FLOAT8 AS price, \
     ingredients, description, created_at, updated_at FROM menus";

const RETURNING_MENU: &str = "RETURNING id, name, category, calories, price::FLOAT8 AS price, \
     ingredients, description, created_at, updated_at";

/// Raw `menus` row; category is validated on the way out
#[derive(Debug, sqlx::FromRow)]
struct MenuRow {
    id: i64,
    name: String,
    category: String,
    calories: Option<i32>,
    price: f64,
    ingredients: Vec<String>,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MenuRow> for MenuItem {
    type Error = AppError;

    fn try_from(row: MenuRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse()
            .map_err(|e| AppError::Internal(format!("menu {}: {}", row.id, e)))?;

        Ok(MenuItem {
            id: row.id,
            name: row.name,
            category,
            calories: row.calories,
            price: row.price,
            ingredients: row.ingredients,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_items(rows: Vec<MenuRow>) -> AppResult<Vec<MenuItem>> {
    rows.into_iter().map(MenuItem::try_from).collect()
}

/// PostgreSQL-backed catalog store
#[derive(Clone)]
pub struct PgMenuStore {
    pool: PgPool,
}

impl PgMenuStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &MenuFilters) {
        builder.push(" WHERE TRUE");

        if let Some(text) = filters.text() {
            let pattern = format!("%{}%", text);
            builder
                .push(" AND (LOWER(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(description) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(category) = filters.category {
            builder.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(min_price) = filters.min_price() {
            builder.push(" AND price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filters.max_price() {
            builder.push(" AND price <= ").push_bind(max_price);
        }
        if let Some(max_calories) = filters.max_calories() {
            builder.push(" AND calories <= ").push_bind(max_calories);
        }
    }

    fn push_search(builder: &mut QueryBuilder<'_, Postgres>, query: &str) {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return;
        }
        let pattern = format!("%{}%", needle);
        builder
            .push(" WHERE LOWER(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(description) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR EXISTS (SELECT 1 FROM unnest(ingredients) AS ing WHERE LOWER(ing) LIKE ")
            .push_bind(pattern)
            .push(")");
    }

    fn push_window(
        builder: &mut QueryBuilder<'_, Postgres>,
        order: SortOrder,
        pagination: Option<Pagination>,
    ) {
        builder.push(" ORDER BY ").push(order.sql());
        if let Some(pagination) = pagination {
            builder
                .push(" LIMIT ")
                .push_bind(pagination.limit() as i64)
                .push(" OFFSET ")
                .push_bind(pagination.offset() as i64);
        }
    }

    async fn count(&self, mut builder: QueryBuilder<'_, Postgres>) -> AppResult<u64> {
        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total.max(0) as u64)
    }

    async fn fetch(&self, mut builder: QueryBuilder<'_, Postgres>) -> AppResult<Vec<MenuItem>> {
        let rows: Vec<MenuRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        into_items(rows)
    }
}

#[async_trait::async_trait]
impl MenuStore for PgMenuStore {
    async fn list(
        &self,
        filters: &MenuFilters,
        pagination: Option<Pagination>,
    ) -> AppResult<(Vec<MenuItem>, u64)> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM menus");
        Self::push_filters(&mut count, filters);
        let total = self.count(count).await?;

        let mut select = QueryBuilder::new(SELECT_MENUS);
        Self::push_filters(&mut select, filters);
        Self::push_window(&mut select, filters.sort_order(), pagination);
        let items = self.fetch(select).await?;

        tracing::debug!(total, returned = items.len(), "Listed menus");
        Ok((items, total))
    }

    async fn search(&self, query: &str, pagination: Pagination) -> AppResult<(Vec<MenuItem>, u64)> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM menus");
        Self::push_search(&mut count, query);
        let total = self.count(count).await?;

        let mut select = QueryBuilder::new(SELECT_MENUS);
        Self::push_search(&mut select, query);
        Self::push_window(&mut select, SortOrder::default(), Some(pagination));
        let items = self.fetch(select).await?;

        Ok((items, total))
    }

    async fn get(&self, id: i64) -> AppResult<Option<MenuItem>> {
        let row: Option<MenuRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_MENUS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(MenuItem::try_from).transpose()
    }

    async fn create(&self, draft: MenuDraft) -> AppResult<MenuItem> {
        let sql = format!(
            "INSERT INTO menus (name, category, calories, price, ingredients, description) \
             VALUES ($1, $2, $3, $4, $5, $6) {}",
            RETURNING_MENU
        );

        let row: MenuRow = sqlx::query_as(&sql)
            .bind(&draft.name)
            .bind(draft.category.as_str())
            .bind(draft.calories)
            .bind(draft.price)
            .bind(&draft.ingredients)
            .bind(&draft.description)
            .fetch_one(&self.pool)
            .await?;

        MenuItem::try_from(row)
    }

    async fn update(&self, id: i64, draft: MenuDraft) -> AppResult<Option<MenuItem>> {
        let sql = format!(
            "UPDATE menus SET name = $1, category = $2, calories = $3, price = $4, \
             ingredients = $5, description = $6, updated_at = NOW() WHERE id = $7 {}",
            RETURNING_MENU
        );

        let row: Option<MenuRow> = sqlx::query_as(&sql)
            .bind(&draft.name)
            .bind(draft.category.as_str())
            .bind(draft.calories)
            .bind(draft.price)
            .bind(&draft.ingredients)
            .bind(&draft.description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(MenuItem::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn row(category: &str) -> MenuRow {
        MenuRow {
            id: 9,
            name: "Es Teh".to_string(),
            category: category.to_string(),
            calories: Some(90),
            price: 5000.0,
            ingredients: vec!["teh".to_string(), "gula".to_string()],
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let item = MenuItem::try_from(row("drinks")).unwrap();
        assert_eq!(item.category, Category::Drinks);
        assert_eq!(item.ingredients.len(), 2);
    }

    #[test]
    fn test_row_conversion_rejects_unknown_category() {
        assert!(matches!(
            MenuItem::try_from(row("mains")),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_filter_sql() {
        let filters = MenuFilters {
            q: Some("Pedas".to_string()),
            category: Some(Category::Foods),
            max_price: Some(25000.0),
            min_price: Some(0.0),
            max_cal: Some(500),
            ..Default::default()
        };

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM menus");
        PgMenuStore::push_filters(&mut builder, &filters);
        PgMenuStore::push_window(&mut builder, filters.sort_order(), Some(Pagination::new(Some(2), None)));

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM menus WHERE TRUE AND (LOWER(name) LIKE $1 OR LOWER(description) LIKE $2) \
             AND category = $3 AND price <= $4 AND calories <= $5 \
             ORDER BY created_at DESC, id ASC LIMIT $6 OFFSET $7"
        );
    }

    #[test]
    fn test_blank_search_has_no_predicate() {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_MENUS);
        PgMenuStore::push_search(&mut builder, "   ");
        assert_eq!(builder.sql(), SELECT_MENUS);
    }
}
