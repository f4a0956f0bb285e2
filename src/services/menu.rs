use std::{collections::BTreeMap, sync::Arc};

use crate::{
    db::MenuStore,
    error::{AppError, AppResult},
    models::{
        CategoryGrouping, GroupingQuery, MenuDraft, MenuFilters, MenuItem, Pagination,
        PaginationMeta,
    },
};

const DEFAULT_PER_CATEGORY: u32 = 10;
const MAX_PER_CATEGORY: u32 = 100;

/// Catalog business rules on top of a [`MenuStore`]
#[derive(Clone)]
pub struct MenuService {
    store: Arc<dyn MenuStore>,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Menu {} not found", id))
}

fn validate(draft: MenuDraft) -> AppResult<MenuDraft> {
    let draft = draft.normalized();
    let violations = draft.violations();
    if !violations.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "Validation failed: {}",
            violations.join("; ")
        )));
    }
    Ok(draft)
}

impl MenuService {
    pub fn new(store: Arc<dyn MenuStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, draft: MenuDraft) -> AppResult<MenuItem> {
        let draft = validate(draft)?;
        let menu = self.store.create(draft).await?;

        tracing::info!(menu_id = menu.id, store = self.store.name(), "Menu created");
        Ok(menu)
    }

    pub async fn list(&self, filters: &MenuFilters) -> AppResult<(Vec<MenuItem>, PaginationMeta)> {
        let pagination = Pagination::new(filters.page, filters.per_page);
        let (menus, total) = self.store.list(filters, Some(pagination)).await?;
        Ok((menus, PaginationMeta::new(total, pagination)))
    }

    pub async fn search(
        &self,
        query: &str,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> AppResult<(Vec<MenuItem>, PaginationMeta)> {
        let pagination = Pagination::new(page, per_page);
        let (menus, total) = self.store.search(query, pagination).await?;
        Ok((menus, PaginationMeta::new(total, pagination)))
    }

    pub async fn get(&self, id: i64) -> AppResult<MenuItem> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn update(&self, id: i64, draft: MenuDraft) -> AppResult<MenuItem> {
        let draft = validate(draft)?;
        let menu = self
            .store
            .update(id, draft)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(menu_id = id, "Menu updated");
        Ok(menu)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }

        tracing::info!(menu_id = id, "Menu deleted");
        Ok(())
    }

    /// Groups the catalog by category, as counts (default) or as capped item lists
    pub async fn group_by_category(&self, query: &GroupingQuery) -> AppResult<CategoryGrouping> {
        let (menus, _) = self.store.list(&MenuFilters::default(), None).await?;

        if query.mode.as_deref() != Some("list") {
            let mut counts = BTreeMap::new();
            for menu in &menus {
                *counts.entry(menu.category).or_insert(0u64) += 1;
            }
            return Ok(CategoryGrouping::Counts(counts));
        }

        let per_category = query
            .per_category
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_PER_CATEGORY)
            .min(MAX_PER_CATEGORY) as usize;

        let mut groups: BTreeMap<_, Vec<MenuItem>> = BTreeMap::new();
        for menu in menus {
            let group = groups.entry(menu.category).or_default();
            if group.len() < per_category {
                group.push(menu);
            }
        }
        Ok(CategoryGrouping::Lists(groups))
    }

    /// Every item under the price ceiling, for the recommendation pipeline
    pub async fn catalog_for_recommendation(&self, max_price: Option<f64>) -> AppResult<Vec<MenuItem>> {
        let filters = MenuFilters {
            max_price,
            ..Default::default()
        };
        let (menus, _) = self.store.list(&filters, None).await?;
        Ok(menus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::InMemoryMenuStore, models::Category};
    use tokio_test::{assert_err, assert_ok};

    fn draft(name: &str, category: Category, price: f64) -> MenuDraft {
        MenuDraft {
            name: name.to_string(),
            category,
            calories: Some(200),
            price,
            ingredients: vec![" gula ".to_string(), "".to_string()],
            description: "  manis ".to_string(),
        }
    }

    fn service() -> MenuService {
        MenuService::new(Arc::new(InMemoryMenuStore::new()))
    }

    #[tokio::test]
    async fn test_create_normalizes_and_validates() {
        let service = service();

        let created = assert_ok!(service.create(draft("  Es Teh  ", Category::Drinks, 5000.0)).await);
        assert_eq!(created.name, "Es Teh");
        assert_eq!(created.ingredients, vec!["gula".to_string()]);
        assert_eq!(created.description, "manis");

        let invalid = service.create(draft("Es", Category::Drinks, -1.0)).await;
        match assert_err!(invalid) {
            AppError::InvalidInput(msg) => {
                assert!(msg.contains("name"));
                assert!(msg.contains("price"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_menu_is_not_found() {
        let service = service();

        assert!(matches!(service.get(42).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(42, draft("Kopi Susu", Category::Drinks, 15000.0)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete(42).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_group_by_category_modes() {
        let service = service();
        for (name, category) in [
            ("Es Teh", Category::Drinks),
            ("Es Jeruk", Category::Drinks),
            ("Kopi Hitam", Category::Drinks),
            ("Nasi Goreng", Category::Foods),
        ] {
            assert_ok!(service.create(draft(name, category, 10000.0)).await);
        }

        let counts = assert_ok!(service.group_by_category(&GroupingQuery::default()).await);
        assert_eq!(
            counts,
            CategoryGrouping::Counts(BTreeMap::from([(Category::Drinks, 3), (Category::Foods, 1)]))
        );

        let lists = assert_ok!(
            service
                .group_by_category(&GroupingQuery {
                    mode: Some("list".to_string()),
                    per_category: Some(2),
                })
                .await
        );
        let CategoryGrouping::Lists(groups) = lists else {
            panic!("expected list grouping");
        };
        assert_eq!(groups[&Category::Drinks].len(), 2);
        assert_eq!(groups[&Category::Foods].len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_for_recommendation_applies_ceiling() {
        let service = service();
        assert_ok!(service.create(draft("Es Jeruk", Category::Drinks, 10000.0)).await);
        assert_ok!(service.create(draft("Es Teh", Category::Drinks, 4000.0)).await);

        let menus = assert_ok!(service.catalog_for_recommendation(Some(5000.0)).await);
        assert_eq!(menus.len(), 1);
        assert_eq!(menus[0].name, "Es Teh");

        let all = assert_ok!(service.catalog_for_recommendation(None).await);
        assert_eq!(all.len(), 2);
    }
}
