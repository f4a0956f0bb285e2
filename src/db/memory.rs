use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::MenuStore,
    error::AppResult,
    models::{matches_search, MenuDraft, MenuFilters, MenuItem, Pagination, SortOrder},
};

/// Process-local catalog store
///
/// Used by the HTTP tests and for running the API without a database.
#[derive(Default)]
pub struct InMemoryMenuStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    items: Vec<MenuItem>,
}

impl InMemoryMenuStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `drafts`, ids assigned in order
    pub async fn with_items(drafts: Vec<MenuDraft>) -> AppResult<Self> {
        let store = Self::new();
        for draft in drafts {
            store.create(draft).await?;
        }
        Ok(store)
    }
}

fn window(
    mut items: Vec<MenuItem>,
    order: SortOrder,
    pagination: Option<Pagination>,
) -> (Vec<MenuItem>, u64) {
    let total = items.len() as u64;
    items.sort_by(|a, b| order.compare(a, b));

    let items = match pagination {
        Some(p) => items
            .into_iter()
            .skip(p.offset() as usize)
            .take(p.limit() as usize)
            .collect(),
        None => items,
    };

    (items, total)
}

#[async_trait::async_trait]
impl MenuStore for InMemoryMenuStore {
    async fn list(
        &self,
        filters: &MenuFilters,
        pagination: Option<Pagination>,
    ) -> AppResult<(Vec<MenuItem>, u64)> {
        let inner = self.inner.read().await;
        let matching = inner
            .items
            .iter()
            .filter(|item| filters.matches(item))
            .cloned()
            .collect();

        Ok(window(matching, filters.sort_order(), pagination))
    }

    async fn search(&self, query: &str, pagination: Pagination) -> AppResult<(Vec<MenuItem>, u64)> {
        let inner = self.inner.read().await;
        let matching = inner
            .items
            .iter()
            .filter(|item| matches_search(item, query))
            .cloned()
            .collect();

        Ok(window(matching, SortOrder::default(), Some(pagination)))
    }

    async fn get(&self, id: i64) -> AppResult<Option<MenuItem>> {
        let inner = self.inner.read().await;
        Ok(inner.items.iter().find(|item| item.id == id).cloned())
    }

    async fn create(&self, draft: MenuDraft) -> AppResult<MenuItem> {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        // Strictly increasing timestamps keep the newest-first order equal to id order
        let created_at = inner
            .items
            .last()
            .map(|last| (last.created_at + chrono::Duration::microseconds(1)).max(Utc::now()))
            .unwrap_or_else(Utc::now);

        let item = MenuItem {
            id: inner.next_id,
            name: draft.name,
            category: draft.category,
            calories: draft.calories,
            price: draft.price,
            ingredients: draft.ingredients,
            description: draft.description,
            created_at,
            updated_at: created_at,
        };
        inner.items.push(item.clone());

        Ok(item)
    }

    async fn update(&self, id: i64, draft: MenuDraft) -> AppResult<Option<MenuItem>> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };

        item.name = draft.name;
        item.category = draft.category;
        item.calories = draft.calories;
        item.price = draft.price;
        item.ingredients = draft.ingredients;
        item.description = draft.description;
        item.updated_at = Utc::now();

        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.items.len();
        inner.items.retain(|item| item.id != id);
        Ok(inner.items.len() < before)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn draft(name: &str, category: Category, price: f64) -> MenuDraft {
        MenuDraft {
            name: name.to_string(),
            category,
            calories: None,
            price,
            ingredients: vec!["air".to_string()],
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryMenuStore::with_items(vec![
            draft("Es Jeruk", Category::Drinks, 10000.0),
            draft("Nasi Goreng", Category::Foods, 20000.0),
        ])
        .await
        .unwrap();

        let (items, total) = store.list(&MenuFilters::default(), None).await.unwrap();
        assert_eq!(total, 2);
        // newest first
        assert_eq!(items[0].name, "Nasi Goreng");
        assert_eq!(items[1].id, 1);
    }

    #[tokio::test]
    async fn test_list_paginates_after_filtering() {
        let store = InMemoryMenuStore::new();
        for i in 0..5 {
            store
                .create(draft(&format!("Jus {}", i), Category::Drinks, 1000.0 * (i + 1) as f64))
                .await
                .unwrap();
        }
        store
            .create(draft("Sate Ayam", Category::Foods, 25000.0))
            .await
            .unwrap();

        let filters = MenuFilters {
            category: Some(Category::Drinks),
            sort: Some("price:asc".to_string()),
            ..Default::default()
        };
        let (page, total) = store
            .list(&filters, Some(Pagination::new(Some(2), Some(2))))
            .await
            .unwrap();

        assert_eq!(total, 5);
        let prices: Vec<f64> = page.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![3000.0, 4000.0]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = InMemoryMenuStore::new();
        let created = store
            .create(draft("Es Teh", Category::Drinks, 5000.0))
            .await
            .unwrap();

        let updated = store
            .update(created.id, draft("Es Teh Manis", Category::Drinks, 6000.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Es Teh Manis");
        assert_eq!(updated.created_at, created.created_at);

        assert!(store.update(99, draft("Kopi", Category::Drinks, 1.0)).await.unwrap().is_none());
        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
    }
}
