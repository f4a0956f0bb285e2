use crate::{
    error::AppResult,
    models::{MenuDraft, MenuFilters, MenuItem, Pagination},
};

/// Catalog storage abstraction
///
/// The recommendation pipeline only reads through `list`; the CRUD endpoints use the
/// rest. Implementations must be shareable across concurrent handlers.
#[async_trait::async_trait]
pub trait MenuStore: Send + Sync {
    /// Lists items matching `filters`, ordered by the filters' sort order.
    ///
    /// Returns the page (or everything when `pagination` is `None`) together with the
    /// total number of matching items.
    async fn list(
        &self,
        filters: &MenuFilters,
        pagination: Option<Pagination>,
    ) -> AppResult<(Vec<MenuItem>, u64)>;

    /// Free-text search over name, description and ingredients, newest first
    async fn search(&self, query: &str, pagination: Pagination) -> AppResult<(Vec<MenuItem>, u64)>;

    async fn get(&self, id: i64) -> AppResult<Option<MenuItem>>;

    async fn create(&self, draft: MenuDraft) -> AppResult<MenuItem>;

    /// Replaces an item's fields. `None` when the item does not exist.
    async fn update(&self, id: i64, draft: MenuDraft) -> AppResult<Option<MenuItem>>;

    /// Returns `false` when the item did not exist
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}
