mod menu;
mod recommendation;

pub use menu::{
    matches_search, Category, CategoryGrouping, GroupByCategoryResponse, GroupingQuery,
    MenuDraft, MenuFilters, MenuItem, MenuListResponse, MenuResponse, MessageResponse,
    Pagination, PaginationMeta, SortField, SortOrder,
};
pub use recommendation::{MenuRecommendation, RecommendationRequest, RecommendationResult};
