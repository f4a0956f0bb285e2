use std::sync::Arc;

use crate::{
    db::MenuStore,
    services::{MenuService, RecommendationResolver},
};

/// Shared application state, built once at start-up
pub struct AppState {
    pub menu_service: MenuService,
    pub resolver: RecommendationResolver,
}

impl AppState {
    pub fn new(store: Arc<dyn MenuStore>, resolver: RecommendationResolver) -> Self {
        Self {
            menu_service: MenuService::new(store),
            resolver,
        }
    }
}
