pub mod menu;
pub mod providers;
pub mod recommendation;

pub use menu::MenuService;
pub use recommendation::RecommendationResolver;
