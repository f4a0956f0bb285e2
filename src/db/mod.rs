pub mod memory;
pub mod menu_repo;
pub mod postgres;
mod store;

pub use memory::InMemoryMenuStore;
pub use menu_repo::PgMenuStore;
pub use postgres::{create_pool, run_migrations};
pub use store::MenuStore;
