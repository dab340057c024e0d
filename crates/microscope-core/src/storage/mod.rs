pub mod import;
pub mod schema;
pub mod sqlite_manager;
pub mod store;

pub use sqlite_manager::SqliteManager;
pub use store::Store;
