// Adapters layer: concrete implementations for external systems (database, storage, http).

pub mod sqlite;

pub use sqlite::SqliteSource;
