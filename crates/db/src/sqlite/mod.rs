//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod inventory;
pub mod pool;
pub mod users;

pub use pool::SqliteDb;
