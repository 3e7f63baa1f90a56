//! pokearena-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit, hinter dem der
//! Benutzer- und der Inventar-Store liegen. Der Auth-Kern kennt nur die
//! Traits; die SQLite-Implementierung wird vom Server verdrahtet.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{DatabaseConfig, DbResult, InventoryRepository, UserRepository};
pub use sqlite::SqliteDb;
