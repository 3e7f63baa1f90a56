//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Der Auth-Kern konsumiert ausschliesslich diese
//! Traits; Fehler werden ohne Retry an den Aufrufer durchgereicht.

use std::future::Future;

use pokearena_core::UserId;

use crate::error::DbError;
use crate::models::{BenutzerRecord, InventarEintrag, NeuerBenutzer};

/// Result-Alias fuer Datenbank-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://pokearena.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://pokearena.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer Benutzer-Datenzugriffe (User-Store)
pub trait UserRepository: Send + Sync {
    /// Einen neuen Benutzer anlegen
    ///
    /// Liefert `DbError::Eindeutigkeit` wenn der Benutzername vergeben ist.
    fn create(
        &self,
        data: NeuerBenutzer<'_>,
    ) -> impl Future<Output = DbResult<BenutzerRecord>> + Send;

    /// Einen Benutzer anhand seiner ID laden
    fn get_by_id(&self, id: UserId)
        -> impl Future<Output = DbResult<Option<BenutzerRecord>>> + Send;

    /// Einen Benutzer anhand seines Namens laden
    fn get_by_name(
        &self,
        username: &str,
    ) -> impl Future<Output = DbResult<Option<BenutzerRecord>>> + Send;
}

/// Repository fuer Inventar-Datenzugriffe (Inventar-Store)
pub trait InventoryRepository: Send + Sync {
    /// Alle Inventar-Eintraege eines Benutzers laden (nach Item sortiert)
    fn get_inventory(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = DbResult<Vec<InventarEintrag>>> + Send;

    /// Einen einzelnen Inventar-Eintrag laden
    fn get_item(
        &self,
        user_id: UserId,
        item: &str,
    ) -> impl Future<Output = DbResult<Option<InventarEintrag>>> + Send;

    /// Setzt die Menge eines Gegenstands (legt den Eintrag bei Bedarf an)
    fn upsert(
        &self,
        user_id: UserId,
        item: &str,
        quantity: i64,
    ) -> impl Future<Output = DbResult<()>> + Send;

    /// Erhoeht die Menge eines Gegenstands um `delta` und gibt den neuen Stand zurueck
    fn add(
        &self,
        user_id: UserId,
        item: &str,
        delta: i64,
    ) -> impl Future<Output = DbResult<InventarEintrag>> + Send;
}
