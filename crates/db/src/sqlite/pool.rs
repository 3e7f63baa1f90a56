//! SQLite-Verbindungspool fuer Benutzer- und Inventar-Store

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::repository::{DatabaseConfig, DbResult};

/// URL einer fluechtigen Datenbank, die nur so lange lebt wie der Pool
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Geoeffnete, migrierte Pokearena-Datenbank
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

impl SqliteDb {
    /// Oeffnet die Datenbank laut Konfiguration und bringt das Schema auf Stand
    ///
    /// Eine In-Memory-URL wird auf genau eine dauerhafte Verbindung beschraenkt,
    /// da jede weitere Verbindung eine eigene leere Datenbank saehe.
    pub async fn oeffnen(config: &DatabaseConfig) -> DbResult<Self> {
        let fluechtig = config.url.contains(":memory:");

        let mut verbindung = SqliteConnectOptions::from_str(&config.url)?.foreign_keys(true);
        let mut pool = SqlitePoolOptions::new();

        if fluechtig {
            pool = pool
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            let journal = if config.sqlite_wal {
                SqliteJournalMode::Wal
            } else {
                SqliteJournalMode::Delete
            };
            verbindung = verbindung.create_if_missing(true).journal_mode(journal);
            pool = pool.max_connections(config.max_verbindungen.max(1));
        }

        let pool = pool.connect_with(verbindung).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!(
            url = %config.url,
            fluechtig,
            wal = config.sqlite_wal && !fluechtig,
            max_verbindungen = pool.options().get_max_connections(),
            "Datenbank bereit"
        );

        Ok(Self { pool })
    }

    /// Fluechtige Datenbank, vor allem fuer Tests
    pub async fn in_memory() -> DbResult<Self> {
        Self::oeffnen(&DatabaseConfig {
            url: IN_MEMORY_URL.into(),
            max_verbindungen: 1,
            sqlite_wal: false,
        })
        .await
    }
}
