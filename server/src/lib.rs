//! pokearena-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Auth-Service und REST-API und stellt den
//! oeffentlichen Einstiegspunkt bereit.

pub mod config;

use std::sync::Arc;

use anyhow::Result;
use config::ServerConfig;
use pokearena_api::{ApiState, RestServer, RestServerKonfig};
use pokearena_auth::{zufaelliges_geheimnis, AuthService, PasswortHasher, TokenService};
use pokearena_db::{DatabaseConfig, SqliteDb};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbankverbindung herstellen, Migrationen ausfuehren
    /// 2. Passwort-Hasher und Token-Service aufbauen
    /// 3. REST-API starten
    /// 4. Auf Ctrl-C warten, laufende Anfragen abschliessen
    pub async fn starten(self) -> Result<()> {
        let bind_addr = self.config.rest_bind_adresse()?;

        let db = Arc::new(SqliteDb::oeffnen(&DatabaseConfig::from(&self.config.datenbank)).await?);

        let hasher = PasswortHasher::neu(self.config.auth.kosten())?;
        let tokens = TokenService::neu(&self.token_geheimnis())?;
        let auth = Arc::new(AuthService::neu(Arc::clone(&db), db, hasher, tokens));

        let rest = RestServer::neu(RestServerKonfig {
            bind_addr,
            cors_origins: self.config.server.cors_origins.clone(),
        });

        tracing::info!(adresse = %bind_addr, "Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        rest.starten(ApiState::neu(auth), shutdown_signal()).await?;

        Ok(())
    }

    fn token_geheimnis(&self) -> Vec<u8> {
        if self.config.auth.jwt_secret.is_empty() {
            tracing::warn!(
                "Kein jwt_secret konfiguriert, verwende zufaelliges Geheimnis (Tokens ueberleben keinen Neustart)"
            );
            return zufaelliges_geheimnis();
        }
        self.config.auth.jwt_secret.as_bytes().to_vec()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(fehler = %e, "Ctrl-C-Handler konnte nicht installiert werden");
        return;
    }
    tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
}
