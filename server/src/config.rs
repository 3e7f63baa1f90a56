//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use std::net::SocketAddr;

use pokearena_auth::KostenParameter;
use pokearena_db::DatabaseConfig;
use serde::{Deserialize, Serialize};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP-Einstellungen
    pub server: ServerEinstellungen,
    /// Datenbank-Einstellungen
    pub datenbank: DatenbankEinstellungen,
    /// Token- und Passwort-Einstellungen
    pub auth: AuthEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// HTTP-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    pub bind_adresse: String,
    pub port: u16,
    /// CORS-Origins fuer REST (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        Self {
            url: "sqlite://pokearena.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

impl From<&DatenbankEinstellungen> for DatabaseConfig {
    fn from(e: &DatenbankEinstellungen) -> Self {
        Self {
            url: e.url.clone(),
            max_verbindungen: e.max_verbindungen,
            sqlite_wal: e.sqlite_wal,
        }
    }
}

/// Token- und Passwort-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// HMAC-Geheimnis fuer Tokens (leer = zufaellig beim Start)
    pub jwt_secret: String,
    pub argon2_speicher_kib: u32,
    pub argon2_iterationen: u32,
    pub argon2_parallelitaet: u32,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        let kosten = KostenParameter::default();
        Self {
            jwt_secret: String::new(),
            argon2_speicher_kib: kosten.speicher_kib,
            argon2_iterationen: kosten.iterationen,
            argon2_parallelitaet: kosten.parallelitaet,
        }
    }
}

impl AuthEinstellungen {
    pub fn kosten(&self) -> KostenParameter {
        KostenParameter {
            speicher_kib: self.argon2_speicher_kib,
            iterationen: self.argon2_iterationen,
            parallelitaet: self.argon2_parallelitaet,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt `None` zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Uebernimmt gesetzte `POKEARENA_*`-Umgebungsvariablen
    pub fn umgebung_anwenden(&mut self) {
        self.umgebung_anwenden_mit(|name| std::env::var(name).ok());
    }

    fn umgebung_anwenden_mit(&mut self, lesen: impl Fn(&str) -> Option<String>) {
        if let Some(geheimnis) = lesen("POKEARENA_JWT_SECRET").filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = geheimnis;
        }
        if let Some(level) = lesen("POKEARENA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lesen("POKEARENA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Gibt die Bind-Adresse fuer den REST-Server zurueck
    pub fn rest_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        let adresse = format!("{}:{}", self.server.bind_adresse, self.server.port);
        adresse
            .parse()
            .map_err(|e| anyhow::anyhow!("Ungueltige Bind-Adresse '{adresse}': {e}"))
    }
}
