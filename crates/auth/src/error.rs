//! Fehlertypen fuer den Auth-Service

use pokearena_db::DbError;
use thiserror::Error;

use crate::token::TokenFehler;

/// Alle moeglichen Fehler im Auth-Service
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Eingabe ---
    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),

    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Authentifizierung ---
    #[error("Benutzername oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    #[error("Nicht authentifiziert")]
    NichtAuthentifiziert,

    // --- Token ---
    #[error("Token-Signierung fehlgeschlagen: {0}")]
    TokenSignierung(String),

    // --- Berechtigungen ---
    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    // --- Benutzerverwaltung ---
    #[error("Benutzername bereits vergeben: {0}")]
    BenutzernameVergeben(String),

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    pub fn eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// HTTP-Statuscode fuer die Fehlerklasse
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UngueltigeEingabe(_) => 400,
            Self::UngueltigeAnmeldedaten | Self::NichtAuthentifiziert => 401,
            Self::ZugriffVerweigert(_) => 403,
            Self::BenutzerNichtGefunden(_) => 404,
            Self::Datenbank(e) if e.ist_nicht_gefunden() => 404,
            Self::Datenbank(DbError::UngueltigeDaten(_)) => 400,
            Self::BenutzernameVergeben(_) => 409,
            Self::PasswortHashing(_)
            | Self::TokenSignierung(_)
            | Self::Datenbank(_)
            | Self::Intern(_) => 500,
        }
    }

    /// Meldung die an den Client geht
    ///
    /// Interne Details (DB, Hashing, Signierung) werden nie nach aussen gegeben.
    pub fn oeffentliche_meldung(&self) -> String {
        match self {
            Self::UngueltigeEingabe(msg) => format!("Invalid request: {msg}"),
            Self::UngueltigeAnmeldedaten => "Invalid credentials".into(),
            Self::NichtAuthentifiziert => "Unauthorized".into(),
            Self::ZugriffVerweigert(_) => {
                "Only admins can modify other players' inventory".into()
            }
            Self::BenutzernameVergeben(_) => "User already exists".into(),
            Self::BenutzerNichtGefunden(_) => "User not found".into(),
            Self::Datenbank(e) if e.ist_nicht_gefunden() => "User not found".into(),
            Self::Datenbank(DbError::UngueltigeDaten(_)) => "Invalid request".into(),
            Self::PasswortHashing(_)
            | Self::TokenSignierung(_)
            | Self::Datenbank(_)
            | Self::Intern(_) => "Internal server error".into(),
        }
    }
}

impl From<TokenFehler> for AuthError {
    fn from(e: TokenFehler) -> Self {
        match e {
            TokenFehler::Signierung(msg) => Self::TokenSignierung(msg),
            // Alle Verifikationsfehler sind fuer den Aufrufer gleich: nicht authentifiziert
            TokenFehler::Fehlerhaft(_)
            | TokenFehler::UngueltigeSignatur
            | TokenFehler::Abgelaufen => Self::NichtAuthentifiziert,
        }
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
