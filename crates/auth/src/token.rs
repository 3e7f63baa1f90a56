//! Signierte Session-Tokens
//!
//! Tokens sind selbsttragende JWTs (HS256) mit einem festen Claim-Schema.
//! Es gibt keinen serverseitigen Session-Store: ein Token ist gueltig, bis
//! sein Ablaufzeitpunkt erreicht ist. Ein Wechsel des Geheimnisses
//! invalidiert alle ausgestellten Tokens.

use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use pokearena_core::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Gueltigkeitsdauer eines Session-Tokens: 24 Stunden ab Ausstellung
pub const TOKEN_GUELTIGKEIT_STUNDEN: i64 = 24;

/// Signaturverfahren – ausschliesslich HMAC-SHA256
const TOKEN_ALGORITHMUS: Algorithm = Algorithm::HS256;

/// Zeitquelle des TokenService (austauschbar fuer Tests)
pub type Uhr = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Fehler beim Ausstellen oder Pruefen eines Tokens
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenFehler {
    #[error("Token nicht lesbar: {0}")]
    Fehlerhaft(String),

    #[error("Token-Signatur ungueltig")]
    UngueltigeSignatur,

    #[error("Token abgelaufen")]
    Abgelaufen,

    #[error("Token-Signierung fehlgeschlagen: {0}")]
    Signierung(String),
}

/// Claim-Set eines Session-Tokens
///
/// Unbekannte oder fehlende Felder machen das Token unlesbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// ID des Benutzers
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Benutzername zum Zeitpunkt der Ausstellung
    pub username: String,
    /// Ausgestellt am (Unix-Sekunden)
    pub iat: i64,
    /// Laeuft ab am (Unix-Sekunden)
    pub exp: i64,
    /// Zufaellige Token-ID, macht gleichzeitig ausgestellte Tokens unterscheidbar
    pub jti: Uuid,
}

/// Stellt Session-Tokens aus und verifiziert sie
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    uhr: Uhr,
}

impl TokenService {
    /// Erstellt einen TokenService mit dem prozessweiten Geheimnis
    pub fn neu(geheimnis: &[u8]) -> Result<Self, TokenFehler> {
        if geheimnis.is_empty() {
            return Err(TokenFehler::Signierung(
                "Signatur-Geheimnis darf nicht leer sein".into(),
            ));
        }

        let mut validation = Validation::new(TOKEN_ALGORITHMUS);
        // Ablauf wird gegen die eigene Uhr geprueft, ohne Toleranz
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(geheimnis),
            decoding_key: DecodingKey::from_secret(geheimnis),
            validation,
            uhr: Arc::new(Utc::now),
        })
    }

    /// Ersetzt die Zeitquelle
    pub fn mit_uhr(mut self, uhr: Uhr) -> Self {
        self.uhr = uhr;
        self
    }

    /// Stellt ein Token fuer den Benutzer aus
    pub fn ausstellen(&self, user_id: UserId, username: &str) -> Result<String, TokenFehler> {
        let jetzt = (self.uhr)();
        let claims = Claims {
            user_id,
            username: username.to_string(),
            iat: jetzt.timestamp(),
            exp: (jetzt + Duration::hours(TOKEN_GUELTIGKEIT_STUNDEN)).timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(TOKEN_ALGORITHMUS), &claims, &self.encoding_key)
            .map_err(|e| TokenFehler::Signierung(e.to_string()))
    }

    /// Prueft Format, Signatur und Ablauf eines Tokens
    pub fn verifizieren(&self, token: &str) -> Result<Claims, TokenFehler> {
        let daten = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenFehler::UngueltigeSignatur
                }
                ErrorKind::ExpiredSignature => TokenFehler::Abgelaufen,
                _ => TokenFehler::Fehlerhaft(e.to_string()),
            }
        })?;

        let claims = daten.claims;
        if (self.uhr)().timestamp() >= claims.exp {
            return Err(TokenFehler::Abgelaufen);
        }

        Ok(claims)
    }
}

/// Erzeugt ein zufaelliges 32-Byte-Geheimnis (wenn keines konfiguriert ist)
pub fn zufaelliges_geheimnis() -> Vec<u8> {
    let mut bytes = vec![0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes
}
