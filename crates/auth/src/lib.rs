//! pokearena-auth – Authentifizierungs- und Autorisierungskern
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Signierte, zeitlich begrenzte Session-Tokens (HS256, zustandslos)
//! - Die Admin-Override-Policy fuer fremde Inventare
//! - AuthService (Registrierung, Login, Identitaetsaufloesung, Profil, Inventar)

pub mod error;
pub mod password;
pub mod policy;
pub mod service;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use password::{KostenParameter, PasswortHasher};
pub use policy::{AuthIdentitaet, Urteil, ADMIN_USERNAME, ADMIN_USER_ID};
pub use service::{AuthErgebnis, AuthService, Profil, POKEMON_ITEM};
pub use token::{
    zufaelliges_geheimnis, Claims, TokenFehler, TokenService, Uhr, TOKEN_GUELTIGKEIT_STUNDEN,
};
