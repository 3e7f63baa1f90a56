//! Passwort-Hashing mit Argon2id
//!
//! Stellt sichere Passwort-Hashfunktionen mit Argon2id bereit.
//! Der erzeugte PHC-String enthaelt Algorithmus, Parameter und Salt, sodass
//! bei der Verifikation immer die Parameter des gespeicherten Hashes gelten.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::{AuthError, AuthResult};

/// Argon2id-Kostenparameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KostenParameter {
    /// Speicherbedarf in KiB
    pub speicher_kib: u32,
    /// Anzahl Iterationen
    pub iterationen: u32,
    /// Parallelitaet (Lanes)
    pub parallelitaet: u32,
}

impl Default for KostenParameter {
    /// Werte gemaess OWASP-Empfehlungen: 64 MiB, 3 Iterationen, 1 Thread
    fn default() -> Self {
        Self {
            speicher_kib: 64 * 1024,
            iterationen: 3,
            parallelitaet: 1,
        }
    }
}

impl KostenParameter {
    /// Minimale Kosten – nur fuer Tests, niemals im Betrieb
    pub fn guenstig() -> Self {
        Self {
            speicher_kib: 8,
            iterationen: 1,
            parallelitaet: 1,
        }
    }
}

/// Einweg-Hasher fuer Passwoerter
///
/// Zustandslos bis auf die unveraenderlichen Kostenparameter; kann beliebig
/// geklont und nebenlaeufig benutzt werden.
#[derive(Debug, Clone)]
pub struct PasswortHasher {
    params: Params,
}

impl PasswortHasher {
    /// Erstellt einen Hasher mit den angegebenen Kosten
    pub fn neu(kosten: KostenParameter) -> AuthResult<Self> {
        let params = Params::new(
            kosten.speicher_kib,
            kosten.iterationen,
            kosten.parallelitaet,
            None, // output_len: Standard (32 Bytes)
        )
        .map_err(|e| AuthError::PasswortHashing(format!("Argon2-Parameter ungueltig: {e}")))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hasht ein Passwort mit einem zufaelligen Salt
    ///
    /// Gibt den PHC-String zurueck (inkl. Algorithmus, Parameter und Salt).
    pub fn hashen(&self, passwort: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(passwort.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswortHashing(e.to_string()))
    }

    /// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
    ///
    /// Ein falsches Passwort ist kein Fehler, sondern `false`. Ein nicht
    /// lesbarer Hash ebenfalls.
    pub fn verifizieren(&self, hash: &str, passwort: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!(fehler = %e, "Gespeicherter Passwort-Hash nicht lesbar");
                return false;
            }
        };

        match self.argon2().verify_password(passwort.as_bytes(), &parsed_hash) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                tracing::warn!(fehler = %e, "Passwort-Verifikation fehlgeschlagen");
                false
            }
        }
    }
}
