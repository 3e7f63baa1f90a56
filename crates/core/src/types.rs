//! Gemeinsame Identifikationstypen fuer Pokearena
//!
//! Benutzer-IDs verwenden das Newtype-Pattern, damit sie zur Compilezeit
//! nicht mit Mengen oder anderen Ganzzahlen verwechselt werden koennen.

use serde::{Deserialize, Serialize};

/// Stabile Benutzer-ID (vom User-Store vergeben)
///
/// Wird im JSON als nackte Zahl serialisiert (`"userId": 5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Gibt den inneren Zahlenwert zurueck
    pub fn inner(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}
