//! Autorisierungs-Policy fuer fremde Ressourcen
//!
//! Eine einzige Regel entscheidet ueber jede benutzeruebergreifende
//! Aenderung: der Handelnde darf auf eigene Ressourcen immer zugreifen,
//! auf fremde nur wenn er privilegiert (Admin) ist. Das Urteil wird bei
//! jeder Anfrage neu berechnet und nie gecacht.

use pokearena_core::UserId;

use crate::token::Claims;

/// Reservierte Admin-ID
pub const ADMIN_USER_ID: UserId = UserId(1);

/// Reservierter Admin-Benutzername
pub const ADMIN_USERNAME: &str = "admin";

/// Authentifizierte Identitaet, abgeleitet aus einem gueltigen Token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentitaet {
    pub user_id: UserId,
    pub username: String,
}

impl AuthIdentitaet {
    pub fn neu(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }

    /// Gibt `true` zurueck wenn diese Identitaet Admin-Rechte hat
    pub fn ist_privilegiert(&self) -> bool {
        ist_privilegiert(self.user_id, &self.username)
    }
}

impl From<Claims> for AuthIdentitaet {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Ergebnis einer Autorisierungsentscheidung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urteil {
    Erlaubt,
    Verweigert,
}

/// Admin per reservierter ID ODER per reserviertem Namen
///
/// Beide Merkmale gelten unabhaengig voneinander.
pub fn ist_privilegiert(user_id: UserId, username: &str) -> bool {
    user_id == ADMIN_USER_ID || username == ADMIN_USERNAME
}

/// Darf `handelnde` auf die Ressourcen von `ziel` zugreifen?
pub fn autorisieren(handelnde: &AuthIdentitaet, ziel: UserId) -> Urteil {
    if handelnde.user_id == ziel || handelnde.ist_privilegiert() {
        Urteil::Erlaubt
    } else {
        Urteil::Verweigert
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eigene_ressourcen_immer_erlaubt() {
        let bob = AuthIdentitaet::neu(UserId(5), "bob");
        assert_eq!(autorisieren(&bob, UserId(5)), Urteil::Erlaubt);
    }

    #[test]
    fn admin_per_id() {
        let admin = AuthIdentitaet::neu(UserId(1), "anyone");
        assert_eq!(autorisieren(&admin, UserId(999)), Urteil::Erlaubt);
    }

    #[test]
    fn admin_per_name() {
        let admin = AuthIdentitaet::neu(UserId(1), "admin");
        assert_eq!(autorisieren(&admin, UserId(999)), Urteil::Erlaubt);

        let nur_name = AuthIdentitaet::neu(UserId(42), "admin");
        assert_eq!(autorisieren(&nur_name, UserId(999)), Urteil::Erlaubt);
    }

    #[test]
    fn fremde_ressourcen_ohne_privileg_verweigert() {
        let bob = AuthIdentitaet::neu(UserId(7), "bob");
        assert_eq!(autorisieren(&bob, UserId(999)), Urteil::Verweigert);
        assert_eq!(autorisieren(&bob, ADMIN_USER_ID), Urteil::Verweigert);
    }

    #[test]
    fn privileg_ist_oder_verknuepfung() {
        assert!(ist_privilegiert(UserId(1), "bob"));
        assert!(ist_privilegiert(UserId(7), "admin"));
        assert!(!ist_privilegiert(UserId(7), "bob"));
        assert!(!ist_privilegiert(UserId(7), "Admin"));
    }
}
