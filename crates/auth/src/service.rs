//! Auth-Service fuer Pokearena
//!
//! Zentraler Service fuer Registrierung, Login, Identitaetsaufloesung und die
//! autorisierten Inventar-Operationen. Nutzt den User- und den Inventar-Store
//! als externe Kollaborateure; Store-Fehler werden ohne Retry weitergereicht.
//!
//! Zustandsfolge pro Anfrage:
//! nicht authentifiziert -> (gueltiges Token) -> authentifiziert
//! -> (Zielaufloesung) -> autorisiert | verweigert

use std::sync::Arc;

use pokearena_core::UserId;
use pokearena_db::{
    models::{BenutzerRecord, InventarEintrag, NeuerBenutzer},
    repository::{InventoryRepository, UserRepository},
};

use crate::{
    error::{AuthError, AuthResult},
    password::PasswortHasher,
    policy::{self, AuthIdentitaet, Urteil},
    token::TokenService,
};

/// Item das beim Fangen eines Pokemon gutgeschrieben wird
pub const POKEMON_ITEM: &str = "enemy";

const DUMMY_PASSWORT: &str = "pokearena-dummy-passwort";

/// Ergebnis von Registrierung und Login
#[derive(Debug, Clone)]
pub struct AuthErgebnis {
    pub benutzer: BenutzerRecord,
    pub token: String,
}

/// Profil eines angemeldeten Benutzers
#[derive(Debug, Clone)]
pub struct Profil {
    pub benutzer: BenutzerRecord,
    pub inventar: Vec<InventarEintrag>,
    pub ist_admin: bool,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U: UserRepository, I: InventoryRepository> {
    user_repo: Arc<U>,
    inventar_repo: Arc<I>,
    hasher: PasswortHasher,
    tokens: TokenService,
    /// Vergleichshash fuer unbekannte Benutzernamen (gleicher Aufwand wie ein echter Login)
    dummy_hash: Option<String>,
}

impl<U: UserRepository, I: InventoryRepository> AuthService<U, I> {
    /// Erstellt einen neuen AuthService
    ///
    /// Berechnet dabei einmalig den Vergleichshash, damit schon der erste
    /// Login eines unbekannten Benutzers nur eine Verifikation kostet.
    pub fn neu(
        user_repo: Arc<U>,
        inventar_repo: Arc<I>,
        hasher: PasswortHasher,
        tokens: TokenService,
    ) -> Self {
        let dummy_hash = match hasher.hashen(DUMMY_PASSWORT) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(fehler = %e, "Vergleichshash konnte nicht erzeugt werden");
                None
            }
        };

        Self {
            user_repo,
            inventar_repo,
            hasher,
            tokens,
            dummy_hash,
        }
    }

    /// Registriert einen neuen Benutzer und stellt direkt ein Token aus
    pub async fn registrieren(
        &self,
        username: &str,
        email: &str,
        passwort: &str,
    ) -> AuthResult<AuthErgebnis> {
        pflichtfeld("username", username)?;
        pflichtfeld("email", email)?;
        pflichtfeld("password", passwort)?;

        if self.user_repo.get_by_name(username).await?.is_some() {
            return Err(AuthError::BenutzernameVergeben(username.to_string()));
        }

        let hasher = self.hasher.clone();
        let klartext = passwort.to_string();
        let passwort_hash = blockierend(move || hasher.hashen(&klartext)).await??;

        // Zwischen Pruefung und Anlage kann ein paralleler Request den Namen belegen
        let benutzer = self
            .user_repo
            .create(NeuerBenutzer {
                username,
                email,
                password_hash: &passwort_hash,
            })
            .await
            .map_err(|e| {
                if e.ist_eindeutigkeit() {
                    AuthError::BenutzernameVergeben(username.to_string())
                } else {
                    AuthError::Datenbank(e)
                }
            })?;

        let token = self.tokens.ausstellen(benutzer.id, &benutzer.username)?;

        tracing::info!(
            user_id = %benutzer.id,
            username = %benutzer.username,
            "Neuer Benutzer registriert"
        );

        Ok(AuthErgebnis { benutzer, token })
    }

    /// Meldet einen Benutzer an
    ///
    /// Unbekannter Benutzer und falsches Passwort ergeben denselben Fehler
    /// und kosten dieselbe Hash-Arbeit.
    pub async fn anmelden(&self, username: &str, passwort: &str) -> AuthResult<AuthErgebnis> {
        pflichtfeld("username", username)?;
        pflichtfeld("password", passwort)?;

        let benutzer = self.user_repo.get_by_name(username).await?;

        let gespeicherter_hash = match &benutzer {
            Some(b) => Some(b.password_hash.clone()),
            None => self.dummy_hash.clone(),
        };

        let korrekt = match gespeicherter_hash {
            Some(hash) => {
                let hasher = self.hasher.clone();
                let klartext = passwort.to_string();
                blockierend(move || hasher.verifizieren(&hash, &klartext)).await?
            }
            None => false,
        };

        let benutzer = match benutzer {
            Some(b) if korrekt => b,
            _ => {
                tracing::warn!(username = %username, "Fehlgeschlagener Login-Versuch");
                return Err(AuthError::UngueltigeAnmeldedaten);
            }
        };

        let token = self.tokens.ausstellen(benutzer.id, &benutzer.username)?;

        tracing::info!(
            user_id = %benutzer.id,
            username = %benutzer.username,
            "Benutzer angemeldet"
        );

        Ok(AuthErgebnis { benutzer, token })
    }

    /// Loest ein Bearer-Token zur authentifizierten Identitaet auf
    ///
    /// Jeder Token-Fehler wird zu `NichtAuthentifiziert`; der Grund wird nur geloggt.
    pub fn identitaet_aufloesen(&self, bearer_token: &str) -> AuthResult<AuthIdentitaet> {
        self.tokens
            .verifizieren(bearer_token)
            .map(AuthIdentitaet::from)
            .map_err(|e| {
                tracing::debug!(grund = %e, "Token abgelehnt");
                AuthError::NichtAuthentifiziert
            })
    }

    /// Bestimmt das effektive Ziel einer Aktion und prueft die Berechtigung
    ///
    /// Ohne explizites Ziel handelt der Benutzer fuer sich selbst. Das Ziel
    /// wird aufgeloest bevor die Policy entscheidet.
    pub fn ziel_autorisieren(
        &self,
        handelnde: &AuthIdentitaet,
        angefragtes_ziel: Option<UserId>,
    ) -> AuthResult<UserId> {
        let ziel = angefragtes_ziel.unwrap_or(handelnde.user_id);

        match policy::autorisieren(handelnde, ziel) {
            Urteil::Erlaubt => Ok(ziel),
            Urteil::Verweigert => {
                tracing::warn!(
                    user_id = %handelnde.user_id,
                    ziel = %ziel,
                    "Zugriff auf fremdes Inventar verweigert"
                );
                Err(AuthError::ZugriffVerweigert(format!(
                    "{} darf {} nicht aendern",
                    handelnde.user_id, ziel
                )))
            }
        }
    }

    /// Laedt das Profil des angemeldeten Benutzers inkl. Inventar
    ///
    /// Ein fehlgeschlagener Inventar-Abruf liefert ein leeres Inventar.
    pub async fn profil(&self, handelnde: &AuthIdentitaet) -> AuthResult<Profil> {
        let benutzer = self
            .user_repo
            .get_by_id(handelnde.user_id)
            .await?
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(handelnde.user_id.to_string()))?;

        let inventar = match self.inventar_repo.get_inventory(handelnde.user_id).await {
            Ok(inventar) => inventar,
            Err(e) => {
                tracing::error!(
                    user_id = %handelnde.user_id,
                    fehler = %e,
                    "Inventar konnte nicht geladen werden"
                );
                Vec::new()
            }
        };

        Ok(Profil {
            benutzer,
            inventar,
            ist_admin: handelnde.ist_privilegiert(),
        })
    }

    /// Setzt die Menge eines Gegenstands im Inventar des (ggf. fremden) Ziels
    pub async fn inventar_setzen(
        &self,
        handelnde: &AuthIdentitaet,
        angefragtes_ziel: Option<UserId>,
        item: &str,
        menge: i64,
    ) -> AuthResult<UserId> {
        pflichtfeld("item", item)?;
        if menge < 0 {
            return Err(AuthError::eingabe("quantity must not be negative"));
        }

        let ziel = self.ziel_autorisieren(handelnde, angefragtes_ziel)?;
        self.inventar_repo.upsert(ziel, item, menge).await?;

        tracing::info!(
            user_id = %handelnde.user_id,
            ziel = %ziel,
            item = %item,
            menge,
            "Inventar aktualisiert"
        );

        Ok(ziel)
    }

    /// Schreibt dem (ggf. fremden) Ziel ein gefangenes Pokemon gut
    pub async fn pokemon_hinzufuegen(
        &self,
        handelnde: &AuthIdentitaet,
        angefragtes_ziel: Option<UserId>,
    ) -> AuthResult<InventarEintrag> {
        let ziel = self.ziel_autorisieren(handelnde, angefragtes_ziel)?;
        let eintrag = self.inventar_repo.add(ziel, POKEMON_ITEM, 1).await?;

        tracing::info!(
            user_id = %handelnde.user_id,
            ziel = %ziel,
            menge = eintrag.quantity,
            "Pokemon hinzugefuegt"
        );

        Ok(eintrag)
    }
}

/// Leere Pflichtfelder sind Eingabefehler
fn pflichtfeld(name: &str, wert: &str) -> AuthResult<()> {
    if wert.trim().is_empty() {
        return Err(AuthError::eingabe(format!("{name} is required")));
    }
    Ok(())
}

/// Fuehrt CPU-lastige Arbeit (Argon2) ausserhalb der Async-Worker aus
async fn blockierend<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::intern(format!("Hash-Task abgebrochen: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    use chrono::Utc;
    use pokearena_db::{DbError, DbResult};

    use crate::password::KostenParameter;

    // Minimaler In-Memory-Store fuer Tests (Benutzer + Inventar)
    #[derive(Default)]
    struct TestStore {
        benutzer: Mutex<Vec<BenutzerRecord>>,
        inventar: Mutex<Vec<InventarEintrag>>,
        inventar_kaputt: AtomicBool,
    }

    impl TestStore {
        fn pruefen(&self) -> DbResult<()> {
            if self.inventar_kaputt.load(Ordering::SeqCst) {
                return Err(DbError::intern("Verbindung verloren"));
            }
            Ok(())
        }

        fn existiert(&self, id: UserId) -> bool {
            self.benutzer.lock().unwrap().iter().any(|u| u.id == id)
        }
    }

    impl UserRepository for TestStore {
        async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
            let mut benutzer = self.benutzer.lock().unwrap();
            if benutzer.iter().any(|u| u.username == data.username) {
                return Err(DbError::Eindeutigkeit(data.username.to_string()));
            }
            let record = BenutzerRecord {
                id: UserId(benutzer.len() as i64 + 1),
                username: data.username.to_string(),
                email: data.email.to_string(),
                password_hash: data.password_hash.to_string(),
                created_at: Utc::now(),
            };
            benutzer.push(record.clone());
            Ok(record)
        }

        async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
            Ok(self.benutzer.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn get_by_name(&self, username: &str) -> DbResult<Option<BenutzerRecord>> {
            Ok(self
                .benutzer
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }
    }

    impl InventoryRepository for TestStore {
        async fn get_inventory(&self, user_id: UserId) -> DbResult<Vec<InventarEintrag>> {
            self.pruefen()?;
            Ok(self
                .inventar
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn get_item(&self, user_id: UserId, item: &str) -> DbResult<Option<InventarEintrag>> {
            self.pruefen()?;
            Ok(self
                .inventar
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.user_id == user_id && e.item == item)
                .cloned())
        }

        async fn upsert(&self, user_id: UserId, item: &str, quantity: i64) -> DbResult<()> {
            self.pruefen()?;
            if !self.existiert(user_id) {
                return Err(DbError::nicht_gefunden(user_id.to_string()));
            }
            let mut inventar = self.inventar.lock().unwrap();
            match inventar
                .iter_mut()
                .find(|e| e.user_id == user_id && e.item == item)
            {
                Some(e) => e.quantity = quantity,
                None => inventar.push(InventarEintrag {
                    user_id,
                    item: item.to_string(),
                    quantity,
                }),
            }
            Ok(())
        }

        async fn add(&self, user_id: UserId, item: &str, delta: i64) -> DbResult<InventarEintrag> {
            self.pruefen()?;
            if !self.existiert(user_id) {
                return Err(DbError::nicht_gefunden(user_id.to_string()));
            }
            let mut inventar = self.inventar.lock().unwrap();
            let pos = match inventar
                .iter()
                .position(|e| e.user_id == user_id && e.item == item)
            {
                Some(pos) => pos,
                None => {
                    inventar.push(InventarEintrag {
                        user_id,
                        item: item.to_string(),
                        quantity: 0,
                    });
                    inventar.len() - 1
                }
            };
            inventar[pos].quantity += delta;
            Ok(inventar[pos].clone())
        }
    }

    fn test_service() -> (AuthService<TestStore, TestStore>, Arc<TestStore>) {
        let store = Arc::new(TestStore::default());
        let hasher = PasswortHasher::neu(KostenParameter::guenstig()).unwrap();
        let tokens = TokenService::neu(b"service-test-geheimnis").unwrap();
        (
            AuthService::neu(Arc::clone(&store), Arc::clone(&store), hasher, tokens),
            store,
        )
    }

    async fn angemeldet(
        service: &AuthService<TestStore, TestStore>,
        name: &str,
    ) -> AuthIdentitaet {
        let ergebnis = service
            .registrieren(name, &format!("{name}@example.com"), "pw123")
            .await
            .unwrap();
        service.identitaet_aufloesen(&ergebnis.token).unwrap()
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let (service, _) = test_service();

        let registriert = service
            .registrieren("alice", "a@x.com", "pw123")
            .await
            .expect("Registrierung fehlgeschlagen");

        assert_eq!(registriert.benutzer.username, "alice");
        assert_eq!(registriert.benutzer.email, "a@x.com");
        assert_ne!(registriert.benutzer.password_hash, "pw123");

        let angemeldet = service
            .anmelden("alice", "pw123")
            .await
            .expect("Anmeldung fehlgeschlagen");

        assert_eq!(angemeldet.benutzer.id, registriert.benutzer.id);
        assert_ne!(angemeldet.token, registriert.token);

        // Beide Tokens sind unabhaengig gueltig
        for token in [&registriert.token, &angemeldet.token] {
            let identitaet = service.identitaet_aufloesen(token).unwrap();
            assert_eq!(identitaet.user_id, registriert.benutzer.id);
            assert_eq!(identitaet.username, "alice");
        }
    }

    #[tokio::test]
    async fn doppelte_registrierung_schlaegt_fehl() {
        let (service, _) = test_service();
        service.registrieren("alice", "a@x.com", "pw123").await.unwrap();

        let ergebnis = service.registrieren("alice", "b@x.com", "anderes").await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzernameVergeben(_))));
    }

    #[tokio::test]
    async fn falsches_passwort_und_unbekannter_benutzer_gleicher_fehler() {
        let (service, _) = test_service();
        service.registrieren("alice", "a@x.com", "pw123").await.unwrap();

        let falsch = service.anmelden("alice", "wrong").await;
        assert!(matches!(falsch, Err(AuthError::UngueltigeAnmeldedaten)));

        let unbekannt = service.anmelden("notCreated", "pw123").await;
        assert!(matches!(unbekannt, Err(AuthError::UngueltigeAnmeldedaten)));
    }

    #[test]
    fn vergleichshash_liegt_ab_erstellung_vor() {
        let (service, _) = test_service();

        let hash = service.dummy_hash.as_deref().expect("Vergleichshash fehlt");
        assert!(service.hasher.verifizieren(hash, DUMMY_PASSWORT));
        assert!(!service.hasher.verifizieren(hash, "pw123"));
    }

    #[tokio::test]
    async fn leere_pflichtfelder_sind_eingabefehler() {
        let (service, _) = test_service();

        let ergebnis = service.registrieren("", "a@x.com", "pw").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));

        let ergebnis = service.registrieren("alice", "a@x.com", "   ").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));

        let ergebnis = service.anmelden("alice", "").await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));
    }

    #[tokio::test]
    async fn ungueltiges_token_ist_nicht_authentifiziert() {
        let (service, _) = test_service();
        let ergebnis = service.identitaet_aufloesen("kein.gueltiges.token");
        assert!(matches!(ergebnis, Err(AuthError::NichtAuthentifiziert)));

        let fremd = TokenService::neu(b"fremdes-geheimnis")
            .unwrap()
            .ausstellen(UserId(1), "admin")
            .unwrap();
        let ergebnis = service.identitaet_aufloesen(&fremd);
        assert!(matches!(ergebnis, Err(AuthError::NichtAuthentifiziert)));
    }

    #[tokio::test]
    async fn ziel_ohne_angabe_ist_selbst() {
        let (service, _) = test_service();
        let bob = AuthIdentitaet::neu(UserId(7), "bob");

        assert_eq!(service.ziel_autorisieren(&bob, None).unwrap(), UserId(7));
        assert_eq!(
            service.ziel_autorisieren(&bob, Some(UserId(7))).unwrap(),
            UserId(7)
        );
        assert!(matches!(
            service.ziel_autorisieren(&bob, Some(UserId(999))),
            Err(AuthError::ZugriffVerweigert(_))
        ));
    }

    #[tokio::test]
    async fn admin_darf_fremdes_inventar_aendern() {
        let (service, store) = test_service();
        // Erster registrierter Benutzer erhaelt ID 1 und ist damit Admin
        let admin = angemeldet(&service, "root").await;
        let spieler = angemeldet(&service, "bob").await;
        assert_eq!(admin.user_id, UserId(1));

        let eintrag = service
            .pokemon_hinzufuegen(&admin, Some(spieler.user_id))
            .await
            .unwrap();
        assert_eq!(eintrag.user_id, spieler.user_id);
        assert_eq!(eintrag.item, POKEMON_ITEM);
        assert_eq!(eintrag.quantity, 1);

        let ziel = service
            .inventar_setzen(&admin, Some(spieler.user_id), "potion", 5)
            .await
            .unwrap();
        assert_eq!(ziel, spieler.user_id);
        assert_eq!(store.inventar.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn spieler_darf_fremdes_inventar_nicht_aendern() {
        let (service, store) = test_service();
        let _admin = angemeldet(&service, "root").await;
        let bob = angemeldet(&service, "bob").await;
        let carol = angemeldet(&service, "carol").await;

        let ergebnis = service.pokemon_hinzufuegen(&bob, Some(carol.user_id)).await;
        assert!(matches!(ergebnis, Err(AuthError::ZugriffVerweigert(_))));

        let ergebnis = service
            .inventar_setzen(&bob, Some(carol.user_id), "potion", 5)
            .await;
        assert!(matches!(ergebnis, Err(AuthError::ZugriffVerweigert(_))));

        // Verweigerte Aktionen beruehren den Store nicht
        assert!(store.inventar.lock().unwrap().is_empty());

        // Eigenes Inventar geht immer
        let eintrag = service.pokemon_hinzufuegen(&bob, None).await.unwrap();
        assert_eq!(eintrag.user_id, bob.user_id);
    }

    #[tokio::test]
    async fn negative_menge_wird_abgelehnt() {
        let (service, _) = test_service();
        let bob = angemeldet(&service, "bob").await;

        let ergebnis = service.inventar_setzen(&bob, None, "potion", -1).await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));

        let ergebnis = service.inventar_setzen(&bob, None, "", 1).await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));
    }

    #[tokio::test]
    async fn admin_auf_unbekanntes_ziel_gibt_nicht_gefunden() {
        let (service, _) = test_service();
        let admin = angemeldet(&service, "root").await;

        let ergebnis = service.pokemon_hinzufuegen(&admin, Some(UserId(999))).await;
        let fehler = ergebnis.unwrap_err();
        assert_eq!(fehler.http_status(), 404);
    }

    #[tokio::test]
    async fn profil_mit_inventar_und_admin_flag() {
        let (service, _) = test_service();
        let admin = angemeldet(&service, "root").await;
        let bob = angemeldet(&service, "bob").await;

        service.inventar_setzen(&bob, None, "potion", 3).await.unwrap();

        let profil = service.profil(&bob).await.unwrap();
        assert_eq!(profil.benutzer.username, "bob");
        assert_eq!(profil.inventar.len(), 1);
        assert!(!profil.ist_admin);

        let profil = service.profil(&admin).await.unwrap();
        assert!(profil.ist_admin);
        assert!(profil.inventar.is_empty());
    }

    #[tokio::test]
    async fn profil_bei_inventar_fehler_leer() {
        let (service, store) = test_service();
        let bob = angemeldet(&service, "bob").await;

        store.inventar_kaputt.store(true, Ordering::SeqCst);
        let profil = service.profil(&bob).await.unwrap();
        assert!(profil.inventar.is_empty());
    }

    #[tokio::test]
    async fn profil_ohne_benutzer_gibt_nicht_gefunden() {
        let (service, _) = test_service();
        let geist = AuthIdentitaet::neu(UserId(42), "geist");

        let ergebnis = service.profil(&geist).await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerNichtGefunden(_))));
    }

    #[tokio::test]
    async fn store_fehler_wird_weitergereicht() {
        let (service, store) = test_service();
        let bob = angemeldet(&service, "bob").await;

        store.inventar_kaputt.store(true, Ordering::SeqCst);
        let fehler = service.pokemon_hinzufuegen(&bob, None).await.unwrap_err();
        assert!(matches!(fehler, AuthError::Datenbank(_)));
        assert_eq!(fehler.http_status(), 500);
        assert_eq!(fehler.oeffentliche_meldung(), "Internal server error");
    }
}
