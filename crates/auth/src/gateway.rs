//! Auth Gateway – Registrierung, Anmeldung, Identitaet und Autorisierung
//!
//! Kompositionswurzel des Auth-Kerns. Der Gateway kennt nur den
//! Credential-Store; Ressourcen-Sammlungen fasst er nicht an.

use std::sync::Arc;

use wohnheim_core::Rolle;
use wohnheim_db::{models::NeuerPrincipal, DbError, PrincipalRepository};

use crate::{
    error::{AuthError, AuthResult, KonfliktFeld},
    password::{self, passwort_hashen, passwort_pruefen},
    policy::{self, Operation, Ressource, Zugriff},
    principal::Principal,
    resolver::PrincipalResolver,
    token::TokenCodec,
};

/// Daten einer Registrierung
#[derive(Debug, Clone)]
pub struct Registrierung {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Rolle,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
}

/// Ausgestelltes Token samt Principal
#[derive(Debug, Clone)]
pub struct Ausweis {
    pub token: String,
    pub principal: Principal,
}

/// Auth Gateway ueber einem Credential-Store
pub struct AuthGateway<U: PrincipalRepository> {
    repo: Arc<U>,
    codec: Arc<TokenCodec>,
    resolver: PrincipalResolver<U>,
}

impl<U: PrincipalRepository> AuthGateway<U> {
    pub fn neu(repo: Arc<U>, codec: Arc<TokenCodec>) -> Self {
        // Ersatz-Hash vorab erzeugen, sonst ist der erste Fehlversuch messbar langsamer
        password::ersatz_hash();
        let resolver = PrincipalResolver::neu(Arc::clone(&repo), Arc::clone(&codec));
        Self { repo, codec, resolver }
    }

    /// Registriert einen neuen Principal und stellt sofort ein Token aus
    ///
    /// Benutzername wird vor E-Mail geprueft. Die UNIQUE-Indizes des Stores
    /// fangen parallele Registrierungen ab, die beide Pruefungen passiert haben.
    pub async fn registrieren(&self, daten: Registrierung) -> AuthResult<Ausweis> {
        validieren(&daten)?;

        if self.repo.get_by_username(&daten.username).await?.is_some() {
            return Err(AuthError::Konflikt(KonfliktFeld::Benutzername));
        }
        if self.repo.get_by_email(&daten.email).await?.is_some() {
            return Err(AuthError::Konflikt(KonfliktFeld::Email));
        }

        let passwort_hash = passwort_hashen(&daten.password)?;

        let record = self
            .repo
            .create(NeuerPrincipal {
                username: &daten.username,
                email: &daten.email,
                role: daten.role,
                full_name: daten.full_name.as_deref(),
                phone: daten.phone.as_deref(),
                student_id: daten.student_id.as_deref(),
                password_hash: &passwort_hash,
            })
            .await
            .map_err(konflikt_oder_db)?;

        let token = self.codec.ausstellen(&record.username)?;

        tracing::info!(
            user_id = %record.id,
            username = %record.username,
            role = %record.role,
            "Neuer Principal registriert"
        );

        Ok(Ausweis {
            token,
            principal: Principal::from(record),
        })
    }

    /// Meldet einen Principal an
    ///
    /// Unbekannter Benutzer, falsches Passwort und inaktiver Principal
    /// liefern denselben Fehler.
    pub async fn anmelden(&self, username: &str, passwort: &str) -> AuthResult<Ausweis> {
        let record = self.repo.get_by_username(username).await?;

        // Auch ohne Treffer wird genau einmal verifiziert
        let passt = passwort_pruefen(passwort, record.as_ref().map(|r| r.password_hash.as_str()));

        let record = match record {
            Some(record) if passt && record.is_active => record,
            _ => {
                tracing::warn!(username = %username, "Fehlgeschlagener Login-Versuch");
                return Err(AuthError::NichtAutorisiert);
            }
        };

        let token = self.codec.ausstellen(&record.username)?;

        tracing::info!(
            user_id = %record.id,
            username = %record.username,
            "Principal angemeldet"
        );

        Ok(Ausweis {
            token,
            principal: Principal::from(record),
        })
    }

    /// Gibt den Principal hinter einem Token zurueck
    pub async fn wer_bin_ich(&self, token: &str) -> AuthResult<Principal> {
        self.resolver.aufloesen(token).await
    }

    /// Loest das Token auf und wendet die Zugriffsrichtlinie an
    pub async fn autorisieren(
        &self,
        token: &str,
        operation: Operation,
        ressource: Ressource,
    ) -> AuthResult<Zugriff> {
        let principal = self.resolver.aufloesen(token).await?;
        policy::autorisieren(principal, operation, ressource)
    }

    /// Token-Lebensdauer (fuer die Antwort an den Client)
    pub fn token_ttl(&self) -> chrono::Duration {
        self.codec.ttl()
    }
}

fn validieren(daten: &Registrierung) -> AuthResult<()> {
    if daten.username.trim().is_empty() {
        return Err(AuthError::ungueltige_eingabe("username darf nicht leer sein"));
    }
    if daten.email.trim().is_empty() {
        return Err(AuthError::ungueltige_eingabe("email darf nicht leer sein"));
    }
    if daten.password.is_empty() {
        return Err(AuthError::ungueltige_eingabe("password darf nicht leer sein"));
    }

    let hat_kennung = daten
        .student_id
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());
    match daten.role {
        Rolle::Student if !hat_kennung => Err(AuthError::ungueltige_eingabe(
            "student_id ist fuer Rolle student erforderlich",
        )),
        Rolle::Warden if daten.student_id.is_some() => Err(AuthError::ungueltige_eingabe(
            "student_id ist nur fuer Rolle student zulaessig",
        )),
        Rolle::Student | Rolle::Warden => Ok(()),
    }
}

fn konflikt_oder_db(e: DbError) -> AuthError {
    match e.eindeutigkeit_feld().and_then(KonfliktFeld::aus_spalte) {
        Some(feld) => AuthError::Konflikt(feld),
        None => AuthError::Datenbank(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::{Duration, Utc};
    use crate::password::VERIFIZIERUNGEN;
    use uuid::Uuid;
    use wohnheim_core::Sichtbereich;
    use wohnheim_db::{models::PrincipalRecord, DbResult};

    // Minimaler In-Memory-Credential-Store fuer Tests
    #[derive(Default)]
    struct TestPrincipalRepo {
        principals: Mutex<Vec<PrincipalRecord>>,
        /// Simuliert eine parallele Registrierung zwischen Pruefung und Insert
        eindeutigkeit_bei_insert: Mutex<Option<&'static str>>,
    }

    impl PrincipalRepository for TestPrincipalRepo {
        async fn create(&self, data: NeuerPrincipal<'_>) -> DbResult<PrincipalRecord> {
            if let Some(feld) = self.eindeutigkeit_bei_insert.lock().unwrap().take() {
                return Err(DbError::Eindeutigkeit { feld: feld.into() });
            }
            let record = PrincipalRecord {
                id: Uuid::new_v4(),
                username: data.username.to_string(),
                email: data.email.to_string(),
                role: data.role,
                full_name: data.full_name.map(str::to_string),
                phone: data.phone.map(str::to_string),
                student_id: data.student_id.map(str::to_string),
                student_record_id: None,
                password_hash: data.password_hash.to_string(),
                is_active: true,
                created_at: Utc::now(),
            };
            self.principals.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn get_by_username(&self, username: &str) -> DbResult<Option<PrincipalRecord>> {
            Ok(self
                .principals
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.username == username)
                .cloned())
        }

        async fn get_by_email(&self, email: &str) -> DbResult<Option<PrincipalRecord>> {
            Ok(self.principals.lock().unwrap().iter().find(|p| p.email == email).cloned())
        }

        async fn set_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool> {
            let mut principals = self.principals.lock().unwrap();
            match principals.iter_mut().find(|p| p.id == id) {
                Some(p) => {
                    p.is_active = aktiv;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn link_student_record(&self, id: Uuid, record_id: Option<Uuid>) -> DbResult<()> {
            let mut principals = self.principals.lock().unwrap();
            let p = principals
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| DbError::nicht_gefunden(id.to_string()))?;
            p.student_record_id = record_id;
            Ok(())
        }

        async fn list_by_student_id(&self, student_id: &str) -> DbResult<Vec<PrincipalRecord>> {
            Ok(self
                .principals
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.student_id.as_deref() == Some(student_id))
                .cloned()
                .collect())
        }
    }

    fn test_gateway() -> (AuthGateway<TestPrincipalRepo>, Arc<TestPrincipalRepo>) {
        let repo = Arc::new(TestPrincipalRepo::default());
        let codec = Arc::new(TokenCodec::neu(b"gateway-test", Duration::minutes(30)));
        (AuthGateway::neu(Arc::clone(&repo), codec), repo)
    }

    fn warden(username: &str, email: &str) -> Registrierung {
        Registrierung {
            username: username.into(),
            email: email.into(),
            password: "warden-passwort".into(),
            role: Rolle::Warden,
            full_name: Some("Heimleitung".into()),
            phone: None,
            student_id: None,
        }
    }

    fn student(username: &str, email: &str, sid: &str) -> Registrierung {
        Registrierung {
            username: username.into(),
            email: email.into(),
            password: "student-passwort".into(),
            role: Rolle::Student,
            full_name: None,
            phone: None,
            student_id: Some(sid.into()),
        }
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let (gateway, _) = test_gateway();

        let ausweis = gateway.registrieren(warden("w1", "w1@x.org")).await.unwrap();
        assert_eq!(ausweis.principal.username, "w1");
        assert_eq!(gateway.wer_bin_ich(&ausweis.token).await.unwrap().id, ausweis.principal.id);

        let login = gateway.anmelden("w1", "warden-passwort").await.unwrap();
        assert_eq!(login.principal.id, ausweis.principal.id);
    }

    #[tokio::test]
    async fn doppelter_benutzername_und_email() {
        let (gateway, _) = test_gateway();
        gateway.registrieren(warden("w1", "w1@x.org")).await.unwrap();

        let ergebnis = gateway.registrieren(warden("w1", "anders@x.org")).await;
        assert!(matches!(ergebnis, Err(AuthError::Konflikt(KonfliktFeld::Benutzername))));

        let ergebnis = gateway.registrieren(warden("w2", "w1@x.org")).await;
        assert!(matches!(ergebnis, Err(AuthError::Konflikt(KonfliktFeld::Email))));

        // Beides doppelt: Benutzername wird zuerst gemeldet
        let ergebnis = gateway.registrieren(warden("w1", "w1@x.org")).await;
        assert!(matches!(ergebnis, Err(AuthError::Konflikt(KonfliktFeld::Benutzername))));
    }

    #[tokio::test]
    async fn eindeutigkeit_beim_insert_wird_konflikt() {
        let (gateway, repo) = test_gateway();
        *repo.eindeutigkeit_bei_insert.lock().unwrap() = Some("email");

        let ergebnis = gateway.registrieren(warden("w1", "w1@x.org")).await;
        assert!(matches!(ergebnis, Err(AuthError::Konflikt(KonfliktFeld::Email))));
    }

    #[tokio::test]
    async fn anmeldefehler_sind_ununterscheidbar() {
        let (gateway, _) = test_gateway();
        gateway.registrieren(warden("w1", "w1@x.org")).await.unwrap();

        let falsch = gateway.anmelden("w1", "wrong").await.unwrap_err();
        let unbekannt = gateway.anmelden("niemand", "wrong").await.unwrap_err();
        assert!(matches!(falsch, AuthError::NichtAutorisiert));
        assert!(matches!(unbekannt, AuthError::NichtAutorisiert));
        assert_eq!(falsch.to_string(), unbekannt.to_string());
    }

    #[tokio::test]
    async fn unbekannter_benutzer_kostet_eine_verifikation() {
        let (gateway, _) = test_gateway();
        gateway.registrieren(warden("w1", "w1@x.org")).await.unwrap();

        for username in ["w1", "niemand"] {
            VERIFIZIERUNGEN.with(|z| z.set(0));
            assert!(gateway.anmelden(username, "wrong").await.is_err());
            assert_eq!(VERIFIZIERUNGEN.with(|z| z.get()), 1, "{username}");
        }
    }

    #[tokio::test]
    async fn inaktiver_principal_wird_abgewiesen() {
        let (gateway, repo) = test_gateway();
        let ausweis = gateway.registrieren(warden("w1", "w1@x.org")).await.unwrap();
        repo.set_active(ausweis.principal.id, false).await.unwrap();

        assert!(matches!(
            gateway.anmelden("w1", "warden-passwort").await,
            Err(AuthError::NichtAutorisiert)
        ));
        assert!(matches!(
            gateway.wer_bin_ich(&ausweis.token).await,
            Err(AuthError::NichtAutorisiert)
        ));
    }

    #[tokio::test]
    async fn gueltiges_token_fuer_unbekanntes_subject() {
        let (gateway, _) = test_gateway();
        let token = gateway.codec.ausstellen("geist").unwrap();
        assert!(matches!(gateway.wer_bin_ich(&token).await, Err(AuthError::NichtAutorisiert)));
    }

    #[tokio::test]
    async fn rollen_und_kennung_werden_validiert() {
        let (gateway, _) = test_gateway();

        let mut ohne_kennung = student("s1", "s1@x.org", "S1");
        ohne_kennung.student_id = Some("  ".into());
        assert!(matches!(
            gateway.registrieren(ohne_kennung).await,
            Err(AuthError::UngueltigeEingabe(_))
        ));

        let mut warden_mit_kennung = warden("w1", "w1@x.org");
        warden_mit_kennung.student_id = Some("S9".into());
        assert!(matches!(
            gateway.registrieren(warden_mit_kennung).await,
            Err(AuthError::UngueltigeEingabe(_))
        ));

        let mut leeres_passwort = warden("w2", "w2@x.org");
        leeres_passwort.password.clear();
        assert!(matches!(
            gateway.registrieren(leeres_passwort).await,
            Err(AuthError::UngueltigeEingabe(_))
        ));
    }

    #[tokio::test]
    async fn autorisieren_liefert_sichtbereich() {
        let (gateway, _) = test_gateway();
        let s = gateway.registrieren(student("s1", "s1@x.org", "S1")).await.unwrap();
        let w = gateway.registrieren(warden("w1", "w1@x.org")).await.unwrap();

        let zugriff = gateway
            .autorisieren(&s.token, Operation::Lesen, Ressource::Student)
            .await
            .unwrap();
        assert_eq!(zugriff.sichtbereich, Sichtbereich::Eigentuemer("S1".into()));

        let zugriff = gateway
            .autorisieren(&w.token, Operation::Lesen, Ressource::Student)
            .await
            .unwrap();
        assert_eq!(zugriff.sichtbereich, Sichtbereich::Global);

        assert!(matches!(
            gateway.autorisieren(&s.token, Operation::Erstellen, Ressource::Zimmer).await,
            Err(AuthError::Verboten)
        ));
        assert!(matches!(
            gateway.autorisieren("kaputt", Operation::Lesen, Ressource::Zimmer).await,
            Err(AuthError::NichtAutorisiert)
        ));
    }
}
