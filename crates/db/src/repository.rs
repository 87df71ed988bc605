//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Geschaeftslogik von der konkreten
//! Datenbank-Implementierung. Leseoperationen auf eigentuemerbezogenen
//! Sammlungen nehmen einen [`Sichtbereich`] entgegen und wenden ihn selbst an.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use wohnheim_core::Sichtbereich;

use crate::error::DbError;
use crate::models::{
    BesucherRecord, BewegungRecord, GebuehrRecord, NeueBewegung, NeueGebuehr, NeueWartung,
    NeuerBesucher, NeuerPrincipal, NeuerStudent, NeuesZimmer, PrincipalRecord, StudentRecord,
    StudentStatus, StudentUpdate, WartungsRecord, WartungsStatus, ZimmerRecord, ZimmerStatus,
};

/// Result-Alias fuer Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://wohnheim.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://wohnheim.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Credential-Store: ein Datensatz pro Principal
///
/// `username` und `email` sind per UNIQUE-Index abgesichert; `create`
/// meldet eine Verletzung als [`DbError::Eindeutigkeit`] mit dem Spaltennamen.
#[allow(async_fn_in_trait)]
pub trait PrincipalRepository: Send + Sync {
    async fn create(&self, data: NeuerPrincipal<'_>) -> DbResult<PrincipalRecord>;
    async fn get_by_username(&self, username: &str) -> DbResult<Option<PrincipalRecord>>;
    async fn get_by_email(&self, email: &str) -> DbResult<Option<PrincipalRecord>>;
    async fn set_active(&self, id: Uuid, aktiv: bool) -> DbResult<bool>;
    /// Verknuepft einen Principal mit einem Studenten-Datensatz (oder loest die Verknuepfung)
    async fn link_student_record(&self, id: Uuid, record_id: Option<Uuid>) -> DbResult<()>;
    /// Alle Principals mit der gegebenen fachlichen Studenten-Kennung
    async fn list_by_student_id(&self, student_id: &str) -> DbResult<Vec<PrincipalRecord>>;
}

/// Repository fuer Studenten-Datensaetze
#[allow(async_fn_in_trait)]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, data: NeuerStudent<'_>) -> DbResult<StudentRecord>;
    async fn get(&self, id: Uuid, sicht: &Sichtbereich) -> DbResult<Option<StudentRecord>>;
    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<StudentRecord>>;
    /// Alle Datensaetze mit der fachlichen Kennung (0, 1 oder mehrere)
    async fn find_by_student_id(&self, student_id: &str) -> DbResult<Vec<StudentRecord>>;
    async fn update(&self, id: Uuid, data: StudentUpdate) -> DbResult<StudentRecord>;
    async fn delete(&self, id: Uuid) -> DbResult<bool>;
    async fn count(&self, status: Option<StudentStatus>) -> DbResult<i64>;
}

/// Repository fuer Zimmer
#[allow(async_fn_in_trait)]
pub trait ZimmerRepository: Send + Sync {
    async fn create(&self, data: NeuesZimmer<'_>) -> DbResult<ZimmerRecord>;
    async fn get_by_number(&self, room_number: &str) -> DbResult<Option<ZimmerRecord>>;
    async fn list(&self) -> DbResult<Vec<ZimmerRecord>>;
    /// Zimmer mit Status `available` und freiem Platz
    async fn list_available(&self) -> DbResult<Vec<ZimmerRecord>>;
    /// Weist einem Studenten ein Zimmer zu (atomar: Belegung + Zimmernummer)
    async fn allocate(&self, room_id: Uuid, student_record_id: Uuid) -> DbResult<ZimmerRecord>;
    async fn count(&self, status: Option<ZimmerStatus>) -> DbResult<i64>;
}

/// Repository fuer Besucher
#[allow(async_fn_in_trait)]
pub trait BesucherRepository: Send + Sync {
    async fn create(&self, data: NeuerBesucher<'_>) -> DbResult<BesucherRecord>;
    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<BesucherRecord>>;
    async fn list_active(&self, sicht: &Sichtbereich) -> DbResult<Vec<BesucherRecord>>;
    async fn check_out(&self, id: Uuid) -> DbResult<bool>;
    async fn count_active(&self, sicht: &Sichtbereich) -> DbResult<i64>;
}

/// Repository fuer Wartungsanfragen
#[allow(async_fn_in_trait)]
pub trait WartungsRepository: Send + Sync {
    async fn create(&self, data: NeueWartung<'_>) -> DbResult<WartungsRecord>;
    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<WartungsRecord>>;
    async fn update_status(&self, id: Uuid, status: WartungsStatus) -> DbResult<bool>;
    async fn count(&self, sicht: &Sichtbereich, status: WartungsStatus) -> DbResult<i64>;
}

/// Repository fuer Gebuehren
#[allow(async_fn_in_trait)]
pub trait GebuehrRepository: Send + Sync {
    async fn create(&self, data: NeueGebuehr<'_>) -> DbResult<GebuehrRecord>;
    async fn list(&self, sicht: &Sichtbereich) -> DbResult<Vec<GebuehrRecord>>;
    /// Faellig vor `stichtag` und nicht bezahlt
    async fn list_overdue(
        &self,
        sicht: &Sichtbereich,
        stichtag: DateTime<Utc>,
    ) -> DbResult<Vec<GebuehrRecord>>;
    async fn pay(&self, id: Uuid) -> DbResult<bool>;
    async fn count_overdue(&self, sicht: &Sichtbereich, stichtag: DateTime<Utc>) -> DbResult<i64>;
}

/// Repository fuer Bewegungen (Ein-/Auschecken)
#[allow(async_fn_in_trait)]
pub trait BewegungRepository: Send + Sync {
    /// Protokolliert eine Bewegung und setzt Status/last_seen des Studenten
    async fn create(&self, data: NeueBewegung<'_>) -> DbResult<BewegungRecord>;
    /// Neueste zuerst, optional begrenzt
    async fn list(&self, sicht: &Sichtbereich, limit: Option<i64>) -> DbResult<Vec<BewegungRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_config_standard() {
        let cfg = DatabaseConfig::default();
        assert!(cfg.sqlite_wal);
        assert_eq!(cfg.max_verbindungen, 5);
        assert!(cfg.url.starts_with("sqlite://"));
    }
}
