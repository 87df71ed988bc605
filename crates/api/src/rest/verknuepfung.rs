//! Verknuepfung Principal ↔ Studenten-Datensatz
//!
//! Ein Principal mit Rolle Student traegt die fachliche Kennung `student_id`.
//! Passt genau ein Studenten-Datensatz dazu, wird dessen ID am Principal
//! hinterlegt. Kein oder mehrere Treffer lassen die Verknuepfung leer; das
//! wird protokolliert, aber nicht aufgeloest.

use uuid::Uuid;
use wohnheim_db::{DbResult, PrincipalRepository, SqliteDb, StudentRepository};

/// Ergebnis eines Verknuepfungsversuchs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verknuepfung {
    Eindeutig(Uuid),
    KeinTreffer,
    Mehrdeutig(usize),
}

impl Verknuepfung {
    pub fn record_id(&self) -> Option<Uuid> {
        match self {
            Self::Eindeutig(id) => Some(*id),
            Self::KeinTreffer | Self::Mehrdeutig(_) => None,
        }
    }
}

/// Ermittelt den passenden Studenten-Datensatz fuer eine Kennung
pub async fn aufloesen(db: &SqliteDb, student_id: &str) -> DbResult<Verknuepfung> {
    let treffer = StudentRepository::find_by_student_id(db, student_id).await?;
    Ok(match treffer.as_slice() {
        [] => Verknuepfung::KeinTreffer,
        [einziger] => Verknuepfung::Eindeutig(einziger.id),
        mehrere => Verknuepfung::Mehrdeutig(mehrere.len()),
    })
}

/// Verknuepft einen einzelnen Principal (nach der Registrierung)
pub async fn principal_verknuepfen(
    db: &SqliteDb,
    principal_id: Uuid,
    student_id: &str,
) -> DbResult<Option<Uuid>> {
    let ergebnis = aufloesen(db, student_id).await?;
    protokollieren(student_id, ergebnis);

    if let Some(record_id) = ergebnis.record_id() {
        PrincipalRepository::link_student_record(db, principal_id, Some(record_id)).await?;
    }
    Ok(ergebnis.record_id())
}

/// Aktualisiert alle Principals mit der Kennung (nach Anlage eines Datensatzes)
///
/// Wird die Kennung durch den neuen Datensatz mehrdeutig, verlieren
/// bestehende Verknuepfungen ihre Gueltigkeit und werden geloest.
pub async fn kennung_neu_verknuepfen(db: &SqliteDb, student_id: &str) -> DbResult<Verknuepfung> {
    let principals = PrincipalRepository::list_by_student_id(db, student_id).await?;
    if principals.is_empty() {
        return Ok(Verknuepfung::KeinTreffer);
    }

    let ergebnis = aufloesen(db, student_id).await?;
    protokollieren(student_id, ergebnis);

    for principal in principals {
        if principal.student_record_id != ergebnis.record_id() {
            PrincipalRepository::link_student_record(db, principal.id, ergebnis.record_id()).await?;
        }
    }
    Ok(ergebnis)
}

fn protokollieren(student_id: &str, ergebnis: Verknuepfung) {
    match ergebnis {
        Verknuepfung::Eindeutig(record_id) => {
            tracing::info!(student_id = %student_id, record_id = %record_id, "Principal verknuepft")
        }
        Verknuepfung::KeinTreffer => {
            tracing::warn!(student_id = %student_id, "Kein Studenten-Datensatz zur Kennung")
        }
        Verknuepfung::Mehrdeutig(anzahl) => tracing::warn!(
            student_id = %student_id,
            anzahl,
            "Kennung passt auf mehrere Studenten-Datensaetze, Verknuepfung bleibt leer"
        ),
    }
}
