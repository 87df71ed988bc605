//! Datenbankmodelle fuer Wohnheim
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind von den Domain-Typen getrennt und dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wohnheim_core::{Rolle, WohnheimError};

/// Erzeugt `als_str` und `FromStr` fuer ein Status-Enum mit festen Textwerten
macro_rules! text_enum {
    ($typ:ident, $feld:literal, { $($variante:ident => $text:literal),+ $(,)? }) => {
        impl $typ {
            pub fn als_str(&self) -> &'static str {
                match self {
                    $(Self::$variante => $text,)+
                }
            }
        }

        impl std::str::FromStr for $typ {
            type Err = WohnheimError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variante),)+
                    other => Err(WohnheimError::ungueltiger_wert($feld, other)),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Principals (Zugangsdaten)
// ---------------------------------------------------------------------------

/// Principal-Datensatz aus der Datenbank
///
/// Enthaelt den Passwort-Hash – darf nie direkt nach aussen serialisiert werden.
#[derive(Debug, Clone)]
pub struct PrincipalRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Rolle,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    /// Fachliche Studenten-Kennung, nur bei Rolle Student gesetzt
    pub student_id: Option<String>,
    /// Verknuepfter Studenten-Datensatz (bei eindeutiger Zuordnung)
    pub student_record_id: Option<Uuid>,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Principals
#[derive(Debug, Clone)]
pub struct NeuerPrincipal<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub role: Rolle,
    pub full_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub student_id: Option<&'a str>,
    pub password_hash: &'a str,
}

// ---------------------------------------------------------------------------
// Studenten
// ---------------------------------------------------------------------------

/// Anwesenheitsstatus eines Studenten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    #[default]
    In,
    Out,
}

text_enum!(StudentStatus, "student_status", { In => "in", Out => "out" });

/// Studenten-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub student_id: String,
    pub room_number: Option<String>,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Studenten
#[derive(Debug, Clone)]
pub struct NeuerStudent<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub student_id: &'a str,
}

/// Daten zum Aktualisieren eines Studenten
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub room_number: Option<String>,
    pub status: Option<StudentStatus>,
}

impl StudentUpdate {
    pub fn ist_leer(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.room_number.is_none()
            && self.status.is_none()
    }
}

// ---------------------------------------------------------------------------
// Zimmer
// ---------------------------------------------------------------------------

/// Belegungsstatus eines Zimmers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZimmerStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

text_enum!(ZimmerStatus, "room_status", {
    Available => "available",
    Occupied => "occupied",
    Maintenance => "maintenance",
});

/// Zimmer-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZimmerRecord {
    pub id: Uuid,
    pub room_number: String,
    pub floor: i64,
    pub capacity: i64,
    pub occupied: i64,
    pub status: ZimmerStatus,
    pub created_at: DateTime<Utc>,
}

impl ZimmerRecord {
    pub fn ist_voll(&self) -> bool {
        self.occupied >= self.capacity
    }
}

/// Daten zum Erstellen eines neuen Zimmers
#[derive(Debug, Clone)]
pub struct NeuesZimmer<'a> {
    pub room_number: &'a str,
    pub floor: i64,
    pub capacity: i64,
}

// ---------------------------------------------------------------------------
// Besucher
// ---------------------------------------------------------------------------

/// Status eines Besuchs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BesucherStatus {
    #[default]
    CheckedIn,
    CheckedOut,
}

text_enum!(BesucherStatus, "visitor_status", {
    CheckedIn => "checked_in",
    CheckedOut => "checked_out",
});

/// Besucher-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BesucherRecord {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    /// Fachliche Kennung des besuchten Studenten (Besitzer-Schluessel)
    pub visiting_student_id: String,
    pub visiting_student_name: String,
    pub purpose: String,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: BesucherStatus,
}

/// Daten zum Erfassen eines neuen Besuchers
#[derive(Debug, Clone)]
pub struct NeuerBesucher<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub visiting_student_id: &'a str,
    pub visiting_student_name: &'a str,
    pub purpose: &'a str,
}

// ---------------------------------------------------------------------------
// Wartungsanfragen
// ---------------------------------------------------------------------------

/// Bearbeitungsstatus einer Wartungsanfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WartungsStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

text_enum!(WartungsStatus, "request_status", {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});

/// Wartungsanfrage aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WartungsRecord {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub room_number: String,
    pub issue_type: String,
    pub description: String,
    pub status: WartungsStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daten zum Erstellen einer Wartungsanfrage
#[derive(Debug, Clone)]
pub struct NeueWartung<'a> {
    pub student_id: &'a str,
    pub student_name: &'a str,
    pub room_number: &'a str,
    pub issue_type: &'a str,
    pub description: &'a str,
}

// ---------------------------------------------------------------------------
// Gebuehren
// ---------------------------------------------------------------------------

/// Zahlungsstatus einer Gebuehr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GebuehrStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

text_enum!(GebuehrStatus, "fee_status", {
    Paid => "paid",
    Pending => "pending",
    Overdue => "overdue",
});

/// Gebuehren-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GebuehrRecord {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub fee_type: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
    pub status: GebuehrStatus,
    pub paid_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GebuehrRecord {
    /// Ueberfaellig = Faelligkeit vor `jetzt` und nicht bezahlt
    pub fn ist_ueberfaellig(&self, jetzt: DateTime<Utc>) -> bool {
        self.due_date < jetzt && self.status != GebuehrStatus::Paid
    }
}

/// Daten zum Erstellen einer Gebuehr
#[derive(Debug, Clone)]
pub struct NeueGebuehr<'a> {
    pub student_id: &'a str,
    pub student_name: &'a str,
    pub fee_type: &'a str,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Bewegungen (Ein-/Auschecken)
// ---------------------------------------------------------------------------

/// Art einer Bewegung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BewegungsAktion {
    CheckIn,
    CheckOut,
}

text_enum!(BewegungsAktion, "action", {
    CheckIn => "check_in",
    CheckOut => "check_out",
});

impl BewegungsAktion {
    /// Status, den der Student nach dieser Bewegung hat
    pub fn folgestatus(&self) -> StudentStatus {
        match self {
            Self::CheckIn => StudentStatus::In,
            Self::CheckOut => StudentStatus::Out,
        }
    }
}

/// Bewegungs-Eintrag aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BewegungRecord {
    pub id: Uuid,
    pub student_id: String,
    pub student_name: String,
    pub action: BewegungsAktion,
    pub timestamp: DateTime<Utc>,
    pub note: Option<String>,
}

/// Daten zum Protokollieren einer Bewegung
#[derive(Debug, Clone)]
pub struct NeueBewegung<'a> {
    pub student_id: &'a str,
    pub student_name: &'a str,
    pub action: BewegungsAktion,
    pub note: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Kennzahlen fuer das Dashboard
///
/// Fuer Wardens globale Zaehlungen, fuer Studenten eine auf den eigenen
/// Datensatz bezogene Zusammenfassung mit identischer Struktur.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub students_in: i64,
    pub students_out: i64,
    pub total_rooms: i64,
    pub occupied_rooms: i64,
    pub available_rooms: i64,
    pub maintenance_rooms: i64,
    pub pending_maintenance: i64,
    pub overdue_fees: i64,
    pub active_visitors: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_texte_parsen() {
        assert_eq!("in_progress".parse::<WartungsStatus>().unwrap(), WartungsStatus::InProgress);
        assert_eq!(BesucherStatus::CheckedOut.als_str(), "checked_out");
        assert!("unterwegs".parse::<StudentStatus>().is_err());
    }

    #[test]
    fn serde_stimmt_mit_als_str_ueberein() {
        let json = serde_json::to_string(&WartungsStatus::InProgress).unwrap();
        assert_eq!(json, format!("\"{}\"", WartungsStatus::InProgress.als_str()));
        let json = serde_json::to_string(&BewegungsAktion::CheckOut).unwrap();
        assert_eq!(json, "\"check_out\"");
    }

    #[test]
    fn gebuehr_ueberfaellig() {
        let jetzt = Utc::now();
        let gebuehr = GebuehrRecord {
            id: Uuid::new_v4(),
            student_id: "S1".into(),
            student_name: "Priya".into(),
            fee_type: "Miete".into(),
            amount: 100.0,
            due_date: jetzt - chrono::Duration::days(1),
            status: GebuehrStatus::Pending,
            paid_date: None,
            created_at: jetzt,
        };
        assert!(gebuehr.ist_ueberfaellig(jetzt));

        let bezahlt = GebuehrRecord { status: GebuehrStatus::Paid, ..gebuehr.clone() };
        assert!(!bezahlt.ist_ueberfaellig(jetzt));

        let zukunft = GebuehrRecord { due_date: jetzt + chrono::Duration::days(1), ..gebuehr };
        assert!(!zukunft.ist_ueberfaellig(jetzt));
    }

    #[test]
    fn bewegung_folgestatus() {
        assert_eq!(BewegungsAktion::CheckIn.folgestatus(), StudentStatus::In);
        assert_eq!(BewegungsAktion::CheckOut.folgestatus(), StudentStatus::Out);
    }
}
