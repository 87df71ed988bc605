//! Gemeinsame Konvertierungen zwischen SQLite-Zeilen und Modelltypen

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row as _;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::DbResult;

/// Einheitliches Textformat fuer Zeitstempel
///
/// Feste Mikrosekunden-Genauigkeit und `Z`-Suffix, damit Textvergleiche
/// in SQL (`due_date < ?`, `ORDER BY timestamp`) chronologisch sind.
pub(crate) fn zeit_text(zeit: DateTime<Utc>) -> String {
    zeit.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_uuid(row: &sqlx::sqlite::SqliteRow, spalte: &str) -> DbResult<Uuid> {
    let text: String = row.try_get(spalte)?;
    Uuid::parse_str(&text)
        .map_err(|e| DbError::intern(format!("Ungueltige UUID in '{spalte}' ('{text}'): {e}")))
}

pub(crate) fn parse_opt_uuid(row: &sqlx::sqlite::SqliteRow, spalte: &str) -> DbResult<Option<Uuid>> {
    let text: Option<String> = row.try_get(spalte)?;
    text.as_deref()
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|e| DbError::intern(format!("Ungueltige UUID in '{spalte}' ('{s}'): {e}")))
        })
        .transpose()
}

pub(crate) fn parse_datetime(row: &sqlx::sqlite::SqliteRow, spalte: &str) -> DbResult<DateTime<Utc>> {
    let text: String = row.try_get(spalte)?;
    zeit_parsen(spalte, &text)
}

pub(crate) fn parse_opt_datetime(
    row: &sqlx::sqlite::SqliteRow,
    spalte: &str,
) -> DbResult<Option<DateTime<Utc>>> {
    let text: Option<String> = row.try_get(spalte)?;
    text.as_deref().map(|s| zeit_parsen(spalte, s)).transpose()
}

/// Liest eine Textspalte und parst sie in ein Status-Enum
pub(crate) fn parse_text<T>(row: &sqlx::sqlite::SqliteRow, spalte: &str) -> DbResult<T>
where
    T: std::str::FromStr<Err = wohnheim_core::WohnheimError>,
{
    let text: String = row.try_get(spalte)?;
    text.parse()
        .map_err(|e: wohnheim_core::WohnheimError| DbError::UngueltigeDaten(e.to_string()))
}

fn zeit_parsen(spalte: &str, text: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::intern(format!("Ungueltiger Zeitstempel in '{spalte}' ('{text}'): {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn zeit_text_ist_lexikografisch_sortierbar() {
        let frueh = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let spaet = frueh + chrono::Duration::microseconds(1500);
        let a = zeit_text(frueh);
        let b = zeit_text(spaet);
        assert_eq!(a, "2024-03-01T08:00:00.000000Z");
        assert!(a < b);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn zeit_text_parsebar() {
        let jetzt = Utc::now();
        let geparst = zeit_parsen("t", &zeit_text(jetzt)).unwrap();
        assert_eq!(geparst.timestamp_micros(), jetzt.timestamp_micros());
    }
}
