//! Fehlertypen fuer das Datenbank-Crate

use thiserror::Error;

/// Datenbank-Fehlertypen
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Datensatz nicht gefunden: {0}")]
    NichtGefunden(String),

    /// Verletzung eines UNIQUE-Index; `feld` ist die betroffene Spalte
    #[error("Eindeutigkeitsverletzung: {feld}")]
    Eindeutigkeit { feld: String },

    #[error("Ungueltige Daten: {0}")]
    UngueltigeDaten(String),

    #[error("Zimmer ist voll belegt")]
    ZimmerVoll,

    #[error("SQLx-Fehler: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration-Fehler: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Interner DB-Fehler: {0}")]
    Intern(String),
}

impl DbError {
    pub fn nicht_gefunden(msg: impl Into<String>) -> Self {
        Self::NichtGefunden(msg.into())
    }

    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Betroffene Spalte bei einer Eindeutigkeitsverletzung
    pub fn eindeutigkeit_feld(&self) -> Option<&str> {
        match self {
            Self::Eindeutigkeit { feld } => Some(feld),
            _ => None,
        }
    }

    /// Wandelt einen SQLx-Fehler um und erkennt dabei UNIQUE-Verletzungen
    ///
    /// SQLite meldet diese als `UNIQUE constraint failed: <tabelle>.<spalte>`.
    pub(crate) fn aus_sqlx(e: sqlx::Error) -> Self {
        let spalte = match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err
                .message()
                .rsplit(['.', ' '])
                .next()
                .map(str::to_string),
            _ => None,
        };
        match spalte {
            Some(feld) => Self::Eindeutigkeit { feld },
            None => Self::Sqlx(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eindeutigkeit_feld_auslesen() {
        let e = DbError::Eindeutigkeit { feld: "email".into() };
        assert_eq!(e.eindeutigkeit_feld(), Some("email"));
        assert_eq!(e.to_string(), "Eindeutigkeitsverletzung: email");

        let e = DbError::nicht_gefunden("Student");
        assert_eq!(e.eindeutigkeit_feld(), None);
    }
}
