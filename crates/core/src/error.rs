//! Fehlertypen fuer Wohnheim
//!
//! Gemeinsame Fehler fuer Typ-Konvertierungen. Die fachlichen Crates
//! definieren eigene Fehler und konvertieren via `#[from]`.

use thiserror::Error;

/// Globaler Result-Alias fuer Wohnheim
pub type Result<T> = std::result::Result<T, WohnheimError>;

/// Fehler beim Umgang mit den gemeinsamen Typen
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WohnheimError {
    #[error("Unbekannte Rolle: {0}")]
    UnbekannteRolle(String),

    #[error("Ungueltiger Wert fuer {feld}: {wert}")]
    UngueltigerWert { feld: &'static str, wert: String },
}

impl WohnheimError {
    /// Erstellt einen Fehler fuer einen nicht parsebaren Enum-Wert
    pub fn ungueltiger_wert(feld: &'static str, wert: impl Into<String>) -> Self {
        Self::UngueltigerWert {
            feld,
            wert: wert.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = WohnheimError::UnbekannteRolle("admin".into());
        assert_eq!(e.to_string(), "Unbekannte Rolle: admin");

        let e = WohnheimError::ungueltiger_wert("status", "weg");
        assert_eq!(e.to_string(), "Ungueltiger Wert fuer status: weg");
    }
}
