//! Gemeinsame Typen fuer Wohnheim
//!
//! `Rolle` ist die geschlossene Menge der Principal-Rollen, `Sichtbereich`
//! der Datenfilter, mit dem ein Repository eine Abfrage einschraenkt.

use serde::{Deserialize, Serialize};

use crate::error::WohnheimError;

/// Rolle eines Principals – bei der Registrierung festgelegt, danach unveraenderlich
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rolle {
    /// Bewohner, sieht nur eigene Datensaetze
    Student,
    /// Heimleitung, sieht und verwaltet alles
    Warden,
}

impl Rolle {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Warden => "warden",
        }
    }
}

impl std::fmt::Display for Rolle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.als_str())
    }
}

impl std::str::FromStr for Rolle {
    type Err = WohnheimError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "warden" => Ok(Self::Warden),
            other => Err(WohnheimError::UnbekannteRolle(other.to_string())),
        }
    }
}

/// Sichtbereich einer Leseoperation
///
/// `Global` liefert alle Zeilen, `Eigentuemer` nur Zeilen deren
/// Besitzer-Schluessel (die fachliche Studenten-Kennung) passt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sichtbereich {
    Global,
    Eigentuemer(String),
}

impl Sichtbereich {
    /// Gibt die Studenten-Kennung zurueck, auf die gefiltert wird
    pub fn eigentuemer(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Eigentuemer(student_id) => Some(student_id),
        }
    }

    /// Prueft ob eine Zeile mit dem gegebenen Besitzer sichtbar ist
    pub fn erlaubt(&self, besitzer: &str) -> bool {
        match self {
            Self::Global => true,
            Self::Eigentuemer(student_id) => student_id == besitzer,
        }
    }

    pub fn ist_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolle_parsen_und_anzeigen() {
        assert_eq!("student".parse::<Rolle>().unwrap(), Rolle::Student);
        assert_eq!("warden".parse::<Rolle>().unwrap(), Rolle::Warden);
        assert_eq!(Rolle::Warden.to_string(), "warden");
        assert!("Warden".parse::<Rolle>().is_err());
    }

    #[test]
    fn rolle_serde_kleingeschrieben() {
        assert_eq!(serde_json::to_string(&Rolle::Student).unwrap(), "\"student\"");
        let rolle: Rolle = serde_json::from_str("\"warden\"").unwrap();
        assert_eq!(rolle, Rolle::Warden);
    }

    #[test]
    fn sichtbereich_filter() {
        let global = Sichtbereich::Global;
        assert!(global.erlaubt("S1"));
        assert!(global.erlaubt("S2"));
        assert_eq!(global.eigentuemer(), None);

        let eigen = Sichtbereich::Eigentuemer("S1".into());
        assert!(eigen.erlaubt("S1"));
        assert!(!eigen.erlaubt("S2"));
        assert!(!eigen.erlaubt("s1"));
        assert_eq!(eigen.eigentuemer(), Some("S1"));
        assert!(!eigen.ist_global());
    }
}
