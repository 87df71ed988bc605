//! Zugriffsrichtlinie
//!
//! Die Entscheidung ist eine reine Funktion von (Rolle, Operation, Ressource).
//! Die Tabelle in [`entscheiden`] ist vollstaendig ausgeschrieben: eine neue
//! Rolle, Operation oder Ressource ist erst nutzbar, wenn sie hier eingetragen ist.

use wohnheim_core::{Rolle, Sichtbereich};

use crate::error::{AuthError, AuthResult};
use crate::principal::Principal;

/// Art der angefragten Operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Lesen,
    Erstellen,
    Aktualisieren,
    Loeschen,
}

/// Art der betroffenen Ressource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ressource {
    Student,
    Zimmer,
    Besucher,
    Wartung,
    Gebuehr,
    Bewegung,
    Dashboard,
}

/// Ergebnis der Richtlinie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regel {
    /// Erlaubt, ohne Datenfilter
    Global,
    /// Erlaubt, gefiltert auf die eigene Studenten-Kennung
    Eigentuemer,
    Verboten,
}

/// Ergebnis einer erfolgreichen Autorisierung
#[derive(Debug, Clone)]
pub struct Zugriff {
    pub principal: Principal,
    pub sichtbereich: Sichtbereich,
}

/// Entscheidungstabelle
pub fn entscheiden(rolle: Rolle, operation: Operation, ressource: Ressource) -> Regel {
    use Operation::*;
    use Ressource::*;

    match (rolle, operation, ressource) {
        // Heimleitung: alles global, Dashboard nur lesend
        (Rolle::Warden, _, Student | Zimmer | Besucher | Wartung | Gebuehr | Bewegung) => Regel::Global,
        (Rolle::Warden, Lesen, Dashboard) => Regel::Global,
        (Rolle::Warden, Erstellen | Aktualisieren | Loeschen, Dashboard) => Regel::Verboten,

        // Studenten: Zimmer ungefiltert lesbar, Wartung darf jeder melden
        (Rolle::Student, Lesen, Zimmer) => Regel::Global,
        (Rolle::Student, Lesen, Student | Besucher | Wartung | Gebuehr | Bewegung | Dashboard) => {
            Regel::Eigentuemer
        }
        (Rolle::Student, Erstellen, Wartung) => Regel::Global,
        (Rolle::Student, Erstellen, Student | Zimmer | Besucher | Gebuehr | Bewegung | Dashboard) => {
            Regel::Verboten
        }
        (Rolle::Student, Aktualisieren | Loeschen, _) => Regel::Verboten,
    }
}

/// Wendet die Tabelle auf einen Principal an und erzeugt den Sichtbereich
pub fn autorisieren(
    principal: Principal,
    operation: Operation,
    ressource: Ressource,
) -> AuthResult<Zugriff> {
    let sichtbereich = match entscheiden(principal.role, operation, ressource) {
        Regel::Global => Sichtbereich::Global,
        Regel::Eigentuemer => match principal.student_id.as_deref() {
            Some(sid) if !sid.is_empty() => Sichtbereich::Eigentuemer(sid.to_string()),
            // Ohne Kennung gibt es nichts Eigenes zu sehen
            _ => return Err(AuthError::Verboten),
        },
        Regel::Verboten => {
            tracing::debug!(
                username = %principal.username,
                role = %principal.role,
                ?operation,
                ?ressource,
                "Zugriff verweigert"
            );
            return Err(AuthError::Verboten);
        }
    };

    Ok(Zugriff { principal, sichtbereich })
}
