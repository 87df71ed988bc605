//! wohnheim-core – Gemeinsame Typen und Fehlertypen
//!
//! Dieses Crate stellt die fundamentalen Bausteine bereit, die von allen
//! anderen Wohnheim-Crates gemeinsam genutzt werden: Rollen und der
//! Sichtbereich (Scope-Filter), den die Zugriffsrichtlinie erzeugt und die
//! Repositories anwenden.

pub mod error;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, WohnheimError};
pub use types::{Rolle, Sichtbereich};
