//! wohnheim-api – REST-Schnittstelle fuer Wohnheim
//!
//! Alle Routen liegen unter `/api`. Jeder Ressourcen-Handler holt sich vom
//! [`wohnheim_auth::AuthGateway`] einen Zugriff (Principal + Sichtbereich)
//! und reicht den Sichtbereich an das Repository weiter.

pub mod error;
pub mod rest;

pub use error::{ApiError, ApiResult};
pub use rest::{AppState, RestServer, RestServerKonfig};
