//! wohnheim-auth – Authentifizierung und Zugriffsrichtlinie
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Signierte Bearer-Token (JWT, HS256) mit fester Lebensdauer
//! - PrincipalResolver (Token → aktiver Principal)
//! - Zugriffsrichtlinie (Rolle × Operation × Ressource → Sichtbereich)
//! - AuthGateway (Registrierung, Login, whoAmI, Autorisierung)

pub mod error;
pub mod gateway;
pub mod password;
pub mod policy;
pub mod principal;
pub mod resolver;
pub mod token;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult, KonfliktFeld};
pub use gateway::{AuthGateway, Ausweis, Registrierung};
pub use password::{passwort_hashen, passwort_pruefen, passwort_verifizieren};
pub use policy::{Operation, Regel, Ressource, Zugriff};
pub use principal::Principal;
pub use resolver::PrincipalResolver;
pub use token::{TokenCodec, STANDARD_TTL_MINUTEN};
