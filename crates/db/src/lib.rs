//! wohnheim-db – Persistenzschicht
//!
//! Dieses Crate stellt das Repository-Pattern bereit. Die Traits in
//! [`repository`] beschreiben den Credential-Store und die Ressourcen-
//! Sammlungen; [`SqliteDb`] implementiert sie alle auf einem gemeinsamen Pool.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{
    BesucherRepository, BewegungRepository, DatabaseConfig, DbResult, GebuehrRepository,
    PrincipalRepository, StudentRepository, WartungsRepository, ZimmerRepository,
};
pub use sqlite::SqliteDb;
