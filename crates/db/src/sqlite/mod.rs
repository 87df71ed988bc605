//! SQLite-Backend-Implementierungen fuer alle Repository-Traits

pub mod fees;
pub mod maintenance;
pub mod movements;
pub mod pool;
pub mod principals;
pub mod rooms;
pub mod students;
mod util;
pub mod visitors;

pub use pool::SqliteDb;
