//! SQLite-Pool: Oeffnen, Migrieren, Ping, Schliessen

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use crate::error::DbError;
use crate::repository::DatabaseConfig;

/// Wartezeit auf eine gesperrte Datenbank, bevor SQLITE_BUSY gemeldet wird
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle auf den Connection-Pool
///
/// Wird beim Prozessstart geoeffnet, als expliziter Handle an Gateway und
/// Handler weitergereicht und beim Shutdown mit [`SqliteDb::schliessen`] beendet.
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pub(crate) pool: SqlitePool,
}

fn verbindungsoptionen(config: &DatabaseConfig) -> Result<SqliteConnectOptions, DbError> {
    let basis = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    Ok(if config.sqlite_wal {
        basis
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
    } else {
        basis.journal_mode(SqliteJournalMode::Delete)
    })
}

impl SqliteDb {
    /// Oeffnet den Pool und bringt das Schema auf den aktuellen Stand
    pub async fn oeffnen(config: &DatabaseConfig) -> Result<Self, DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_verbindungen)
            .connect_with(verbindungsoptionen(config)?)
            .await?;
        info!(url = %config.url, wal = config.sqlite_wal, "SQLite-Pool geoeffnet");

        let db = Self { pool };
        db.migrationen_ausfuehren().await?;
        Ok(db)
    }

    /// In-Memory-Datenbank fuer Tests
    ///
    /// Jede Verbindung auf `:memory:` saehe eine eigene leere Datenbank,
    /// deshalb genau eine Verbindung, die nie abgebaut wird.
    pub async fn in_memory() -> Result<Self, DbError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        let db = Self { pool };
        db.migrationen_ausfuehren().await?;
        Ok(db)
    }

    pub async fn migrationen_ausfuehren(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Datenbank-Migrationen abgeschlossen");
        Ok(())
    }

    /// `SELECT 1` gegen den Pool, fuer den Health-Check
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Schliesst den Pool und wartet auf offene Verbindungen
    pub async fn schliessen(&self) {
        self.pool.close().await;
        info!("SQLite-Pool geschlossen");
    }
}
