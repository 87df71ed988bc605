//! wohnheim-server – Bibliotheks-Root
//!
//! Baut aus der Konfiguration Datenbank, Auth-Gateway und REST-Server
//! zusammen und steuert den Shutdown.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use config::ServerConfig;
use wohnheim_api::{AppState, RestServer, RestServerKonfig};
use wohnheim_auth::{AuthGateway, TokenCodec};
use wohnheim_db::SqliteDb;
use wohnheim_observability::{HealthState, WohnheimMetriken};

/// Intervall fuer den DB-Ping des Health-Checks
const DB_PING_INTERVALL: Duration = Duration::from_secs(15);

/// Haelt den Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Signierschluessel bestimmen
    /// 2. Datenbank oeffnen und migrieren
    /// 3. Gateway, Metriken und Health-State aufbauen
    /// 4. REST-API starten, auf Ctrl-C warten
    /// 5. Datenbank schliessen
    pub async fn starten(self) -> Result<()> {
        let bind_addr = self.config.rest_bind_adresse()?;

        let schluessel = self.config.auth.signierschluessel()?;
        if schluessel.ist_zufaellig() {
            tracing::warn!(
                "Kein token_secret konfiguriert, verwende zufaelligen Schluessel; \
                 Tokens verlieren beim Neustart ihre Gueltigkeit"
            );
        }
        let codec = Arc::new(TokenCodec::neu(schluessel.bytes(), self.config.auth.token_ttl()?));

        let db = SqliteDb::oeffnen(&self.config.datenbank_config()).await?;

        let gateway = Arc::new(AuthGateway::neu(Arc::new(db.clone()), codec));
        let metriken = WohnheimMetriken::neu()?;
        let health = HealthState::neu();
        let state = AppState::neu(db.clone(), gateway, metriken);

        let ping = tokio::spawn(db_ping(db.clone(), health.clone()));

        tracing::info!(
            addr = %bind_addr,
            token_ttl_minuten = self.config.auth.token_ttl_minuten,
            "Server startet"
        );

        let ergebnis = RestServer::neu(RestServerKonfig {
            bind_addr,
            cors_origins: self.config.netzwerk.cors_origins.clone(),
        })
        .starten(state, health, shutdown_signal())
        .await;

        ping.abort();
        db.schliessen().await;
        ergebnis
    }
}

/// Aktualisiert periodisch den DB-Status fuer `/health`
async fn db_ping(db: SqliteDb, health: HealthState) {
    let mut intervall = tokio::time::interval(DB_PING_INTERVALL);
    loop {
        intervall.tick().await;
        health.db_status_setzen(db.ping().await);
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown-Signal empfangen, Server wird beendet"),
        Err(e) => tracing::error!(fehler = %e, "Signal-Handler konnte nicht installiert werden"),
    }
}
