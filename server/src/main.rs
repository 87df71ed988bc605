//! Wohnheim Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use wohnheim_observability::logging_initialisieren;
use wohnheim_server::{
    config::{ServerConfig, ENV_CONFIG},
    Server,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var(ENV_CONFIG).unwrap_or_else(|_| "config.toml".into());

    let geladen = ServerConfig::laden(&config_pfad)?;
    let datei_gefunden = geladen.is_some();
    let mut config = geladen.unwrap_or_default();
    config.umgebung_anwenden();
    config.validieren()?;

    logging_initialisieren(&config.logging.level, &config.logging.format);

    if !datei_gefunden {
        tracing::warn!(
            pfad = %config_pfad,
            "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
        );
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Wohnheim Server wird initialisiert"
    );

    Server::neu(config).starten().await
}
