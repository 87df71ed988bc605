//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist. Das Token-Geheimnis kann per Umgebungsvariable
//! ueberschrieben werden.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use anyhow::{bail, Context};
use serde::Deserialize;
use uuid::Uuid;
use wohnheim_db::DatabaseConfig;
use wohnheim_observability::logging::{log_format_gueltig, log_level_gueltig};

/// Pfad der Konfigurationsdatei
pub const ENV_CONFIG: &str = "WOHNHEIM_CONFIG";
/// Ueberschreibt `[auth] token_secret`
pub const ENV_TOKEN_SECRET: &str = "WOHNHEIM_TOKEN_SECRET";
/// Obergrenze fuer `[auth] token_ttl_minuten` (eine Woche)
pub const MAX_TOKEN_TTL_MINUTEN: i64 = 7 * 24 * 60;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub netzwerk: NetzwerkEinstellungen,
    pub datenbank: DatenbankEinstellungen,
    pub auth: AuthEinstellungen,
    pub logging: LoggingEinstellungen,
}

/// Netzwerk-Einstellungen der REST-API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    pub bind_adresse: String,
    pub port: u16,
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "127.0.0.1".into(),
            port: 8001,
            cors_origins: vec![],
        }
    }
}

/// Datenbank-Einstellungen
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    pub url: String,
    pub max_verbindungen: u32,
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let standard = DatabaseConfig::default();
        Self {
            url: standard.url,
            max_verbindungen: standard.max_verbindungen,
            sqlite_wal: standard.sqlite_wal,
        }
    }
}

/// Token-Einstellungen
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    /// Symmetrischer Signierschluessel (fehlt = zufaellig pro Prozess)
    pub token_secret: Option<String>,
    pub token_ttl_minuten: i64,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_minuten: wohnheim_auth::STANDARD_TTL_MINUTEN,
        }
    }
}

// Schluessel nie ausgeben
impl fmt::Debug for AuthEinstellungen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEinstellungen")
            .field("token_secret", &self.token_secret.as_ref().map(|_| "***"))
            .field("token_ttl_minuten", &self.token_ttl_minuten)
            .finish()
    }
}

/// Herkunft des Signierschluessels
pub enum Signierschluessel {
    Konfiguriert(String),
    Zufaellig(String),
}

impl Signierschluessel {
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Konfiguriert(s) | Self::Zufaellig(s) => s.as_bytes(),
        }
    }

    pub fn ist_zufaellig(&self) -> bool {
        matches!(self, Self::Zufaellig(_))
    }
}

impl AuthEinstellungen {
    /// Liefert den Signierschluessel; ein leerer Schluessel ist ein Fehler
    pub fn signierschluessel(&self) -> anyhow::Result<Signierschluessel> {
        match self.token_secret.as_deref() {
            Some(s) if s.trim().is_empty() => bail!("token_secret darf nicht leer sein"),
            Some(s) => Ok(Signierschluessel::Konfiguriert(s.to_string())),
            None => Ok(Signierschluessel::Zufaellig(format!(
                "{}{}",
                Uuid::new_v4().simple(),
                Uuid::new_v4().simple()
            ))),
        }
    }

    /// Lebensdauer der Token; ausserhalb von 1..=[`MAX_TOKEN_TTL_MINUTEN`] ein Fehler
    pub fn token_ttl(&self) -> anyhow::Result<chrono::TimeDelta> {
        if !(1..=MAX_TOKEN_TTL_MINUTEN).contains(&self.token_ttl_minuten) {
            bail!(
                "token_ttl_minuten muss zwischen 1 und {MAX_TOKEN_TTL_MINUTEN} liegen, ist {}",
                self.token_ttl_minuten
            );
        }
        chrono::TimeDelta::try_minutes(self.token_ttl_minuten)
            .context("token_ttl_minuten nicht darstellbar")
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// `None` wenn die Datei nicht existiert; der Aufrufer faellt dann auf
    /// die Standardwerte zurueck.
    pub fn laden(pfad: &str) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Uebernimmt das Token-Geheimnis aus der Umgebung, falls gesetzt
    pub fn umgebung_anwenden(&mut self) {
        if let Ok(secret) = std::env::var(ENV_TOKEN_SECRET) {
            self.auth.token_secret = Some(secret);
        }
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn validieren(&self) -> anyhow::Result<()> {
        self.auth.token_ttl()?;
        if self.datenbank.max_verbindungen == 0 {
            bail!("max_verbindungen muss mindestens 1 sein");
        }
        if !log_level_gueltig(&self.logging.level) {
            bail!("Unbekanntes Log-Level '{}'", self.logging.level);
        }
        if !log_format_gueltig(&self.logging.format) {
            bail!("Unbekanntes Log-Format '{}'", self.logging.format);
        }
        self.rest_bind_adresse()?;
        Ok(())
    }

    /// Bind-Adresse fuer den REST-Server
    pub fn rest_bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .netzwerk
            .bind_adresse
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{}'", self.netzwerk.bind_adresse))?;
        Ok(SocketAddr::new(ip, self.netzwerk.port))
    }

    pub fn datenbank_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.datenbank.url.clone(),
            max_verbindungen: self.datenbank.max_verbindungen,
            sqlite_wal: self.datenbank.sqlite_wal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.netzwerk.port, 8001);
        assert_eq!(cfg.auth.token_ttl_minuten, 30);
        assert!(cfg.auth.token_secret.is_none());
        assert_eq!(cfg.logging.level, "info");
        cfg.validieren().unwrap();
        assert_eq!(cfg.rest_bind_adresse().unwrap().to_string(), "127.0.0.1:8001");
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [netzwerk]
            port = 9000

            [auth]
            token_secret = "abc"
            token_ttl_minuten = 5
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.netzwerk.port, 9000);
        assert_eq!(cfg.auth.token_ttl().unwrap(), chrono::Duration::minutes(5));
        assert_eq!(cfg.auth.token_secret.as_deref(), Some("abc"));
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.netzwerk.bind_adresse, "127.0.0.1");
        assert!(cfg.datenbank.sqlite_wal);
    }

    #[test]
    fn leeres_geheimnis_abgelehnt() {
        let auth = AuthEinstellungen {
            token_secret: Some("  ".into()),
            ..Default::default()
        };
        assert!(auth.signierschluessel().is_err());
    }

    #[test]
    fn fehlendes_geheimnis_wird_zufaellig() {
        let auth = AuthEinstellungen::default();
        let a = auth.signierschluessel().unwrap();
        let b = auth.signierschluessel().unwrap();
        assert!(a.ist_zufaellig());
        assert_eq!(a.bytes().len(), 64);
        assert_ne!(a.bytes(), b.bytes());
    }

    #[test]
    fn debug_verbirgt_geheimnis() {
        let auth = AuthEinstellungen {
            token_secret: Some("streng-geheim".into()),
            ..Default::default()
        };
        let ausgabe = format!("{auth:?}");
        assert!(!ausgabe.contains("streng-geheim"));
        assert!(ausgabe.contains("***"));
    }

    #[test]
    fn ungueltige_werte_abgelehnt() {
        let mut cfg = ServerConfig::default();
        cfg.auth.token_ttl_minuten = 0;
        assert!(cfg.validieren().is_err());

        let mut cfg = ServerConfig::default();
        cfg.auth.token_ttl_minuten = i64::MAX;
        assert!(cfg.validieren().is_err());
        assert!(cfg.auth.token_ttl().is_err());

        let mut cfg = ServerConfig::default();
        cfg.auth.token_ttl_minuten = MAX_TOKEN_TTL_MINUTEN;
        cfg.validieren().unwrap();

        let mut cfg = ServerConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validieren().is_err());

        let mut cfg = ServerConfig::default();
        cfg.netzwerk.bind_adresse = "localhost:80".into();
        assert!(cfg.validieren().is_err());
    }

    #[test]
    fn laden_ohne_datei_und_aus_datei() {
        let pfad = std::env::temp_dir().join(format!("wohnheim-{}.toml", Uuid::new_v4()));
        let pfad_text = pfad.to_string_lossy().into_owned();
        assert!(ServerConfig::laden(&pfad_text).unwrap().is_none());

        std::fs::write(&pfad, "[netzwerk]\nport = 9100\n").unwrap();
        let cfg = ServerConfig::laden(&pfad_text).unwrap().unwrap();
        std::fs::remove_file(&pfad).unwrap();
        assert_eq!(cfg.netzwerk.port, 9100);
    }
}
