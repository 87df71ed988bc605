//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `WH_LOG_LEVEL`: Log-Level oder Filter-Direktive, Standard aus der Konfiguration
//! - `WH_LOG_FORMAT`: Format (text/json), Standard aus der Konfiguration

use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "WH_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "WH_LOG_FORMAT";

/// Initialisiert das Logging-System.
///
/// Umgebungsvariablen haben Vorrang vor den uebergebenen Werten. Ein
/// bereits installierter Subscriber (z.B. in Tests) wird beibehalten.
pub fn logging_initialisieren(level: &str, format: &str) {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| format.to_string());

    let ergebnis = match format.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        _ => fmt().with_env_filter(filter).with_target(true).try_init(),
    };

    if ergebnis.is_err() {
        tracing::debug!("Logging bereits initialisiert");
    }
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    matches!(format, "text" | "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_werte() {
        assert!(log_level_gueltig("debug"));
        assert!(log_level_gueltig("warn"));
        assert!(!log_level_gueltig("verbose"));
        assert!(!log_level_gueltig("INFO"));
        assert!(!log_level_gueltig(""));
    }

    #[test]
    fn log_format_werte() {
        assert!(log_format_gueltig("text"));
        assert!(log_format_gueltig("json"));
        assert!(!log_format_gueltig("JSON"));
        assert!(!log_format_gueltig("xml"));
    }

    #[test]
    fn doppelte_initialisierung_ist_harmlos() {
        logging_initialisieren("info", "text");
        logging_initialisieren("debug", "json");
    }
}
