//! Prometheus-kompatible Metriken fuer Wohnheim
//!
//! Registrierte Metriken:
//! - `wohnheim_http_requests_total` – Counter: HTTP-Anfragen (method, path, status)
//! - `wohnheim_http_request_duration_seconds` – Histogram: HTTP-Antwortzeit
//! - `wohnheim_logins_total` – Counter: Anmeldeversuche (ergebnis)
//! - `wohnheim_registrations_total` – Counter: erfolgreiche Registrierungen
//! - `wohnheim_auth_rejections_total` – Counter: abgewiesene Anfragen (grund)

use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Alle Wohnheim-Prometheus-Metriken
#[derive(Clone)]
pub struct WohnheimMetriken {
    pub registry: Arc<Registry>,

    // HTTP-Metriken
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Auth-Metriken
    pub logins_total: IntCounterVec,
    pub registrations_total: IntCounter,
    pub auth_rejections_total: IntCounterVec,
}

impl WohnheimMetriken {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        // --- HTTP-Metriken ---
        let http_requests_total = IntCounterVec::new(
            Opts::new("wohnheim_http_requests_total", "Gesamtanzahl HTTP-Anfragen"),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "wohnheim_http_request_duration_seconds",
                "HTTP-Antwortzeit in Sekunden",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "path"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        // --- Auth-Metriken ---
        let logins_total = IntCounterVec::new(
            Opts::new("wohnheim_logins_total", "Anmeldeversuche nach Ergebnis"),
            &["ergebnis"],
        )?;
        registry.register(Box::new(logins_total.clone()))?;

        let registrations_total = IntCounter::with_opts(Opts::new(
            "wohnheim_registrations_total",
            "Erfolgreiche Registrierungen",
        ))?;
        registry.register(Box::new(registrations_total.clone()))?;

        let auth_rejections_total = IntCounterVec::new(
            Opts::new(
                "wohnheim_auth_rejections_total",
                "Abgewiesene Anfragen (nicht autorisiert / verboten)",
            ),
            &["grund"],
        )?;
        registry.register(Box::new(auth_rejections_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            http_requests_total,
            http_request_duration_seconds,
            logins_total,
            registrations_total,
            auth_rejections_total,
        })
    }

    /// Zaehlt einen Anmeldeversuch
    pub fn login_zaehlen(&self, erfolgreich: bool) {
        let ergebnis = if erfolgreich { "erfolg" } else { "fehlschlag" };
        self.logins_total.with_label_values(&[ergebnis]).inc();
    }

    /// Zaehlt eine abgewiesene Anfrage (`grund`: "unauthorized" oder "forbidden")
    pub fn abweisung_zaehlen(&self, grund: &str) {
        self.auth_rejections_total.with_label_values(&[grund]).inc();
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: WohnheimMetriken) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<WohnheimMetriken>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metriken_erstellen_erfolgreich() {
        let metriken = WohnheimMetriken::neu().unwrap();
        metriken.registrations_total.inc();
        assert!(!metriken.registry.gather().is_empty());
    }

    #[test]
    fn login_zaehler_nach_ergebnis() {
        let metriken = WohnheimMetriken::neu().unwrap();
        metriken.login_zaehlen(true);
        metriken.login_zaehlen(false);
        metriken.login_zaehlen(false);

        assert_eq!(metriken.logins_total.with_label_values(&["erfolg"]).get(), 1);
        assert_eq!(metriken.logins_total.with_label_values(&["fehlschlag"]).get(), 2);
    }

    #[test]
    fn export_enthaelt_metriknamen() {
        let metriken = WohnheimMetriken::neu().unwrap();
        metriken.abweisung_zaehlen("forbidden");
        metriken
            .http_requests_total
            .with_label_values(&["GET", "/api/rooms", "200"])
            .inc();

        let text = metriken.exportieren().unwrap();
        assert!(text.contains("wohnheim_auth_rejections_total"));
        assert!(text.contains("wohnheim_http_requests_total"));
    }

    #[test]
    fn zwei_instanzen_unabhaengig() {
        // Eigene Registry pro Instanz, keine globalen Kollisionen
        let a = WohnheimMetriken::neu().unwrap();
        let b = WohnheimMetriken::neu().unwrap();
        a.registrations_total.inc();
        assert_eq!(b.registrations_total.get(), 0);
    }
}
