//! Axum HTTP-Server fuer die REST-API

use std::future::Future;
use std::net::SocketAddr;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use wohnheim_observability::{health_router, metrics_router, timing_middleware, HealthState};

use crate::rest::{routes::api_router, AppState};

/// REST-Server-Konfiguration
#[derive(Debug, Clone)]
pub struct RestServerKonfig {
    pub bind_addr: SocketAddr,
    /// Erlaubte CORS-Origins. Leer = alle Origins erlaubt (nur fuer Entwicklung).
    pub cors_origins: Vec<String>,
}

impl Default for RestServerKonfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8001)),
            cors_origins: vec![],
        }
    }
}

/// Axum HTTP-Server fuer die REST-API
pub struct RestServer {
    konfig: RestServerKonfig,
}

impl RestServer {
    pub fn neu(konfig: RestServerKonfig) -> Self {
        Self { konfig }
    }

    /// Baut den vollstaendigen Router (API, Health, Metriken, Layer)
    pub fn app(&self, state: AppState, health: HealthState) -> Router {
        let metriken = state.metriken.clone();

        api_router()
            .with_state(state)
            .merge(health_router(health))
            .merge(metrics_router(metriken.clone()))
            .layer(axum::middleware::from_fn_with_state(metriken, timing_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.konfig.cors_origins))
    }

    /// Startet den REST-Server und laeuft bis `shutdown` aufgeloest wird
    pub async fn starten<F>(self, state: AppState, health: HealthState, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.app(state, health);

        let listener = tokio::net::TcpListener::bind(self.konfig.bind_addr).await?;
        tracing::info!(addr = %self.konfig.bind_addr, "REST-Server gestartet");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("REST-Server beendet");
        Ok(())
    }
}

/// Leere Liste erlaubt alle Origins; nicht lesbare Eintraege werden verworfen
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let erlaubt: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(wert) => Some(wert),
            Err(_) => {
                tracing::warn!(origin = %o, "Ungueltiger CORS-Origin ignoriert");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(erlaubt)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
