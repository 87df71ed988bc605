//! `GET /health` – Bereitschaft des Prozesses und Erreichbarkeit der Datenbank
//!
//! Den DB-Status liefert ein periodischer Ping im Server-Prozess. Solange die
//! Datenbank nicht erreichbar ist, antwortet der Endpunkt mit 503.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub db_connected: bool,
    /// Fehlgeschlagene Pings seit dem letzten erfolgreichen
    pub db_failed_pings: u64,
}

/// Geteilter Zustand zwischen Ping-Task und Handler
#[derive(Clone)]
pub struct HealthState {
    gestartet: Instant,
    db_verbunden: Arc<AtomicBool>,
    fehlschlaege: Arc<AtomicU64>,
}

impl HealthState {
    pub fn neu() -> Self {
        Self {
            gestartet: Instant::now(),
            db_verbunden: Arc::new(AtomicBool::new(true)),
            fehlschlaege: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn db_verbunden(&self) -> bool {
        self.db_verbunden.load(Ordering::Relaxed)
    }

    /// Ergebnis eines DB-Pings eintragen; nur Zustandswechsel werden geloggt
    pub fn db_status_setzen(&self, verbunden: bool) {
        if verbunden {
            self.fehlschlaege.store(0, Ordering::Relaxed);
        } else {
            self.fehlschlaege.fetch_add(1, Ordering::Relaxed);
        }

        let vorher = self.db_verbunden.swap(verbunden, Ordering::Relaxed);
        match (vorher, verbunden) {
            (false, true) => tracing::info!("Datenbank wieder erreichbar"),
            (true, false) => tracing::warn!("Datenbank nicht erreichbar"),
            _ => {}
        }
    }

    pub fn bericht(&self) -> HealthResponse {
        let db_connected = self.db_verbunden();
        HealthResponse {
            status: if db_connected {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.gestartet.elapsed().as_secs(),
            db_connected,
            db_failed_pings: self.fehlschlaege.load(Ordering::Relaxed),
        }
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::neu()
    }
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let bericht = state.bericht();
    let code = match bericht.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    (code, Json(bericht))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn fehlschlaege_zaehlen_und_zuruecksetzen() {
        let state = HealthState::neu();
        state.db_status_setzen(false);
        state.db_status_setzen(false);
        assert_eq!(state.bericht().db_failed_pings, 2);
        assert_eq!(state.bericht().status, HealthStatus::Degraded);

        state.db_status_setzen(true);
        let bericht = state.bericht();
        assert_eq!(bericht.db_failed_pings, 0);
        assert!(bericht.db_connected);
    }

    #[tokio::test]
    async fn degraded_liefert_503() {
        let state = HealthState::neu();
        state.db_status_setzen(false);

        let antwort = health_router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(antwort.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(antwort.into_body(), usize::MAX).await.unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, HealthStatus::Degraded);
        assert_eq!(body.db_failed_pings, 1);
    }
}
