//! REST-Interface fuer Wohnheim

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod verknuepfung;

use std::sync::Arc;

use axum::http::HeaderMap;
use wohnheim_auth::{AuthError, AuthGateway, Operation, Ressource, Zugriff};
use wohnheim_db::SqliteDb;
use wohnheim_observability::WohnheimMetriken;

use crate::error::{ApiError, ApiResult};

/// Axum-State fuer den REST-Server
///
/// Der Store-Handle wird beim Start geoeffnet und hier explizit geteilt.
#[derive(Clone)]
pub struct AppState {
    pub db: SqliteDb,
    pub gateway: Arc<AuthGateway<SqliteDb>>,
    pub metriken: WohnheimMetriken,
}

impl AppState {
    pub fn neu(db: SqliteDb, gateway: Arc<AuthGateway<SqliteDb>>, metriken: WohnheimMetriken) -> Self {
        Self { db, gateway, metriken }
    }

    /// Autorisiert eine Operation anhand des Bearer-Tokens im Header
    pub async fn zugriff(
        &self,
        headers: &HeaderMap,
        operation: Operation,
        ressource: Ressource,
    ) -> ApiResult<Zugriff> {
        let Some(token) = middleware::bearer_token(headers) else {
            self.metriken.abweisung_zaehlen("unauthorized");
            return Err(ApiError::NichtAutorisiert);
        };

        self.gateway
            .autorisieren(token, operation, ressource)
            .await
            .map_err(|e| self.abweisung(e))
    }

    /// Zaehlt Abweisungen in den Metriken und wandelt den Fehler um
    pub(crate) fn abweisung(&self, e: AuthError) -> ApiError {
        match &e {
            AuthError::NichtAutorisiert => self.metriken.abweisung_zaehlen("unauthorized"),
            AuthError::Verboten => self.metriken.abweisung_zaehlen("forbidden"),
            _ => {}
        }
        e.into()
    }
}

pub use server::{RestServer, RestServerKonfig};
