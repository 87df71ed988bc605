//! REST-Handler fuer Registrierung, Login und whoAmI

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use wohnheim_auth::{Ausweis, Principal, Registrierung};
use wohnheim_core::Rolle;

use crate::error::{ApiError, ApiResult};
use crate::rest::{extract::JsonBody, middleware::bearer_token, verknuepfung, AppState};

#[derive(Debug, Deserialize)]
pub struct RegistrierenBody {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Rolle,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

/// Antwort auf Registrierung und Login
#[derive(Debug, Serialize)]
pub struct TokenAntwort {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: Principal,
}

impl TokenAntwort {
    fn aus(ausweis: Ausweis, state: &AppState) -> Self {
        Self {
            access_token: ausweis.token,
            token_type: "bearer",
            expires_in: state.gateway.token_ttl().num_seconds(),
            user: ausweis.principal,
        }
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegistrierenBody>,
) -> ApiResult<impl IntoResponse> {
    let mut ausweis = state
        .gateway
        .registrieren(Registrierung {
            username: body.username,
            email: body.email,
            password: body.password,
            role: body.role,
            full_name: body.full_name,
            phone: body.phone,
            student_id: body.student_id,
        })
        .await?;
    state.metriken.registrations_total.inc();

    if let Some(student_id) = ausweis.principal.student_id.clone() {
        // Der Principal existiert bereits; ein Verknuepfungsfehler bricht die Registrierung nicht ab
        match verknuepfung::principal_verknuepfen(&state.db, ausweis.principal.id, &student_id).await {
            Ok(record_id) => ausweis.principal.student_record_id = record_id,
            Err(e) => tracing::error!(
                user_id = %ausweis.principal.id,
                fehler = %e,
                "Verknuepfung nach Registrierung fehlgeschlagen"
            ),
        }
    }

    Ok((StatusCode::CREATED, Json(TokenAntwort::aus(ausweis, &state))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> ApiResult<Json<TokenAntwort>> {
    let ergebnis = state.gateway.anmelden(&body.username, &body.password).await;
    state.metriken.login_zaehlen(ergebnis.is_ok());

    Ok(Json(TokenAntwort::aus(ergebnis?, &state)))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Principal>> {
    let token = bearer_token(&headers).ok_or(ApiError::NichtAutorisiert)?;
    let principal = state
        .gateway
        .wer_bin_ich(token)
        .await
        .map_err(|e| state.abweisung(e))?;
    Ok(Json(principal))
}
