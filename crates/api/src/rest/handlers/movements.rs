//! REST-Handler fuer Bewegungen (Ein-/Auschecken)

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use wohnheim_auth::{Operation, Ressource};
use wohnheim_db::{
    models::{BewegungRecord, BewegungsAktion, NeueBewegung},
    BewegungRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::rest::extract::JsonBody;
use crate::rest::handlers::pflichtfeld;
use crate::rest::AppState;

/// Anzahl Eintraege fuer /api/movements/recent
const NEUESTE_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct BewegungBody {
    pub student_id: String,
    pub student_name: String,
    pub action: BewegungsAktion,
    pub note: Option<String>,
}

/// POST /api/movements – protokolliert und setzt den Anwesenheitsstatus
pub async fn log_movement(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<JsonBody<BewegungBody>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Erstellen, Ressource::Bewegung)
        .await?;
    let JsonBody(body) = body?;
    pflichtfeld("student_id", &body.student_id)?;

    let bewegung = BewegungRepository::create(
        &state.db,
        NeueBewegung {
            student_id: &body.student_id,
            student_name: &body.student_name,
            action: body.action,
            note: body.note.as_deref(),
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(bewegung)))
}

/// GET /api/movements – neueste zuerst
pub async fn list_movements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<BewegungRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Bewegung)
        .await?;
    Ok(Json(
        BewegungRepository::list(&state.db, &zugriff.sichtbereich, None).await?,
    ))
}

/// GET /api/movements/recent
pub async fn recent_movements(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<BewegungRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Bewegung)
        .await?;
    Ok(Json(
        BewegungRepository::list(&state.db, &zugriff.sichtbereich, Some(NEUESTE_LIMIT)).await?,
    ))
}
