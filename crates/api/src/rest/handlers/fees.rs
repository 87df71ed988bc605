//! REST-Handler fuer Gebuehren

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use wohnheim_auth::{Operation, Ressource};
use wohnheim_db::{
    models::{GebuehrRecord, NeueGebuehr},
    GebuehrRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::rest::extract::{JsonBody, PfadParam};
use crate::rest::handlers::{nachricht, pflichtfeld};
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct GebuehrErstellenBody {
    pub student_id: String,
    pub student_name: String,
    pub fee_type: String,
    pub amount: f64,
    pub due_date: DateTime<Utc>,
}

/// POST /api/fees
pub async fn create_fee(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<JsonBody<GebuehrErstellenBody>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Erstellen, Ressource::Gebuehr)
        .await?;
    let JsonBody(body) = body?;
    pflichtfeld("student_id", &body.student_id)?;
    if !body.amount.is_finite() || body.amount <= 0.0 {
        return Err(ApiError::ungueltige_eingabe("amount muss groesser als 0 sein"));
    }

    let gebuehr = GebuehrRepository::create(
        &state.db,
        NeueGebuehr {
            student_id: &body.student_id,
            student_name: &body.student_name,
            fee_type: &body.fee_type,
            amount: body.amount,
            due_date: body.due_date,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(gebuehr)))
}

/// GET /api/fees
pub async fn list_fees(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<GebuehrRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Gebuehr)
        .await?;
    Ok(Json(GebuehrRepository::list(&state.db, &zugriff.sichtbereich).await?))
}

/// GET /api/fees/overdue – faellig vor jetzt und nicht bezahlt
pub async fn list_overdue_fees(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<GebuehrRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Gebuehr)
        .await?;
    Ok(Json(
        GebuehrRepository::list_overdue(&state.db, &zugriff.sichtbereich, Utc::now()).await?,
    ))
}

/// POST /api/fees/:id/pay
pub async fn pay_fee(
    State(state): State<AppState>,
    headers: HeaderMap,
    pfad: Result<PfadParam<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Aktualisieren, Ressource::Gebuehr)
        .await?;
    let PfadParam(id) = pfad?;

    if !GebuehrRepository::pay(&state.db, id).await? {
        return Err(ApiError::nicht_gefunden("Gebuehr"));
    }
    tracing::info!(id = %id, "Gebuehr bezahlt");
    Ok(nachricht("Gebuehr bezahlt"))
}
