//! REST-Handler fuer Besucher-Endpunkte

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use uuid::Uuid;
use wohnheim_auth::{Operation, Ressource};
use wohnheim_db::{
    models::{BesucherRecord, NeuerBesucher},
    BesucherRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::rest::extract::{JsonBody, PfadParam};
use crate::rest::handlers::{nachricht, pflichtfeld};
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct BesucherErstellenBody {
    pub name: String,
    pub phone: String,
    pub visiting_student_id: String,
    pub visiting_student_name: String,
    pub purpose: String,
}

/// POST /api/visitors
pub async fn create_visitor(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<JsonBody<BesucherErstellenBody>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Erstellen, Ressource::Besucher)
        .await?;
    let JsonBody(body) = body?;
    pflichtfeld("name", &body.name)?;
    pflichtfeld("visiting_student_id", &body.visiting_student_id)?;

    let besucher = BesucherRepository::create(
        &state.db,
        NeuerBesucher {
            name: &body.name,
            phone: &body.phone,
            visiting_student_id: &body.visiting_student_id,
            visiting_student_name: &body.visiting_student_name,
            purpose: &body.purpose,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(besucher)))
}

/// GET /api/visitors
pub async fn list_visitors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<BesucherRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Besucher)
        .await?;
    Ok(Json(BesucherRepository::list(&state.db, &zugriff.sichtbereich).await?))
}

/// GET /api/visitors/active
pub async fn list_active_visitors(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<BesucherRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Besucher)
        .await?;
    Ok(Json(
        BesucherRepository::list_active(&state.db, &zugriff.sichtbereich).await?,
    ))
}

/// POST /api/visitors/:id/checkout
pub async fn checkout_visitor(
    State(state): State<AppState>,
    headers: HeaderMap,
    pfad: Result<PfadParam<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Aktualisieren, Ressource::Besucher)
        .await?;
    let PfadParam(id) = pfad?;
    if !BesucherRepository::check_out(&state.db, id).await? {
        return Err(ApiError::nicht_gefunden("Besucher"));
    }
    Ok(nachricht("Besucher ausgecheckt"))
}
