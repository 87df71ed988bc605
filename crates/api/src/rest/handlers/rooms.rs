//! REST-Handler fuer Zimmer-Endpunkte

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use wohnheim_auth::{Operation, Ressource};
use wohnheim_db::{
    models::{NeuesZimmer, ZimmerRecord},
    ZimmerRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::rest::extract::{JsonBody, PfadParam};
use crate::rest::handlers::pflichtfeld;
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct ZimmerErstellenBody {
    pub room_number: String,
    pub floor: i64,
    pub capacity: i64,
}

/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<JsonBody<ZimmerErstellenBody>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Erstellen, Ressource::Zimmer)
        .await?;
    let JsonBody(body) = body?;
    pflichtfeld("room_number", &body.room_number)?;
    if body.capacity < 1 {
        return Err(ApiError::ungueltige_eingabe("capacity muss mindestens 1 sein"));
    }

    let zimmer = ZimmerRepository::create(
        &state.db,
        NeuesZimmer {
            room_number: &body.room_number,
            floor: body.floor,
            capacity: body.capacity,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(zimmer)))
}

/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ZimmerRecord>>> {
    state
        .zugriff(&headers, Operation::Lesen, Ressource::Zimmer)
        .await?;
    Ok(Json(ZimmerRepository::list(&state.db).await?))
}

/// GET /api/rooms/available
pub async fn list_available_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<ZimmerRecord>>> {
    state
        .zugriff(&headers, Operation::Lesen, Ressource::Zimmer)
        .await?;
    Ok(Json(ZimmerRepository::list_available(&state.db).await?))
}

/// POST /api/rooms/:room_id/allocate/:student_id
///
/// `student_id` ist hier die Datensatz-ID des Studenten.
pub async fn allocate_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    pfad: Result<PfadParam<(Uuid, Uuid)>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Aktualisieren, Ressource::Zimmer)
        .await?;
    let PfadParam((room_id, student_record_id)) = pfad?;

    let zimmer = ZimmerRepository::allocate(&state.db, room_id, student_record_id).await?;

    tracing::info!(
        room = %zimmer.room_number,
        student_record_id = %student_record_id,
        occupied = zimmer.occupied,
        "Zimmer zugewiesen"
    );
    Ok(Json(json!({ "message": "Zimmer zugewiesen", "room": zimmer })))
}
