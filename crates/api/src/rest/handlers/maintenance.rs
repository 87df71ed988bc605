//! REST-Handler fuer Wartungsanfragen

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use uuid::Uuid;
use wohnheim_auth::{Operation, Ressource};
use wohnheim_core::Rolle;
use wohnheim_db::{
    models::{NeueWartung, WartungsRecord, WartungsStatus},
    WartungsRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::rest::extract::{JsonBody, PfadParam, QueryParams};
use crate::rest::handlers::{nachricht, pflichtfeld};
use crate::rest::AppState;

#[derive(Debug, Deserialize)]
pub struct WartungErstellenBody {
    /// Nur fuer Wardens massgeblich; Studenten melden immer unter eigener Kennung
    #[serde(default)]
    pub student_id: String,
    pub student_name: String,
    pub room_number: String,
    pub issue_type: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: WartungsStatus,
}

/// POST /api/maintenance – fuer beide Rollen offen, Studenten nur fuer sich selbst
pub async fn create_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<JsonBody<WartungErstellenBody>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let zugriff = state
        .zugriff(&headers, Operation::Erstellen, Ressource::Wartung)
        .await?;
    let JsonBody(body) = body?;

    let student_id = match zugriff.principal.role {
        Rolle::Warden => body.student_id.as_str(),
        Rolle::Student => {
            let eigene = zugriff.principal.student_id.as_deref().ok_or(ApiError::Verboten)?;
            if !body.student_id.is_empty() && body.student_id != eigene {
                tracing::debug!(
                    angegeben = %body.student_id,
                    eigene = %eigene,
                    "Fremde Kennung in Wartungsanfrage ersetzt"
                );
            }
            eigene
        }
    };
    pflichtfeld("student_id", student_id)?;
    pflichtfeld("issue_type", &body.issue_type)?;

    let anfrage = WartungsRepository::create(
        &state.db,
        NeueWartung {
            student_id,
            student_name: &body.student_name,
            room_number: &body.room_number,
            issue_type: &body.issue_type,
            description: &body.description,
        },
    )
    .await?;

    tracing::info!(
        id = %anfrage.id,
        von = %zugriff.principal.username,
        room = %anfrage.room_number,
        "Wartungsanfrage erstellt"
    );
    Ok((StatusCode::CREATED, Json(anfrage)))
}

/// GET /api/maintenance
pub async fn list_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<WartungsRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Wartung)
        .await?;
    Ok(Json(WartungsRepository::list(&state.db, &zugriff.sichtbereich).await?))
}

/// PUT /api/maintenance/:id/status?status=…
pub async fn update_request_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    pfad: Result<PfadParam<Uuid>, ApiError>,
    query: Result<QueryParams<StatusQuery>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Aktualisieren, Ressource::Wartung)
        .await?;
    let (PfadParam(id), QueryParams(query)) = (pfad?, query?);

    if !WartungsRepository::update_status(&state.db, id, query.status).await? {
        return Err(ApiError::nicht_gefunden("Wartungsanfrage"));
    }
    Ok(nachricht("Status aktualisiert"))
}
