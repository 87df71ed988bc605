//! REST-Handler fuer Studenten-Endpunkte

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use uuid::Uuid;
use wohnheim_auth::{Operation, Ressource};
use wohnheim_db::{
    models::{NeuerStudent, StudentRecord, StudentUpdate},
    StudentRepository,
};

use crate::error::{ApiError, ApiResult};
use crate::rest::extract::{JsonBody, PfadParam};
use crate::rest::handlers::{nachricht, pflichtfeld};
use crate::rest::{verknuepfung, AppState};

#[derive(Debug, Deserialize)]
pub struct StudentErstellenBody {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub student_id: String,
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<JsonBody<StudentErstellenBody>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    state
        .zugriff(&headers, Operation::Erstellen, Ressource::Student)
        .await?;
    let JsonBody(body) = body?;
    pflichtfeld("name", &body.name)?;
    pflichtfeld("student_id", &body.student_id)?;

    let student = StudentRepository::create(
        &state.db,
        NeuerStudent {
            name: &body.name,
            email: &body.email,
            phone: &body.phone,
            student_id: &body.student_id,
        },
    )
    .await?;

    verknuepfung::kennung_neu_verknuepfen(&state.db, &student.student_id).await?;

    tracing::info!(id = %student.id, student_id = %student.student_id, "Student angelegt");
    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<StudentRecord>>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Student)
        .await?;
    let studenten = StudentRepository::list(&state.db, &zugriff.sichtbereich).await?;
    Ok(Json(studenten))
}

/// GET /api/students/:id
///
/// Fremde Datensaetze sind fuer Studenten nicht sichtbar und liefern 404.
pub async fn get_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    pfad: Result<PfadParam<Uuid>, ApiError>,
) -> ApiResult<Json<StudentRecord>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Student)
        .await?;
    let PfadParam(id) = pfad?;
    StudentRepository::get(&state.db, id, &zugriff.sichtbereich)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::nicht_gefunden("Student"))
}

/// PUT /api/students/:id
pub async fn update_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    pfad: Result<PfadParam<Uuid>, ApiError>,
    body: Result<JsonBody<StudentUpdate>, ApiError>,
) -> ApiResult<Json<StudentRecord>> {
    state
        .zugriff(&headers, Operation::Aktualisieren, Ressource::Student)
        .await?;
    let (PfadParam(id), JsonBody(body)) = (pfad?, body?);
    if body.ist_leer() {
        return Err(ApiError::ungueltige_eingabe("Keine Felder zum Aktualisieren"));
    }

    let student = StudentRepository::update(&state.db, id, body).await?;
    Ok(Json(student))
}

/// DELETE /api/students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    pfad: Result<PfadParam<Uuid>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let zugriff = state
        .zugriff(&headers, Operation::Loeschen, Ressource::Student)
        .await?;
    let PfadParam(id) = pfad?;
    let student = StudentRepository::get(&state.db, id, &zugriff.sichtbereich)
        .await?
        .ok_or_else(|| ApiError::nicht_gefunden("Student"))?;
    if !StudentRepository::delete(&state.db, id).await? {
        return Err(ApiError::nicht_gefunden("Student"));
    }

    // Eine zuvor mehrdeutige Kennung kann jetzt eindeutig sein
    verknuepfung::kennung_neu_verknuepfen(&state.db, &student.student_id).await?;

    tracing::info!(id = %id, student_id = %student.student_id, "Student geloescht");
    Ok(nachricht("Student geloescht"))
}
