//! Dashboard-Kennzahlen
//!
//! Wardens bekommen globale Zaehlungen. Fuer Studenten wird dieselbe
//! Struktur aus dem eigenen, verknuepften Datensatz abgeleitet: jede
//! Zahl ist 0 oder 1.

use axum::{extract::State, http::HeaderMap, response::Json};
use chrono::Utc;
use wohnheim_auth::{Operation, Principal, Ressource};
use wohnheim_core::Sichtbereich;
use wohnheim_db::{
    models::{DashboardStats, StudentStatus, WartungsStatus, ZimmerStatus},
    BesucherRepository, DbResult, GebuehrRepository, SqliteDb, StudentRepository,
    WartungsRepository, ZimmerRepository,
};

use crate::error::ApiResult;
use crate::rest::AppState;

/// GET /api/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardStats>> {
    let zugriff = state
        .zugriff(&headers, Operation::Lesen, Ressource::Dashboard)
        .await?;

    let stats = match &zugriff.sichtbereich {
        Sichtbereich::Global => global(&state.db).await?,
        Sichtbereich::Eigentuemer(_) => einzeln(&state.db, &zugriff.principal).await?,
    };
    Ok(Json(stats))
}

async fn global(db: &SqliteDb) -> DbResult<DashboardStats> {
    let jetzt = Utc::now();
    Ok(DashboardStats {
        total_students: StudentRepository::count(db, None).await?,
        students_in: StudentRepository::count(db, Some(StudentStatus::In)).await?,
        students_out: StudentRepository::count(db, Some(StudentStatus::Out)).await?,
        total_rooms: ZimmerRepository::count(db, None).await?,
        occupied_rooms: ZimmerRepository::count(db, Some(ZimmerStatus::Occupied)).await?,
        available_rooms: ZimmerRepository::count(db, Some(ZimmerStatus::Available)).await?,
        maintenance_rooms: ZimmerRepository::count(db, Some(ZimmerStatus::Maintenance)).await?,
        pending_maintenance: WartungsRepository::count(
            db,
            &Sichtbereich::Global,
            WartungsStatus::Pending,
        )
        .await?,
        overdue_fees: GebuehrRepository::count_overdue(db, &Sichtbereich::Global, jetzt).await?,
        active_visitors: BesucherRepository::count_active(db, &Sichtbereich::Global).await?,
    })
}

async fn einzeln(db: &SqliteDb, principal: &Principal) -> DbResult<DashboardStats> {
    let Some(record_id) = principal.student_record_id else {
        tracing::debug!(principal = %principal.id, "Kein verknuepfter Datensatz, leeres Dashboard");
        return Ok(DashboardStats::default());
    };
    let sicht = Sichtbereich::Global;
    let Some(student) = StudentRepository::get(db, record_id, &sicht).await? else {
        return Ok(DashboardStats::default());
    };

    let zimmer = match student.room_number.as_deref() {
        Some(nummer) => ZimmerRepository::get_by_number(db, nummer).await?,
        None => None,
    };
    let zimmer_status = zimmer.as_ref().map(|z| z.status);

    let eigene = Sichtbereich::Eigentuemer(student.student_id.clone());
    let jetzt = Utc::now();

    Ok(DashboardStats {
        total_students: 1,
        students_in: flag(student.status == StudentStatus::In),
        students_out: flag(student.status == StudentStatus::Out),
        total_rooms: flag(zimmer.is_some()),
        occupied_rooms: flag(zimmer_status == Some(ZimmerStatus::Occupied)),
        available_rooms: flag(zimmer_status == Some(ZimmerStatus::Available)),
        maintenance_rooms: flag(zimmer_status == Some(ZimmerStatus::Maintenance)),
        pending_maintenance: flag(
            WartungsRepository::count(db, &eigene, WartungsStatus::Pending).await? > 0,
        ),
        overdue_fees: flag(GebuehrRepository::count_overdue(db, &eigene, jetzt).await? > 0),
        active_visitors: flag(BesucherRepository::count_active(db, &eigene).await? > 0),
    })
}

fn flag(bedingung: bool) -> i64 {
    i64::from(bedingung)
}
