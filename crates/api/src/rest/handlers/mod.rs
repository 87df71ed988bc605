//! REST-Handler Module

pub mod auth;
pub mod dashboard;
pub mod fees;
pub mod maintenance;
pub mod movements;
pub mod rooms;
pub mod students;
pub mod visitors;

use axum::response::Json;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};

/// Einfache Erfolgsmeldung `{"message": …}`
pub(crate) fn nachricht(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

/// Prueft dass ein Pflichtfeld nicht leer ist
pub(crate) fn pflichtfeld(feld: &str, wert: &str) -> ApiResult<()> {
    if wert.trim().is_empty() {
        return Err(ApiError::ungueltige_eingabe(format!("{feld} darf nicht leer sein")));
    }
    Ok(())
}
