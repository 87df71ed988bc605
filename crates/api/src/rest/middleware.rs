//! Authorization-Header und einheitliche Fehlerkoerper

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// `{"error":{"code":…,"message":…}}`
pub fn fehler_antwort(status: StatusCode, nachricht: &str) -> Response {
    let body = json!({
        "error": { "code": status.as_u16(), "message": nachricht }
    });
    (status, Json(body)).into_response()
}

/// Token aus `Authorization: Bearer <token>`; das Schema ist case-insensitiv
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let wert = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (schema, token) = wert.split_once(' ')?;
    if !schema.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}
