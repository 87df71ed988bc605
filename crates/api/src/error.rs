//! Fehlertypen der REST-Schnittstelle und ihre HTTP-Abbildung

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use wohnheim_auth::AuthError;
use wohnheim_db::DbError;

use crate::rest::middleware::fehler_antwort;

/// Alle Fehler, die ein Handler zurueckgeben kann
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Ungueltige Anmeldedaten")]
    NichtAutorisiert,

    #[error("Zugriff verweigert")]
    Verboten,

    #[error("{0}")]
    Konflikt(String),

    #[error("{0} nicht gefunden")]
    NichtGefunden(String),

    #[error("{0}")]
    UngueltigeEingabe(String),

    /// Detail nur fuers Log, der Client sieht eine generische Meldung
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn nicht_gefunden(was: impl Into<String>) -> Self {
        Self::NichtGefunden(was.into())
    }

    pub fn ungueltige_eingabe(msg: impl Into<String>) -> Self {
        Self::UngueltigeEingabe(msg.into())
    }

    /// HTTP-Statuscode fuer REST-Fehler
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NichtAutorisiert => StatusCode::UNAUTHORIZED,
            Self::Verboten => StatusCode::FORBIDDEN,
            Self::Konflikt(_) => StatusCode::CONFLICT,
            Self::NichtGefunden(_) => StatusCode::NOT_FOUND,
            Self::UngueltigeEingabe(_) => StatusCode::BAD_REQUEST,
            Self::Intern(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Konflikt(feld) => Self::Konflikt(feld.to_string()),
            AuthError::NichtAutorisiert => Self::NichtAutorisiert,
            AuthError::Verboten => Self::Verboten,
            AuthError::UngueltigeEingabe(msg) => Self::UngueltigeEingabe(msg),
            AuthError::Datenbank(db) => db.into(),
            AuthError::PasswortHashing(_) | AuthError::Token(_) | AuthError::Intern(_) => {
                Self::Intern(e.to_string())
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NichtGefunden(was) => Self::NichtGefunden(was),
            DbError::ZimmerVoll => Self::UngueltigeEingabe("Zimmer ist voll belegt".into()),
            DbError::Eindeutigkeit { feld } => Self::Konflikt(format!("{feld} bereits vergeben")),
            DbError::UngueltigeDaten(_)
            | DbError::Sqlx(_)
            | DbError::Migration(_)
            | DbError::Intern(_) => Self::Intern(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::UngueltigeEingabe(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::UngueltigeEingabe(e.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::UngueltigeEingabe(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if let Self::Intern(detail) = &self {
            tracing::error!(fehler = %detail, "Interner Fehler bei Anfrage");
            return fehler_antwort(status, "Interner Serverfehler");
        }
        fehler_antwort(status, &self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wohnheim_auth::KonfliktFeld;

    #[test]
    fn auth_fehler_auf_status() {
        let faelle = [
            (AuthError::Konflikt(KonfliktFeld::Email), StatusCode::CONFLICT),
            (AuthError::NichtAutorisiert, StatusCode::UNAUTHORIZED),
            (AuthError::Verboten, StatusCode::FORBIDDEN),
            (AuthError::ungueltige_eingabe("x"), StatusCode::BAD_REQUEST),
            (AuthError::intern("kaputt"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (fehler, status) in faelle {
            assert_eq!(ApiError::from(fehler).http_status(), status);
        }
    }

    #[test]
    fn db_fehler_auf_status() {
        assert_eq!(ApiError::from(DbError::ZimmerVoll).http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(DbError::nicht_gefunden("Zimmer")).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DbError::intern("x")).http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn konflikt_meldung_nennt_feld() {
        let e = ApiError::from(AuthError::Konflikt(KonfliktFeld::Benutzername));
        assert_eq!(e.to_string(), "Benutzername bereits registriert");
    }
}
