//! Extraktoren mit einheitlicher Fehlerantwort
//!
//! Wie `axum::Json`, `Query` und `Path`, aber Ablehnungen werden zu
//! [`ApiError::UngueltigeEingabe`] (400 mit JSON-Fehlerkoerper).

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use crate::error::ApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PfadParam<T>(pub T);
