//! Request-Timing Middleware fuer Axum
//!
//! Misst die Antwortzeit jeder HTTP-Anfrage, protokolliert sie als
//! strukturiertes Log-Event und traegt sie in die Prometheus-Metriken ein.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{Request, Response},
    middleware::Next,
};
use std::time::Instant;

use crate::metrics::WohnheimMetriken;

/// Axum-Middleware-Funktion: misst Antwortzeit und loggt strukturiert.
///
/// Als Pfad-Label dient das Routen-Muster (`/api/students/:id`), damit die
/// Kardinalitaet der Metriken nicht mit den IDs waechst.
///
/// Verwendung:
/// ```ignore
/// Router::new()
///     .route("/", get(handler))
///     .layer(axum::middleware::from_fn_with_state(metriken, timing_middleware))
/// ```
pub async fn timing_middleware(
    State(metriken): State<WohnheimMetriken>,
    req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let methode = req.method().to_string();
    let pfad = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unbekannt".to_string());
    let start = Instant::now();

    let response = next.run(req).await;

    let dauer = start.elapsed();
    let status = response.status().as_u16();

    metriken
        .http_requests_total
        .with_label_values(&[&methode, &pfad, &status.to_string()])
        .inc();
    metriken
        .http_request_duration_seconds
        .with_label_values(&[&methode, &pfad])
        .observe(dauer.as_secs_f64());

    tracing::info!(
        method = %methode,
        path = %pfad,
        status = status,
        duration_ms = dauer.as_millis(),
        "HTTP-Anfrage abgeschlossen"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn anfrage_wird_mit_routenmuster_gezaehlt() {
        let metriken = WohnheimMetriken::neu().unwrap();
        let app = Router::new()
            .route("/items/:id", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                metriken.clone(),
                timing_middleware,
            ));

        let antwort = app
            .oneshot(Request::get("/items/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(antwort.status(), 200);

        let zaehler = metriken
            .http_requests_total
            .with_label_values(&["GET", "/items/:id", "200"])
            .get();
        assert_eq!(zaehler, 1);
    }
}
