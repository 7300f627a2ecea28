use crate::infra::{AppState, RatingRegistry};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use park_rating::error::AppError;
use park_rating::park::ParkState;
use park_rating::rating::RatingReport;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub(crate) struct ParkRatingResponse {
    pub(crate) park_id: String,
    pub(crate) changed: bool,
    #[serde(flatten)]
    pub(crate) report: RatingReport,
}

/// Rating endpoints, backed by `registry`.
pub(crate) fn rating_router(registry: RatingRegistry) -> Router {
    Router::new()
        .route(
            "/api/v1/parks/{park_id}/rating",
            post(recalculate_handler)
                .get(report_handler)
                .delete(forget_handler),
        )
        .with_state(registry)
}

pub(crate) fn with_service_routes(registry: RatingRegistry) -> Router {
    rating_router(registry)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn recalculate_handler(
    State(registry): State<RatingRegistry>,
    Path(park_id): Path<String>,
    body: Bytes,
) -> Result<Json<ParkRatingResponse>, AppError> {
    let park = ParkState::from_reader(body.as_ref())?;
    let (changed, report) = registry.recalculate(&park_id, &park);
    Ok(Json(ParkRatingResponse {
        park_id,
        changed,
        report,
    }))
}

pub(crate) async fn report_handler(
    State(registry): State<RatingRegistry>,
    Path(park_id): Path<String>,
) -> Response {
    match registry.report(&park_id) {
        Some(report) => Json(ParkRatingResponse {
            park_id,
            changed: false,
            report,
        })
        .into_response(),
        None => unknown_park(&park_id),
    }
}

pub(crate) async fn forget_handler(
    State(registry): State<RatingRegistry>,
    Path(park_id): Path<String>,
) -> Response {
    if registry.forget(&park_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        unknown_park(&park_id)
    }
}

fn unknown_park(park_id: &str) -> Response {
    let payload = json!({
        "error": format!("park '{park_id}' has not been rated"),
    });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn post_rating(park_id: &str, payload: Value) -> Request<Body> {
        Request::post(format!("/api/v1/parks/{park_id}/rating"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).expect("encode")))
            .expect("request builds")
    }

    fn rating_request(method: &str, park_id: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(format!("/api/v1/parks/{park_id}/rating"))
            .body(Body::empty())
            .expect("request builds")
    }

    #[tokio::test]
    async fn posting_state_returns_breakdown() {
        let router = rating_router(RatingRegistry::default());

        let response = router
            .oneshot(post_rating(
                "sunny-meadows",
                json!({ "guest_count": 1310, "difficult_park_rating": true }),
            ))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["park_id"], "sunny-meadows");
        assert_eq!(body["changed"], true);
        assert_eq!(body["total"], 0);
        assert_eq!(body["rating_label"], "Current park rating: 0/999");
        assert_eq!(body["effects"][0]["name"], "Guests");
        assert_eq!(body["effects"][0]["impact_label"], "+100");
        let last = body["effects"]
            .as_array()
            .and_then(|effects| effects.last())
            .expect("effects listed");
        assert_eq!(last["name"], "Difficulty");
        assert_eq!(last["tone"], "negative");
    }

    #[tokio::test]
    async fn repeated_state_reports_no_change() {
        let registry = RatingRegistry::default();
        let payload = json!({ "casualty_penalty": 75 });

        let first = rating_router(registry.clone())
            .oneshot(post_rating("alpha", payload.clone()))
            .await
            .expect("route responds");
        assert_eq!(read_json_body(first).await["changed"], true);

        let second = rating_router(registry)
            .oneshot(post_rating("alpha", payload))
            .await
            .expect("route responds");
        let body = read_json_body(second).await;
        assert_eq!(body["changed"], false);
        assert_eq!(body["total"], -75);
    }

    #[tokio::test]
    async fn unknown_park_reports_not_found() {
        let router = rating_router(RatingRegistry::default());

        let response = router
            .oneshot(rating_request("GET", "nowhere"))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_forgets_park() {
        let registry = RatingRegistry::default();
        registry.recalculate("alpha", &ParkState::default());

        let response = rating_router(registry.clone())
            .oneshot(rating_request("DELETE", "alpha"))
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = rating_router(registry)
            .oneshot(rating_request("DELETE", "alpha"))
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_state_is_rejected() {
        let router = rating_router(RatingRegistry::default());

        let response = router
            .oneshot(post_rating("alpha", json!({ "guests": 12 })))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("park state error")));
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let readiness = Arc::new(AtomicBool::new(false));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_service_routes(RatingRegistry::default()).layer(Extension(state));

        let response = router
            .clone()
            .oneshot(
                Request::get("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        readiness.store(true, std::sync::atomic::Ordering::Release);
        let response = router
            .oneshot(
                Request::get("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
