use super::ApiState;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use orgdir_derive::{api_handler, api_model};
use orgdir_domain::constants::SYSTEM_TAG;

/// Liveness report.
#[api_model]
pub(super) struct HealthResponse {
    /// Always `up` while the process serves requests.
    status: &'static str,
    version: &'static str,
    /// Seconds since the server state was built.
    uptime: u64,
}

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Service is up", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.uptime().as_secs(),
    };

    ([(header::CACHE_CONTROL, "no-store")], Json(body))
}

#[cfg(test)]
mod tests {
    use super::super::ApiState;
    use super::super::router::system_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use orgdir_domain::config::ApiConfig;
    use std::time::{Duration, Instant};
    use tower::ServiceExt;

    async fn health(state: ApiState) -> (StatusCode, String, serde_json::Value) {
        let (router, _) = system_router().split_for_parts();
        let response = router
            .with_state(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let cache = response.headers()["cache-control"].to_str().unwrap().to_owned();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, cache, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_up_and_is_never_cached() {
        let state = ApiState::builder().config(ApiConfig::default()).build().unwrap();

        let (status, cache, body) = health(state).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache, "no-store");
        assert_eq!(body["status"], "up");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn uptime_counts_from_state_construction() {
        let started = Instant::now().checked_sub(Duration::from_secs(42)).unwrap();
        let state =
            ApiState::builder().config(ApiConfig::default()).started_at(started).build().unwrap();

        // The very first request already sees the elapsed time.
        let (_, _, body) = health(state).await;

        assert!(body["uptime"].as_u64().unwrap() >= 42, "{body}");
    }
}
