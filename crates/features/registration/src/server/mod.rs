//! HTTP surface of the registration slice.

mod handlers;
mod response;

pub use response::{DirectoryListing, ErrorResponse, RegistrationAccepted};

use orgdir_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// `POST /api/registrations` and `GET /api/directory`.
///
/// Any other method on these paths is answered with `405 Method Not Allowed`.
pub fn registration_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::register_handler))
        .routes(routes!(handlers::directory_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RegistryVerifier, TaxId, Verification, slice};
    use async_trait::async_trait;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use orgdir_domain::config::ApiConfig;
    use orgdir_domain::registration::RegistryData;
    use orgdir_domain::registry::InitializedSlice;
    use orgdir_storage::{KeyValueStore, MemoryStore, StorageError};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct AcceptAll;

    #[async_trait]
    impl RegistryVerifier for AcceptAll {
        async fn verify(&self, _identifier: &TaxId) -> Verification {
            Verification::confirmed(RegistryData { situation: "ATIVA".into(), ..RegistryData::default() })
        }
    }

    #[derive(Debug)]
    struct Unavailable;

    #[async_trait]
    impl KeyValueStore for Unavailable {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError::InvalidKey { message: "offline".into(), context: None })
        }

        async fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey { message: "offline".into(), context: None })
        }

        async fn keys(&self, _prefix: &str) -> Result<Vec<String>, StorageError> {
            Err(StorageError::InvalidKey { message: "offline".into(), context: None })
        }
    }

    fn app(kv: Arc<dyn KeyValueStore>) -> Router {
        let state = ApiState::builder()
            .config(ApiConfig::default())
            .register_slice(InitializedSlice::new(slice(kv, Arc::new(AcceptAll))))
            .build()
            .unwrap();
        let (router, _) = registration_router().split_for_parts();
        router.with_state(state)
    }

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::post("/api/registrations")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn submission(identifier: &str) -> String {
        json!({
            "identifier": identifier,
            "legalName": "Acme Comercio Ltda",
            "email": "contato@acme.example",
            "registeredAt": "1999-01-01T00:00:00Z",
            "status": "approved"
        })
        .to_string()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn admission_returns_created_with_the_record() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(post(submission("11.222.333/0001-81")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Registration received and pending approval");
        assert_eq!(body["record"]["identifier"], "11222333000181");
        assert_eq!(body["record"]["status"], "pending");
        assert_eq!(body["record"]["registryData"]["situation"], "ATIVA");
        assert_ne!(body["record"]["registeredAt"], "1999-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn rejections_map_to_client_errors() {
        let app = app(Arc::new(MemoryStore::new()));

        let response = app.clone().oneshot(post(r#"{"identifier":"11222333000181"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Missing required fields: legalName, email");

        let response = app.clone().oneshot(post(submission("11222333000180"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid tax identifier");

        let response = app.clone().oneshot(post("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Malformed request body");

        let first = app.clone().oneshot(post(submission("11222333000181"))).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = app.oneshot(post(submission("11222333000181"))).await.unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(second).await["error"], "Organization already registered");
    }

    #[tokio::test]
    async fn storage_failure_is_a_generic_server_error() {
        let response = app(Arc::new(Unavailable))
            .oneshot(post(submission("11222333000181")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Internal error, please try again later");
    }

    #[tokio::test]
    async fn directory_is_cacheable_and_lists_only_approved() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(
            "entity-11444777000161",
            br#"{"identifier":"11444777000161","legalName":"Listed","status":"approved"}"#,
        )
        .await
        .unwrap();
        let app = app(kv);
        app.clone().oneshot(post(submission("11222333000181"))).await.unwrap();

        let response = app
            .oneshot(Request::get("/api/directory").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=300");
        let body = json_body(response).await;
        assert_eq!(body["records"].as_array().unwrap().len(), 1);
        assert_eq!(body["records"][0]["legalName"], "Listed");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn directory_failure_returns_empty_records() {
        let response = app(Arc::new(Unavailable))
            .oneshot(Request::get("/api/directory").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::CACHE_CONTROL).is_none());
        assert_eq!(json_body(response).await, json!({ "records": [], "error": "Failed to load directory" }));
    }

    #[tokio::test]
    async fn other_methods_are_not_allowed() {
        let app = app(Arc::new(MemoryStore::new()));

        let get = Request::get("/api/registrations").body(Body::empty()).unwrap();
        assert_eq!(app.clone().oneshot(get).await.unwrap().status(), StatusCode::METHOD_NOT_ALLOWED);

        let post = Request::post("/api/directory").body(Body::empty()).unwrap();
        assert_eq!(app.oneshot(post).await.unwrap().status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
