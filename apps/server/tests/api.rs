use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use orgdir::domain::config::{ApiConfig, StorageEngine};
use orgdir::features::registration::Registration;
use orgdir::storage::MemoryStore;
use orgdir_server::Server;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID: &str = "11222333000181";

async fn registry() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/cnpj/v1/{VALID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "razao_social": "ACME COMERCIO LTDA",
            "nome_fantasia": "ACME",
            "descricao_situacao_cadastral": "ATIVA",
            "logradouro": "RUA DAS FLORES",
            "numero": "100",
            "bairro": "CENTRO",
            "municipio": "SAO PAULO",
            "uf": "SP"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(10)
        .mount(&server)
        .await;
    server
}

fn config(registry: &MockServer) -> ApiConfig {
    let mut cfg = ApiConfig::default();
    cfg.registry.base_url = format!("{}/cnpj/v1", registry.uri());
    cfg.storage.engine = StorageEngine::Memory;
    cfg
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn submit(identifier: &str) -> Request<Body> {
    let body = json!({
        "identifier": identifier,
        "legalName": "Acme Comercio Ltda",
        "tradeName": "Acme",
        "email": "contato@acme.example",
        "city": "Sao Paulo",
        "state": "SP"
    });
    Request::post("/api/registrations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn directory() -> Request<Body> {
    Request::get("/api/directory").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn registration_to_directory_end_to_end() {
    let registry = registry().await;
    let server = Server::builder().config(config(&registry)).build().await.unwrap();
    let app = server.router();

    let (status, body) = call(&app, submit("11.222.333/0001-81")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["registryData"]["legalName"], "ACME COMERCIO LTDA");
    assert_eq!(body["record"]["registryData"]["address"], "RUA DAS FLORES, 100 - CENTRO");

    let (status, body) = call(&app, directory()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["records"], json!([]));

    let slice = server.state().try_get_slice::<Registration>().unwrap();
    slice.registrations.approve(VALID).await.unwrap();

    let (_, body) = call(&app, directory()).await;
    assert_eq!(body["records"][0]["identifier"], VALID);
    assert_eq!(body["records"][0]["status"], "approved");

    let (status, body) = call(&app, submit(VALID)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Organization already registered");
}

#[tokio::test]
async fn unknown_company_is_not_admitted() {
    let registry = registry().await;
    let storage = Arc::new(MemoryStore::new());
    let server = Server::builder()
        .config(config(&registry))
        .storage(storage.clone())
        .build()
        .await
        .unwrap();

    let (status, body) = call(&server.router(), submit("11444777000161")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Tax identifier could not be verified with the registry");
    assert_eq!(storage.len().await, 0);
}

#[tokio::test]
async fn filesystem_engine_persists_across_restarts() {
    let registry = registry().await;
    let data = tempfile::tempdir().unwrap();
    let mut cfg = config(&registry);
    cfg.storage.engine = StorageEngine::Filesystem;
    cfg.storage.data_dir = data.path().join("data");

    let first = Server::builder().config(cfg.clone()).build().await.unwrap();
    let (status, _) = call(&first.router(), submit(VALID)).await;
    assert_eq!(status, StatusCode::CREATED);
    drop(first);

    let second = Server::builder().config(cfg).build().await.unwrap();
    let (status, _) = call(&second.router(), submit(VALID)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn health_and_api_reference_are_served() {
    let registry = registry().await;
    let app = Server::builder().config(config(&registry)).build().await.unwrap().router();

    let (status, body) = call(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let response = app.oneshot(Request::get("/api").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_ssl_files_fail_the_build() {
    let registry = registry().await;
    let mut cfg = config(&registry);
    cfg.server.ssl = Some(orgdir::domain::config::SslConfig {
        cert: "/nonexistent/cert.pem".into(),
        key: "/nonexistent/key.pem".into(),
    });

    let err = Server::builder().config(cfg).build().await.unwrap_err();
    assert!(err.to_string().contains("SSL certificate not found"));
}
