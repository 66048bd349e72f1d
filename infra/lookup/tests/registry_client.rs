use orgdir_lookup::{LookupError, RegistryClient, RegistryClientConfig};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> RegistryClient {
    let config = RegistryClientConfig::new(format!("{}/api/cnpj/v1/", server.uri()))
        .timeout(Duration::from_millis(500))
        .user_agent("orgdir-tests");
    RegistryClient::new(config).expect("client build")
}

#[tokio::test]
async fn lookup_maps_registry_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cnpj/v1/11222333000181"))
        .and(header("user-agent", "orgdir-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cnpj": "11222333000181",
            "razao_social": "ACME COMERCIO LTDA",
            "nome_fantasia": "ACME",
            "descricao_situacao_cadastral": "ATIVA",
            "logradouro": "RUA DAS FLORES",
            "numero": "100",
            "bairro": "CENTRO",
            "municipio": "SAO PAULO",
            "uf": "SP",
            "capital_social": 1000
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server).lookup("11222333000181").await.expect("lookup");

    assert_eq!(profile.legal_name.as_deref(), Some("ACME COMERCIO LTDA"));
    assert_eq!(profile.trade_name.as_deref(), Some("ACME"));
    assert_eq!(profile.situation.as_deref(), Some("ATIVA"));
    assert_eq!(profile.city.as_deref(), Some("SAO PAULO"));
    assert_eq!(profile.state.as_deref(), Some("SP"));
    assert_eq!(profile.composed_address(), "RUA DAS FLORES, 100 - CENTRO");
}

#[tokio::test]
async fn unknown_company_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/cnpj/v1/11222333000181"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "CNPJ 11222333000181 não encontrado.",
            "type": "not_found"
        })))
        .mount(&server)
        .await;

    let err = client(&server).lookup("11222333000181").await.unwrap_err();
    assert!(matches!(err, LookupError::NotFound { ref identifier, .. } if identifier == "11222333000181"));
}

#[tokio::test]
async fn server_errors_surface_their_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server).lookup("11222333000181").await.unwrap_err();
    assert!(matches!(err, LookupError::Status { status: 503, .. }));
}

#[tokio::test]
async fn malformed_body_is_a_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server).lookup("11222333000181").await.unwrap_err();
    assert!(matches!(err, LookupError::Transport { .. }));
    assert!(err.to_string().contains("Malformed registry body"));
}

#[tokio::test]
async fn slow_registry_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = client(&server).lookup("11222333000181").await.unwrap_err();
    match err {
        LookupError::Transport { source, .. } => assert!(source.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_base_url_is_rejected() {
    let err = RegistryClient::new(RegistryClientConfig::new("  /")).unwrap_err();
    assert!(matches!(err, LookupError::Configuration { .. }));
}
