use orgdir_lookup::{RegistryClient, RegistryClientConfig};
use orgdir_registration::{RegistryVerifier, TaxId};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> RegistryClient {
    RegistryClient::new(RegistryClientConfig::new(format!("{}/cnpj/v1", server.uri()))).unwrap()
}

fn id() -> TaxId {
    TaxId::parse("11222333000181").unwrap()
}

#[tokio::test]
async fn confirmed_lookup_yields_enrichment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cnpj/v1/11222333000181"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cnpj": "11222333000181",
            "razao_social": "ACME COMERCIO LTDA",
            "nome_fantasia": "ACME",
            "descricao_situacao_cadastral": "ATIVA",
            "logradouro": "RUA DAS FLORES",
            "numero": "100",
            "bairro": "CENTRO",
            "municipio": "SAO PAULO",
            "uf": "SP"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let verification = client(&server).await.verify(&id()).await;

    assert!(verification.valid);
    let data = verification.registry_data.unwrap();
    assert_eq!(data.legal_name, "ACME COMERCIO LTDA");
    assert_eq!(data.address, "RUA DAS FLORES, 100 - CENTRO");
    assert_eq!(data.state, "SP");
}

#[tokio::test]
async fn registry_failures_are_swallowed() {
    for response in [
        ResponseTemplate::new(404),
        ResponseTemplate::new(500),
        ResponseTemplate::new(200).set_body_string("<html>"),
        ResponseTemplate::new(200).set_body_json(json!({})),
        ResponseTemplate::new(200).set_body_json(json!({ "razao_social": "  ", "uf": "SP" })),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(response).mount(&server).await;

        let verification = client(&server).await.verify(&id()).await;

        assert!(!verification.valid);
        assert_eq!(verification.registry_data, None);
    }
}

#[tokio::test]
async fn unreachable_registry_is_not_verified() {
    let server = MockServer::start().await;
    let client = client(&server).await;
    drop(server);

    assert!(!client.verify(&id()).await.valid);
}
