use serde::Deserialize;

/// Company record as published by the registry.
///
/// Field names follow the registry's wire format. Every field is optional so that
/// sparse records still decode; callers decide what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompanyProfile {
    #[serde(rename = "razao_social")]
    pub legal_name: Option<String>,
    #[serde(rename = "nome_fantasia")]
    pub trade_name: Option<String>,
    #[serde(rename = "descricao_situacao_cadastral")]
    pub situation: Option<String>,
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(rename = "bairro")]
    pub district: Option<String>,
    #[serde(rename = "municipio")]
    pub city: Option<String>,
    #[serde(rename = "uf")]
    pub state: Option<String>,
}

impl CompanyProfile {
    /// Single-line address: `street, number - district`. Missing parts render empty.
    #[must_use]
    pub fn composed_address(&self) -> String {
        let part = |value: &Option<String>| value.as_deref().unwrap_or_default().trim().to_owned();
        format!("{}, {} - {}", part(&self.street), part(&self.number), part(&self.district))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_address_follows_registry_layout() {
        let profile = CompanyProfile {
            street: Some("Rua das Flores".into()),
            number: Some("100".into()),
            district: Some("Centro".into()),
            ..CompanyProfile::default()
        };
        assert_eq!(profile.composed_address(), "Rua das Flores, 100 - Centro");
    }

    #[test]
    fn sparse_payloads_decode() {
        let profile: CompanyProfile =
            serde_json::from_str(r#"{"razao_social":"ACME LTDA","cnpj":"11222333000181"}"#).unwrap();
        assert_eq!(profile.legal_name.as_deref(), Some("ACME LTDA"));
        assert_eq!(profile.city, None);
        assert_eq!(profile.composed_address(), ",  - ");
    }
}
