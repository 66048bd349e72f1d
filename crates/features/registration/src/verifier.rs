use crate::identifier::TaxId;
use async_trait::async_trait;
use orgdir_domain::registration::RegistryData;
use orgdir_lookup::{CompanyProfile, RegistryClient};
use tracing::{debug, warn};

/// Outcome of asking the registry about an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    pub valid: bool,
    /// Present only when `valid`.
    pub registry_data: Option<RegistryData>,
}

impl Verification {
    #[must_use]
    pub const fn rejected() -> Self {
        Self { valid: false, registry_data: None }
    }

    #[must_use]
    pub const fn confirmed(data: RegistryData) -> Self {
        Self { valid: true, registry_data: Some(data) }
    }
}

/// Confirms that an identifier belongs to a registered company.
///
/// Implementations never fail: any lookup problem, including a response
/// without a legal name, is reported as [`Verification::rejected`].
#[async_trait]
pub trait RegistryVerifier: Send + Sync + std::fmt::Debug {
    async fn verify(&self, identifier: &TaxId) -> Verification;
}

#[async_trait]
impl RegistryVerifier for RegistryClient {
    async fn verify(&self, identifier: &TaxId) -> Verification {
        match self.lookup(identifier.as_str()).await {
            Ok(profile) if profile.legal_name.as_deref().is_none_or(|name| name.trim().is_empty()) => {
                warn!(identifier = identifier.as_str(), "Registry returned no company data");
                Verification::rejected()
            },
            Ok(profile) => {
                debug!(identifier = identifier.as_str(), "Registry confirmed identifier");
                Verification::confirmed(registry_data(profile))
            },
            Err(err) => {
                warn!(identifier = identifier.as_str(), error = %err, "Registry verification failed");
                Verification::rejected()
            },
        }
    }
}

fn registry_data(profile: CompanyProfile) -> RegistryData {
    let address = profile.composed_address();
    RegistryData {
        legal_name: profile.legal_name.unwrap_or_default(),
        trade_name: profile.trade_name.unwrap_or_default(),
        situation: profile.situation.unwrap_or_default(),
        address,
        city: profile.city.unwrap_or_default(),
        state: profile.state.unwrap_or_default(),
    }
}
