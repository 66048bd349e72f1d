//! Organization self-registration.
//!
//! A submission is admitted as `pending` once its CNPJ is structurally valid,
//! confirmed by the external company registry and not already on file. The public
//! [`Directory`] lists only registrations that were subsequently approved.
//!
//! ```rust
//! use orgdir_registration::identifier;
//!
//! assert!(identifier::validate("11.222.333/0001-81"));
//! ```

mod directory;
mod error;
pub mod identifier;
mod store;
mod verifier;
mod workflow;

#[cfg(feature = "server")]
pub mod server;

pub use directory::Directory;
pub use error::{AdmissionError, AdmissionErrorExt};
pub use identifier::{IdentifierError, TaxId};
pub use store::{RegistrationStore, storage_key};
pub use verifier::{RegistryVerifier, Verification};
pub use workflow::Registrations;

use orgdir_kernel::domain::config::ApiConfig;
use orgdir_kernel::domain::registry::InitializedSlice;
use orgdir_lookup::{LookupError, RegistryClient, RegistryClientConfig};
use orgdir_storage::KeyValueStore;
use std::sync::Arc;
use std::time::Duration;

/// Registration feature state.
#[orgdir_derive::orgdir_slice]
pub struct Registration {
    pub registrations: Registrations,
    pub directory: Directory,
}

/// Wires the slice over `storage`, verifying identifiers against the configured registry.
///
/// # Errors
/// Returns [`LookupError::Configuration`] when the registry client cannot be built.
pub fn init(
    config: &ApiConfig,
    storage: Arc<dyn KeyValueStore>,
) -> Result<InitializedSlice, LookupError> {
    let registry = &config.registry;
    let mut client_config = RegistryClientConfig::new(&registry.base_url)
        .timeout(Duration::from_secs(registry.timeout_secs));
    if let Some(user_agent) = &registry.user_agent {
        client_config = client_config.user_agent(user_agent);
    }

    let client = RegistryClient::new(client_config)?;
    tracing::info!(registry = client.base_url(), "Registration slice initialized");

    Ok(InitializedSlice::new(slice(storage, Arc::new(client))))
}

/// Builds the slice from explicit collaborators.
pub fn slice(storage: Arc<dyn KeyValueStore>, verifier: Arc<dyn RegistryVerifier>) -> Registration {
    let store = RegistrationStore::new(storage);

    Registration::new(RegistrationInner {
        registrations: Registrations::new(store.clone(), verifier),
        directory: Directory::new(store),
    })
}
