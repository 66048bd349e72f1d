//! Client for the external company registry.
//!
//! The registry is the authority on whether a tax identifier belongs to a real,
//! registered company. [`RegistryClient::lookup`] returns its [`CompanyProfile`].
//!
//! ```rust,no_run
//! use orgdir_lookup::{RegistryClient, RegistryClientConfig};
//!
//! # async fn run() -> Result<(), orgdir_lookup::LookupError> {
//! let client = RegistryClient::new(RegistryClientConfig::new("https://brasilapi.com.br/api/cnpj/v1"))?;
//! let profile = client.lookup("11222333000181").await?;
//! println!("{}", profile.composed_address());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod profile;

pub use client::{RegistryClient, RegistryClientConfig};
pub use error::{LookupError, LookupErrorExt};
pub use profile::CompanyProfile;
