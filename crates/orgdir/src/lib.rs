//! Facade crate for the organization directory.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `orgdir` with the `server` feature.
//! - Call `orgdir::init` to register feature slices, then merge
//!   [`server::router`] routers into the application.

pub use orgdir_domain as domain;
use orgdir_domain::config::ApiConfig;
use orgdir_domain::registry::InitializedSlice;
pub use orgdir_kernel as kernel;
pub use orgdir_storage as storage;
use orgdir_storage::KeyValueStore;
use std::sync::Arc;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use orgdir_kernel::server::router::system_router;
        pub use orgdir_registration::server::registration_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use orgdir_registration as registration;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "registration",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices over the shared key-value `storage`.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
    storage: Arc<dyn KeyValueStore>,
) -> Result<Vec<InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    let mut slices = Vec::new();

    // Registration & directory
    slices.push(features::registration::init(config, storage)?);

    tracing::debug!(count = slices.len(), "Feature slices initialized");
    Ok(slices)
}
