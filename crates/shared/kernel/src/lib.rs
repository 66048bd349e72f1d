//! Kernel utilities shared across slices: layered configuration loading and, with the
//! `server` feature, the API state container and the system router.
//!
//! ```rust,ignore
//! use orgdir_kernel::config::load_config;
//! use orgdir_kernel::domain::config::ApiConfig;
//!
//! let cfg: ApiConfig = load_config(Some("server"))?;
//! ```

pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use orgdir_domain as domain;
