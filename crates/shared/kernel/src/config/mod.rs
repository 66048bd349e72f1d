use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `ORGDIR__REGISTRY__TIMEOUT_SECS=5`.
pub const ENV_PREFIX: &str = "ORGDIR";

#[orgdir_derive::orgdir_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a base file overlaid with `ORGDIR__`-prefixed environment variables.
///
/// The base file defaults to `server` in the working directory; its extension may be
/// omitted and any format supported by the `config` crate is accepted. Nested keys use
/// `__` as separator (`ORGDIR__SERVER__PORT` maps to `server.port`).
///
/// # Errors
/// Returns [`ConfigError::Config`] when the base file is missing or the merged
/// sources do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use orgdir_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());
    info!("Loading config from {}", path.display());

    load_with_env(&path, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load_with_env<T>(path: &Path, env: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(env)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
