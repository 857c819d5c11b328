use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `HANDY__BACKEND__URL`.
pub const ENV_PREFIX: &str = "HANDY";
/// Config file used when no path is given (`server.toml`, `server.json`, ...).
pub const DEFAULT_CONFIG_FILE: &str = "server";

#[handy_derive::handy_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads `T` from a required config file overlaid with `HANDY__*` environment variables.
///
/// Nested keys use a double underscore: `HANDY__SECURITY__SESSION__TTL_SECONDS=600`
/// sets `security.session.ttl_seconds`. The file extension may be omitted.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing or the merged
/// values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use handy_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     port: u16,
/// }
///
/// let settings: Settings = load_config(Some("config/local")).unwrap_or_default();
/// # let _ = settings.port;
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());
    info!(path = %path.display(), "Loading configuration");

    Config::builder()
        .add_source(File::from(path.as_path()).required(true))
        .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"))
        .build()
        .context(format!("Reading {}", path.display()))?
        .try_deserialize::<T>()
        .context("Deserializing configuration")
}
