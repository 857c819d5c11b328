use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub regions: RegionsConfig,
    pub security: SecurityConfig,
    pub registration: RegistrationConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Hosted backend (auth + `profiles` table).
///
/// `url = "mem://"` selects the in-process backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub timeout_seconds: u64,
    pub profiles_table: String,
}

/// Static asset root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub static_dir: PathBuf,
}

/// Region directory source; the embedded list is used when `path` is unset.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegionsConfig {
    pub path: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub session: SessionConfig,
}

/// Browser session cookie and server-side session cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure_cookie: bool,
    pub ttl_seconds: u64,
    pub cache_capacity: u64,
}

/// Registration form instances and the post-signup confirmation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub redirect_delay_seconds: u64,
    pub form_ttl_seconds: u64,
    pub form_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub path: Option<PathBuf>,
    pub filter: Option<String>,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 3000, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "mem://".to_owned(),
            anon_key: String::new(),
            timeout_seconds: 10,
            profiles_table: "profiles".to_owned(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { static_dir: PathBuf::from("public") }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "handy_session".to_owned(),
            secure_cookie: false,
            ttl_seconds: 3600,
            cache_capacity: 10_000,
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self { redirect_delay_seconds: 3, form_ttl_seconds: 1800, form_capacity: 10_000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), json: false, path: None, filter: None }
    }
}
