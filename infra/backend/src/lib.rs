//! # Backend
//!
//! The hosted backend-as-a-service behind the web front-end: managed
//! authentication plus a row-based `profiles` table.
//!
//! Slices never talk HTTP themselves. They receive a [`Backend`] whose two
//! halves, [`AccountService`] and [`ProfileRepository`], are trait objects so
//! tests and local development can swap in the [`MemoryBackend`].
//!
//! ## Example
//!
//! ```rust
//! use handy_backend::{Backend, BackendError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), BackendError> {
//!     let backend = Backend::builder().url("mem://").init()?;
//!
//!     let created = backend.accounts().create_account("ada@example.com", "secret-1").await?;
//!     assert!(created.account_id.is_some());
//!     Ok(())
//! }
//! ```

mod error;
mod hosted;
mod memory;

pub use crate::error::{BackendError, BackendErrorExt};
pub use crate::hosted::HostedBackend;
pub use crate::memory::{CallCounts, MemoryBackend};

use async_trait::async_trait;
use handy_domain::account::{AccountId, CreatedAccount, NewProfile, Profile, Session};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Scheme selecting the in-process backend.
pub const MEMORY_URL: &str = "mem://";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_PROFILES_TABLE: &str = "profiles";

/// Managed authentication.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an account. An `Ok` without an id means the provider accepted the
    /// request but has no usable account yet.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<CreatedAccount, BackendError>;

    /// Exchanges credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Resolves the account behind an access token; `None` when the token is no
    /// longer accepted.
    async fn current_account(&self, access_token: &str)
    -> Result<Option<AccountId>, BackendError>;
}

/// The `profiles` table.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Inserts a profile, authorizing as the new account when the signup
    /// handed out a token.
    async fn create_profile(
        &self,
        profile: &NewProfile,
        access_token: Option<&str>,
    ) -> Result<(), BackendError>;

    /// Reads a profile, authorizing as the account owner when a token is given.
    async fn read_profile(
        &self,
        id: &AccountId,
        access_token: Option<&str>,
    ) -> Result<Option<Profile>, BackendError>;
}

/// Injected backend handle, cheap to clone.
#[derive(Clone)]
pub struct Backend {
    accounts: Arc<dyn AccountService>,
    profiles: Arc<dyn ProfileRepository>,
    kind: &'static str,
}

impl Backend {
    /// Creates a new [`BackendBuilder`].
    pub fn builder() -> BackendBuilder {
        BackendBuilder::default()
    }

    /// Assembles a backend from explicit collaborators.
    pub fn from_parts(
        accounts: Arc<dyn AccountService>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self { accounts, profiles, kind: "custom" }
    }

    /// Wraps a shared in-memory backend, keeping the caller's handle usable for assertions.
    pub fn memory(backend: Arc<MemoryBackend>) -> Self {
        Self { accounts: backend.clone(), profiles: backend, kind: "memory" }
    }

    #[must_use]
    pub fn accounts(&self) -> &dyn AccountService {
        self.accounts.as_ref()
    }

    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileRepository {
        self.profiles.as_ref()
    }

    /// `memory`, `hosted` or `custom`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Fluent configuration for [`Backend`].
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct BackendBuilder {
    url: Option<String>,
    anon_key: Option<String>,
    timeout: Option<Duration>,
    profiles_table: Option<String>,
}

impl BackendBuilder {
    /// Project URL, or `mem://` for the in-process backend.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Public (anon) API key sent with every request.
    pub fn anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn profiles_table(mut self, table: impl Into<String>) -> Self {
        self.profiles_table = Some(table.into());
        self
    }

    /// Builds the backend selected by the URL scheme.
    ///
    /// # Errors
    /// * [`BackendError::Validation`] if the URL is missing or unsupported, or a
    ///   hosted URL comes without an anon key.
    /// * [`BackendError::Transport`] if the HTTP client cannot be built.
    pub fn init(self) -> Result<Backend, BackendError> {
        let url = self.url.ok_or(BackendError::Validation {
            message: "URL is required".into(),
            context: None,
        })?;

        if url == MEMORY_URL {
            info!("Using in-memory backend");
            return Ok(Backend::memory(Arc::new(MemoryBackend::new())));
        }

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(BackendError::Validation {
                message: format!("Unsupported backend URL '{url}'").into(),
                context: Some("expected http(s):// or mem://".into()),
            });
        }

        let anon_key = self.anon_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            BackendError::Validation {
                message: "anon key is required for a hosted backend".into(),
                context: Some(url.clone().into()),
            }
        })?;

        let hosted = Arc::new(HostedBackend::new(
            &url,
            anon_key,
            self.profiles_table.as_deref().unwrap_or(DEFAULT_PROFILES_TABLE),
            self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        )?);
        info!(url = %hosted.base_url(), "Using hosted backend");

        Ok(Backend { accounts: hosted.clone(), profiles: hosted, kind: "hosted" })
    }
}
