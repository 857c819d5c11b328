//! Who is looking at the dashboard.

use crate::error::{DashboardError, DashboardErrorExt};
use handy_backend::Backend;
use handy_domain::account::{AccountId, Profile, Session};
use tracing::{debug, warn};

const FALLBACK_INITIAL: char = 'U';

/// A signed-in account and its profile row, when one could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub account_id: AccountId,
    pub profile: Option<Profile>,
}

impl Viewer {
    /// Avatar glyph: first letter of the full name, else `U`.
    #[must_use]
    pub fn initial(&self) -> char {
        self.profile.as_ref().and_then(Profile::initial).unwrap_or(FALLBACK_INITIAL)
    }
}

/// Resolves sessions into viewers against the provider.
#[derive(Debug, Clone)]
pub struct ViewerResolver {
    backend: Backend,
}

impl ViewerResolver {
    #[must_use]
    pub const fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// `Ok(None)` when the provider no longer recognizes the session's token.
    ///
    /// A failed profile read is tolerated; the page renders with fallbacks.
    ///
    /// # Errors
    /// [`DashboardError::Backend`] if the token check itself fails.
    pub async fn resolve(&self, session: &Session) -> Result<Option<Viewer>, DashboardError> {
        let Some(account_id) = self
            .backend
            .accounts()
            .current_account(&session.access_token)
            .await
            .context("current_account")?
        else {
            debug!(account = %session.account_id, "Session token no longer valid");
            return Ok(None);
        };

        let profile = match self
            .backend
            .profiles()
            .read_profile(&account_id, Some(&session.access_token))
            .await
        {
            Ok(profile) => profile,
            Err(err) => {
                warn!(account = %account_id, error = %err, "Profile read failed");
                None
            },
        };

        Ok(Some(Viewer { account_id, profile }))
    }
}
