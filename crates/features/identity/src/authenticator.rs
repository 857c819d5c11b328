use crate::error::IdentityError;
use crate::events::SignedIn;
use handy_backend::Backend;
use handy_domain::account::Session;
use handy_event_bus::EventBus;
use tracing::{info, instrument, warn};

/// Exchanges credentials for a provider session.
#[derive(Debug, Clone)]
pub struct Authenticator {
    backend: Backend,
    events: EventBus,
}

impl Authenticator {
    #[must_use]
    pub const fn new(backend: Backend, events: EventBus) -> Self {
        Self { backend, events }
    }

    /// One sign-in call, no retries. Empty inputs are passed through; the
    /// page marks both fields `required`.
    ///
    /// # Errors
    /// [`IdentityError::AuthFailure`] carrying the provider's message.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let session = self.backend.accounts().sign_in(email.trim(), password).await.map_err(
            |err| {
                warn!(error = %err, "Sign-in rejected");
                IdentityError::AuthFailure {
                    message: err.user_message().into_owned().into(),
                    context: Some("sign_in".into()),
                }
            },
        )?;

        info!(account = %session.account_id, "Signed in");
        if let Err(err) = self.events.publish(SignedIn { account_id: session.account_id.clone() })
        {
            warn!(error = %err, "Sign-in event dropped");
        }
        Ok(session)
    }
}
