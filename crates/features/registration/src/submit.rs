//! Turning a filled-in form into an account plus a profile row.

use crate::error::RegistrationError;
use crate::events::{AccountRegistered, OrphanedAccount};
use crate::form::{FormField, RegistrationForm};
use handy_backend::Backend;
use handy_domain::account::NewProfile;
use handy_domain::constants::LOGIN_PATH;
use handy_domain::navigation::Redirect;
use handy_domain::regions::RegionDirectory;
use handy_event_bus::EventBus;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Fields every role must fill in, in the order they are reported.
const REQUIRED: [FormField; 6] = [
    FormField::Name,
    FormField::Email,
    FormField::Password,
    FormField::Region,
    FormField::Locality,
    FormField::Address,
];

/// Runs registrations against the injected backend.
#[derive(Debug, Clone)]
pub struct Registrar {
    backend: Backend,
    regions: Arc<RegionDirectory>,
    events: EventBus,
    redirect_delay: Duration,
}

impl Registrar {
    #[must_use]
    pub const fn new(
        backend: Backend,
        regions: Arc<RegionDirectory>,
        events: EventBus,
        redirect_delay: Duration,
    ) -> Self {
        Self { backend, regions, events, redirect_delay }
    }

    #[must_use]
    pub fn regions(&self) -> &RegionDirectory {
        &self.regions
    }

    /// Checks the form without touching the backend.
    ///
    /// # Errors
    /// The first local problem found: password mismatch, then a missing skill
    /// for technicians, then any empty required field, then a locality outside
    /// the chosen region.
    pub fn validate(&self, form: &RegistrationForm) -> Result<(), RegistrationError> {
        if form.password != form.confirm_password {
            return Err(RegistrationError::PasswordMismatch { context: None });
        }
        if form.submitted_skill().is_some_and(str::is_empty) {
            return Err(RegistrationError::SkillRequired { context: None });
        }
        if let Some(field) = REQUIRED.into_iter().find(|f| form.get(*f).trim().is_empty()) {
            return Err(RegistrationError::MissingField { field, context: None });
        }
        if !self.regions.contains(&form.region, &form.locality) {
            return Err(RegistrationError::UnknownLocality {
                region: form.region.clone(),
                context: Some(form.locality.clone().into()),
            });
        }
        Ok(())
    }

    /// Validates locally, creates the account, then writes the profile row.
    ///
    /// At most one call of each kind is made and nothing is retried. A failed
    /// profile write leaves the account in place; it is reported as an
    /// [`OrphanedAccount`] event.
    ///
    /// # Errors
    /// See [`RegistrationError`]; every variant except `SubmissionInFlight`
    /// and `Internal` can come out of here.
    #[instrument(skip_all, fields(role = %form.role))]
    pub async fn submit(&self, form: &RegistrationForm) -> Result<Redirect, RegistrationError> {
        self.validate(form)?;

        let email = form.email.trim();
        let created =
            self.backend.accounts().create_account(email, &form.password).await.map_err(|err| {
                RegistrationError::AuthFailure {
                    message: err.user_message().into_owned().into(),
                    context: Some("create_account".into()),
                }
            })?;

        let Some(account_id) = created.account_id else {
            warn!("Signup returned no account id");
            return Err(RegistrationError::SignupIncomplete { context: None });
        };

        let profile = NewProfile {
            id: account_id.clone(),
            full_name: form.name.trim().to_owned(),
            role: form.role,
            skill: form.submitted_skill().map(str::to_owned),
            region: form.region.clone(),
            locality: form.locality.clone(),
            address: form.address.trim().to_owned(),
        };

        let token = created.access_token.as_deref();
        if let Err(err) = self.backend.profiles().create_profile(&profile, token).await {
            let reason = err.user_message().into_owned();
            warn!(account = %account_id, error = %err, "Profile write failed; account left without profile");
            self.publish(OrphanedAccount {
                account_id,
                email: email.to_owned(),
                reason: reason.clone(),
            });
            return Err(RegistrationError::ProfileWriteFailure {
                message: reason.into(),
                context: Some("create_profile".into()),
            });
        }

        info!(account = %account_id, "Registration completed");
        self.publish(AccountRegistered { account_id, role: form.role });

        Ok(Redirect::after(LOGIN_PATH, self.redirect_delay))
    }

    fn publish<E: handy_event_bus::Event>(&self, event: E) {
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Registration event dropped");
        }
    }
}
