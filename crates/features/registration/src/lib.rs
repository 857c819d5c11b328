//! Registration feature slice.
//!
//! A server-rendered form with a region → locality cascade and a
//! role-dependent skill field, backed by per-tab form instances, plus the
//! two-step submission (account, then profile row).

mod error;
pub mod events;
pub mod form;
mod instances;
mod submit;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod view;

pub use crate::error::{RegistrationError, RegistrationErrorExt};
pub use crate::form::{FormField, RegistrationForm};
pub use crate::instances::FormRegistry;
pub use crate::submit::Registrar;
#[cfg(feature = "server")]
pub use crate::handlers::router;

use handy_backend::Backend;
use handy_domain::config::RegistrationConfig;
use handy_domain::regions::RegionDirectory;
use handy_event_bus::EventBus;
use handy_kernel::domain::registry::InitializedSlice;
use std::sync::Arc;
use std::time::Duration;

/// Registration slice state.
#[handy_derive::handy_slice]
pub struct Registration {
    pub registrar: Registrar,
    pub forms: FormRegistry,
}

/// Builds the slice from its collaborators.
///
/// # Errors
/// [`RegistrationError::Internal`] if the form TTL is zero.
pub fn init(
    config: &RegistrationConfig,
    backend: Backend,
    regions: Arc<RegionDirectory>,
    events: EventBus,
) -> Result<InitializedSlice, RegistrationError> {
    if config.form_ttl_seconds == 0 {
        return Err(RegistrationError::Internal {
            message: "form_ttl_seconds must be greater than zero".into(),
            context: Some("registration".into()),
        });
    }

    let registrar = Registrar::new(
        backend,
        regions,
        events,
        Duration::from_secs(config.redirect_delay_seconds),
    );
    let forms =
        FormRegistry::new(config.form_capacity, Duration::from_secs(config.form_ttl_seconds));

    tracing::info!(
        form_ttl = config.form_ttl_seconds,
        redirect_delay = config.redirect_delay_seconds,
        "Registration slice initialized"
    );
    Ok(InitializedSlice::new(Registration::new(RegistrationInner { registrar, forms })))
}
