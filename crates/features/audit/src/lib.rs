//! Audit feature slice.
//!
//! Subscribes to account lifecycle events and writes them to the `audit`
//! log target. Orphaned accounts (created without a profile row) are logged
//! at `warn` so they can be found and cleaned up.

mod error;
mod trail;

pub use crate::error::{AuditError, AuditErrorExt};
pub use crate::trail::{AuditTotals, AuditTrail};

use handy_domain::events::{AccountRegistered, OrphanedAccount, SignedIn};
use handy_event_bus::EventBus;
use handy_kernel::domain::registry::InitializedSlice;
use tokio::runtime::Handle;

/// Audit slice state.
#[handy_derive::handy_slice]
pub struct Audit {
    pub trail: AuditTrail,
}

/// Subscribes the audit listeners and starts them on the current runtime.
///
/// # Errors
/// * [`AuditError::Internal`] when called outside a tokio runtime.
/// * [`AuditError::Subscribe`] if the bus refuses a subscription.
pub fn init(events: &EventBus) -> Result<InitializedSlice, AuditError> {
    let runtime = Handle::try_current().map_err(|err| AuditError::Internal {
        message: err.to_string().into(),
        context: Some("audit listeners need a tokio runtime".into()),
    })?;

    let trail = AuditTrail::default();
    trail.spawn_registered(&runtime, events.subscribe::<AccountRegistered>().context("registered")?);
    trail.spawn_orphaned(&runtime, events.subscribe::<OrphanedAccount>().context("orphaned")?);
    trail.spawn_signed_in(&runtime, events.subscribe::<SignedIn>().context("signed_in")?);

    tracing::info!("Audit slice initialized");
    Ok(InitializedSlice::new(Audit::new(AuditInner { trail })))
}
