//! Identity feature slice: login, browser sessions and logout.

mod authenticator;
mod error;
pub mod events;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod view;

pub use crate::authenticator::Authenticator;
pub use crate::error::{IdentityError, IdentityErrorExt};
#[cfg(feature = "server")]
pub use crate::handlers::router;

use handy_backend::Backend;
use handy_event_bus::EventBus;
use handy_kernel::domain::registry::InitializedSlice;

/// Identity slice state.
#[handy_derive::handy_slice]
pub struct Identity {
    pub authenticator: Authenticator,
}

/// Builds the slice.
///
/// # Errors
/// Currently infallible; the signature matches the other slices.
pub fn init(backend: Backend, events: EventBus) -> Result<InitializedSlice, IdentityError> {
    tracing::info!(backend = backend.kind(), "Identity slice initialized");

    let inner = IdentityInner { authenticator: Authenticator::new(backend, events) };
    Ok(InitializedSlice::new(Identity::new(inner)))
}
