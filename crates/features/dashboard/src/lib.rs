//! Dashboard feature slice: the public landing page and the signed-in
//! dashboard with its slideshow, quick stats and technician list.

pub mod catalog;
mod error;
mod viewer;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod view;

pub use crate::error::{DashboardError, DashboardErrorExt};
pub use crate::viewer::{Viewer, ViewerResolver};
#[cfg(feature = "server")]
pub use crate::handlers::router;

use handy_backend::Backend;
use handy_kernel::domain::registry::InitializedSlice;

/// Dashboard slice state.
#[handy_derive::handy_slice]
pub struct Dashboard {
    pub viewers: ViewerResolver,
}

/// Builds the slice.
///
/// # Errors
/// Currently infallible; the signature matches the other slices.
pub fn init(backend: Backend) -> Result<InitializedSlice, DashboardError> {
    tracing::info!("Dashboard slice initialized");

    let inner = DashboardInner { viewers: ViewerResolver::new(backend) };
    Ok(InitializedSlice::new(Dashboard::new(inner)))
}
