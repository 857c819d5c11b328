//! Facade crate for the Handyman features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it composes other crates and holds no business logic.
//!
//! ## Usage
//! - Add `handy` with the `server` feature for the routers.
//! - Call [`init`] inside a tokio runtime to build every feature slice.

use handy_backend::Backend;
use handy_domain::config::AppConfig;
use handy_domain::regions::RegionDirectory;
use handy_domain::registry::InitializedSlice;
use handy_event_bus::EventBus;
use std::sync::Arc;

pub use handy_backend as backend;
pub use handy_domain as domain;
pub use handy_event_bus as events;
pub use handy_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use handy_kernel::server::router::system_router;

        use handy_kernel::server::state::AppState;
        use utoipa_axum::router::OpenApiRouter;

        /// Every feature router, merged. Does not include [`system_router`].
        #[must_use]
        pub fn feature_router() -> OpenApiRouter<AppState> {
            OpenApiRouter::new()
                .merge(crate::features::dashboard::router())
                .merge(crate::features::identity::router())
                .merge(crate::features::registration::router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use handy_audit as audit;
    pub use handy_dashboard as dashboard;
    pub use handy_identity as identity;
    pub use handy_registration as registration;

    /// Feature slices built by [`crate::init`], in initialization order.
    pub const SLICES: &[&str] = &["audit", "identity", "registration", "dashboard"];

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name) || SLICES.contains(&name)
    }
}

/// Initializes every feature slice.
///
/// Must run inside a tokio runtime: the audit listeners are spawned on it.
///
/// # Errors
/// Returns the first slice initialization failure.
pub fn init(
    config: &AppConfig,
    backend: &Backend,
    regions: &Arc<RegionDirectory>,
    events: &EventBus,
) -> Result<Vec<InitializedSlice>, Box<dyn std::error::Error + Send + Sync>> {
    // Audit first so it observes everything the other slices publish.
    let slices = vec![
        features::audit::init(events)?,
        features::identity::init(backend.clone(), events.clone())?,
        features::registration::init(
            &config.registration,
            backend.clone(),
            regions.clone(),
            events.clone(),
        )?,
        features::dashboard::init(backend.clone())?,
    ];

    tracing::info!(count = slices.len(), "Feature slices initialized");
    Ok(slices)
}
