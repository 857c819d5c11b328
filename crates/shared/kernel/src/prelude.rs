//! Common imports for feature slices.

pub use crate::safe_nanoid;
pub use handy_domain::account::{AccountId, Profile, Role, Session};
pub use handy_domain::config::AppConfig;
pub use handy_domain::constants::*;
pub use handy_domain::navigation::Redirect;
pub use handy_domain::regions::RegionDirectory;
pub use handy_domain::registry::{FeatureSlice, InitializedSlice};
pub use handy_event_bus::EventBus;

#[cfg(feature = "server")]
pub use crate::server::{
    error::WebError,
    render::{redirect, render},
    session::{CurrentSession, SessionStore},
    state::AppState,
};
