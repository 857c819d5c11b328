//! Events published by the identity slice.

pub use handy_domain::events::SignedIn;
