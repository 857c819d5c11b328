//! Events published on the bus after a submission reaches the backend.

pub use handy_domain::events::{AccountRegistered, OrphanedAccount};
