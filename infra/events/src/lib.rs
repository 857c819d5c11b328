//! # Event Bus
//!
//! Typed fan-out messaging between feature slices.
//!
//! Events are keyed by their Rust type; every subscriber gets its own copy of
//! each event published after it subscribed. Publishing with no subscribers is
//! not an error.
//!
//! # Example
//!
//! ```rust
//! use handy_event_bus::{EventBus, EventBusError};
//!
//! #[derive(Debug, PartialEq)]
//! struct AccountRegistered { id: String }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<AccountRegistered>()?;
//!
//!     bus.publish(AccountRegistered { id: "acc-1".into() })?;
//!
//!     let event = rx.next().await.expect("event");
//!     assert_eq!(event.id, "acc-1");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;

pub use bus::{Event, EventBus, Subscription};
pub use error::{EventBusError, EventBusErrorExt};
