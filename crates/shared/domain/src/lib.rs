//! # Domain Models
//!
//! Pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod account;
pub mod config;
pub mod constants;
pub mod events;
pub mod navigation;
pub mod regions;
pub mod registry;
