pub mod error;
pub mod health;
pub mod regions;
pub mod render;
pub mod router;
pub mod session;
pub mod state;
