//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.rs (bind configured host:port)
//!     → Hand off to HTTP layer (axum::serve)
//! ```

pub mod listener;

pub use listener::{bind, ListenerError};
