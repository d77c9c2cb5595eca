//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, tracing span)
//!     → aggregate handler (dispatch round, verdict)
//!     → JSON response, 200 or 500
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ALLOWED_TO_FAIL_PARAM, MUST_SUCCEED_PARAM};
