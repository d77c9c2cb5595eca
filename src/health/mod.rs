//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → dispatch.rs (one task per hostname)
//!     → probe.rs (HEAD to the local backend, Host header = hostname)
//!     → results collected over a bounded channel
//!     → aggregate.rs (filters, verdict, per-host report)
//! ```
//!
//! # Design Decisions
//! - Every request runs a fresh round; nothing is cached
//! - Probe errors never escape; they become failed results
//! - The transport sits behind the `Probe` trait so rounds can be tested
//!   without sockets

pub mod aggregate;
pub mod dispatch;
pub mod probe;

pub use aggregate::{aggregate, Aggregate, FilterMode, FilterSet, HostStatus};
pub use dispatch::Dispatcher;
pub use probe::{CheckResult, HttpProber, Outcome, Probe, ProbeError};
