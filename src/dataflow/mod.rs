//! Reactive dataflow primitives for the command graph
//!
//! The teleoperation pipeline is a small directed graph of observable value
//! cells connected by live bindings:
//!
//! ```text
//! axis channel ──► derived channel ──► Link ──► command channel ──► actuator
//!                  (sign flip)                  (validated)
//! ```
//!
//! 1. [`channel`] - [`Channel<T>`]: named cell with validate-then-notify writes
//! 2. [`link`] - [`Link<T>`]: one-directional continuously-active binding
//!
//! Writes are synchronous and re-entrant: an observer that writes another
//! channel runs that channel's fan-out to completion before returning. The
//! graph is wired acyclically at construction; there is no runtime cycle
//! detection.

pub mod channel;
pub mod link;

pub use channel::{clamp_symmetric, Channel, SubscriptionId};
pub use link::Link;
