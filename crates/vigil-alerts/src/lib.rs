//! # Vigil Alerts
//!
//! The alert feed shown on the dashboard and in the notifications dropdown:
//! - A newest-first list capped at a fixed size
//! - Acknowledge and dismiss, both idempotent
//! - A simulator that raises catalog alerts at random on a timer

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod alert;
pub mod feed;
pub mod simulator;

pub use alert::{Alert, Priority, Severity};
pub use feed::{AlertFeed, AlertFeedSnapshot};
pub use simulator::AlertSimulator;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::alert::{Alert, Priority, Severity};
    pub use crate::feed::{AlertFeed, AlertFeedSnapshot};
    pub use crate::simulator::AlertSimulator;
}
