//! # Vigil Core
//!
//! Core types and error handling for the Vigil monitoring dashboard.
//!
//! This crate provides the foundations shared by every other Vigil crate:
//! - The error taxonomy surfaced to forms and views
//! - Risk classification and component status
//! - User roles
//! - The in-flight guard used by simulated async operations
//! - Timestamp helpers

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod busy;
pub mod error;
pub mod time;
pub mod types;

pub use busy::{BusyFlag, BusyGuard};
pub use error::{Error, FieldError, Result};
pub use time::{current_timestamp_ms, format_relative};
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::busy::{BusyFlag, BusyGuard};
    pub use crate::error::{Error, FieldError, Result};
    pub use crate::time::{current_timestamp_ms, format_relative};
    pub use crate::types::*;
}
