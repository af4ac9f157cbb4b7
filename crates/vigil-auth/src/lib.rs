//! # Vigil Auth
//!
//! Login gate for the dashboard. Credentials are checked by a pluggable
//! [`CredentialService`]; the bundled implementation only waits and accepts.
//! Two login modes are supported:
//! - `sentinel`: any email, admin role for the configured sentinel address
//! - `demo`: only the fixed demo account

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod provider;
pub mod session;
pub mod validation;

pub use provider::{CredentialService, SimulatedCredentialService, User};
pub use session::{Session, SessionManager, SessionState, SIGNUP_SUCCESS_MESSAGE};
pub use validation::{
    validate_login, validate_signup, LoginPolicy, LoginRequest, SignupForm,
    SIGNUP_MIN_PASSWORD_LENGTH,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::provider::{CredentialService, User};
    pub use crate::session::{Session, SessionManager, SessionState};
    pub use crate::validation::{LoginRequest, SignupForm};
}
