//! Session state machine
//!
//! `Anonymous -> Authenticating -> Authenticated`, and back to `Anonymous` on
//! logout or a failed login. Login and signup share one in-flight flag, so a
//! second submission while one is pending is rejected.

use crate::provider::{CredentialService, SimulatedCredentialService, User};
use crate::validation::{validate_login, validate_signup, LoginPolicy, LoginRequest, SignupForm};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use vigil_config::AuthConfig;
use vigil_core::{BusyFlag, Error, Result};

/// Message shown after a successful signup
pub const SIGNUP_SUCCESS_MESSAGE: &str =
    "Account created successfully! Please check your email to verify your account.";

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session ID
    pub id: Uuid,
    /// Signed-in user
    pub user: User,
    /// Login time
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `user`
    pub fn new(user: User) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            started_at: Utc::now(),
        }
    }
}

/// Current authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Nobody is signed in
    #[default]
    Anonymous,
    /// A login is in flight. Holds the session it would replace, if the
    /// user was already signed in.
    Authenticating(Option<Session>),
    /// A user is signed in
    Authenticated(Session),
}

impl SessionState {
    /// The active session, if any
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Whether a user is signed in
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Whether a login is in flight
    pub fn is_authenticating(&self) -> bool {
        matches!(self, SessionState::Authenticating(_))
    }
}

/// Puts the replaced session back unless the login completed.
/// Runs on failure and when the login future is dropped mid-flight.
struct Revert {
    state: Arc<Mutex<SessionState>>,
    armed: bool,
}

impl Revert {
    fn enter(state: &Arc<Mutex<SessionState>>) -> Self {
        let mut current = state.lock();
        let replaced = match std::mem::take(&mut *current) {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        };
        *current = SessionState::Authenticating(replaced);
        Self {
            state: Arc::clone(state),
            armed: true,
        }
    }

    fn commit(mut self, session: Session) -> Result<Session> {
        self.armed = false;
        let mut state = self.state.lock();
        let SessionState::Authenticating(replaced) = &*state else {
            // Logged out while the credential check was pending
            return Err(Error::Operation("Login was interrupted by logout".to_string()));
        };
        if let Some(replaced) = replaced {
            info!(session_id = %replaced.id, email = %replaced.user.email, "Session replaced");
        }
        *state = SessionState::Authenticated(session.clone());
        Ok(session)
    }
}

impl Drop for Revert {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if let SessionState::Authenticating(replaced) = &mut *state {
            let restored = replaced
                .take()
                .map_or(SessionState::Anonymous, SessionState::Authenticated);
            *state = restored;
        }
    }
}

/// Owns the session state and runs login, logout and signup
#[derive(Debug, Clone)]
pub struct SessionManager {
    policy: LoginPolicy,
    service: Arc<dyn CredentialService>,
    state: Arc<Mutex<SessionState>>,
    busy: BusyFlag,
}

impl SessionManager {
    /// Create a manager with an explicit credential service
    pub fn new(policy: LoginPolicy, service: Arc<dyn CredentialService>) -> Self {
        Self {
            policy,
            service,
            state: Arc::new(Mutex::new(SessionState::Anonymous)),
            busy: BusyFlag::new(),
        }
    }

    /// Create a manager with the simulated credential service
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            LoginPolicy::from_config(config),
            Arc::new(SimulatedCredentialService::from_config(config)),
        )
    }

    /// Active login rules
    pub fn policy(&self) -> &LoginPolicy {
        &self.policy
    }

    /// Copy of the current state
    pub fn state(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Signed-in user, if any
    pub fn current_user(&self) -> Option<User> {
        self.state.lock().session().map(|s| s.user.clone())
    }

    /// Whether a user is signed in
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().is_authenticated()
    }

    /// Whether a login or signup is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Sign in.
    ///
    /// Invalid input fails without touching the state. Otherwise the state is
    /// `Authenticating` until the credential service answers; on failure or
    /// cancellation the previous state is restored.
    pub async fn login(&self, request: LoginRequest) -> Result<Session> {
        let _guard = self.busy.try_acquire("login")?;

        if let Err(e) = validate_login(&self.policy, &request) {
            warn!(email = %request.email, error = %e, "Login rejected");
            return Err(e);
        }

        let revert = Revert::enter(&self.state);
        info!(email = %request.email, "Authenticating");

        match self
            .service
            .authenticate(&request.email, &request.password)
            .await
        {
            Ok(()) => {
                let user = User::from_email(&request.email, &self.policy.admin_email);
                let session = revert.commit(Session::new(user))?;
                info!(
                    session_id = %session.id,
                    email = %session.user.email,
                    role = %session.user.role,
                    "Login succeeded"
                );
                Ok(session)
            }
            Err(e @ Error::Authentication(_)) => {
                warn!(email = %request.email, error = %e, "Credentials rejected");
                Err(e)
            }
            Err(e) => {
                warn!(email = %request.email, error = %e, "Login failed");
                Err(Error::Operation(e.to_string()))
            }
        }
    }

    /// Sign out. Always succeeds; returns the ended session, if any.
    ///
    /// Logging out while a re-login is in flight ends the session that login
    /// would have replaced, and the login then fails.
    pub fn logout(&self) -> Option<Session> {
        let previous = std::mem::take(&mut *self.state.lock());
        match previous {
            SessionState::Authenticated(session) => {
                info!(session_id = %session.id, email = %session.user.email, "Logged out");
                Some(session)
            }
            SessionState::Authenticating(Some(session)) => {
                warn!(
                    session_id = %session.id,
                    email = %session.user.email,
                    "Logged out during re-login"
                );
                Some(session)
            }
            SessionState::Authenticating(None) => {
                info!("Pending login abandoned by logout");
                None
            }
            SessionState::Anonymous => None,
        }
    }

    /// Register an account. Leaves the session state unchanged.
    pub async fn signup(&self, form: SignupForm) -> Result<&'static str> {
        let _guard = self.busy.try_acquire("signup")?;

        validate_signup(&form)?;

        info!(email = %form.email, company = %form.company, "Registering account");
        self.service.register(&form).await.map_err(|e| {
            warn!(email = %form.email, error = %e, "Signup failed");
            Error::Operation(e.to_string())
        })?;

        info!(email = %form.email, "Account created");
        Ok(SIGNUP_SUCCESS_MESSAGE)
    }
}
