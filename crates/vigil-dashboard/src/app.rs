//! Top-level application state: the login gate in front of the dashboard

use std::sync::Arc;
use tracing::info;
use vigil_auth::{CredentialService, LoginPolicy, LoginRequest, Session, SessionManager};
use vigil_config::{validate_config, Config};
use vigil_core::{Error, Result};

use crate::dashboard::Dashboard;

/// Session plus the dashboard it unlocks
#[derive(Debug)]
pub struct App {
    config: Config,
    sessions: SessionManager,
    dashboard: Option<Dashboard>,
}

impl App {
    /// Build with the simulated credential service
    pub fn new(config: Config) -> Self {
        let sessions = SessionManager::from_config(&config.auth);
        Self {
            config,
            sessions,
            dashboard: None,
        }
    }

    /// Build with a custom credential service
    pub fn with_service(config: Config, service: Arc<dyn CredentialService>) -> Self {
        let sessions = SessionManager::new(LoginPolicy::from_config(&config.auth), service);
        Self {
            config,
            sessions,
            dashboard: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Session manager
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Log in and open the dashboard. A configuration the dashboard could
    /// not mount from fails before any credentials are checked.
    pub async fn login(&mut self, request: LoginRequest) -> Result<Session> {
        validate_config(&self.config)?;
        let session = self.sessions.login(request).await?;
        self.open_dashboard()?;
        Ok(session)
    }

    /// Mount the dashboard for the current session. Reopening keeps the
    /// existing dashboard.
    pub fn open_dashboard(&mut self) -> Result<&mut Dashboard> {
        if !self.sessions.is_authenticated() {
            return Err(Error::Authentication(
                "Sign in to open the dashboard".to_string(),
            ));
        }
        let dashboard = match self.dashboard.take() {
            Some(dashboard) => dashboard,
            None => Dashboard::new(self.config.clone())?,
        };
        Ok(self.dashboard.insert(dashboard))
    }

    /// Open dashboard, if any
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Open dashboard, mutably
    pub fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        self.dashboard.as_mut()
    }

    /// End the session and tear the dashboard down with all its timers
    pub fn logout(&mut self) -> Option<Session> {
        if let Some(dashboard) = self.dashboard.take() {
            info!(tasks = dashboard.active_tasks(), "Dashboard closed");
        }
        self.sessions.logout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::Role;

    fn app() -> App {
        let mut config = Config::default();
        config.simulation.seed = Some(3);
        App::new(config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_requires_session() {
        let mut app = app();
        assert!(matches!(app.open_dashboard(), Err(Error::Authentication(_))));
        assert!(app.dashboard().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_opens_and_logout_closes() {
        let mut app = app();
        let session = app
            .login(LoginRequest::new("admin@coretech.com", "secret1", Some("token")))
            .await
            .unwrap();
        assert_eq!(session.user.role, Role::Admin);
        assert_eq!(app.dashboard().map(Dashboard::active_tasks), Some(4));

        let ended = app.logout().unwrap();
        assert_eq!(ended.id, session.id);
        assert!(app.dashboard().is_none());
        assert!(!app.sessions().is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_fails_login_without_session() {
        let mut config = Config::default();
        config.simulation.fleet_interval = std::time::Duration::ZERO;
        let mut app = App::new(config);

        let err = app
            .login(LoginRequest::new("admin@coretech.com", "secret1", Some("token")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!app.sessions().is_authenticated());
        assert!(app.dashboard().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_login_keeps_dashboard_closed() {
        let mut app = app();
        let err = app
            .login(LoginRequest::new("ops@example.com", "secret1", None))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(app.dashboard().is_none());
    }
}
