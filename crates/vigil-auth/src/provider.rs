//! Credential services

use crate::validation::SignupForm;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vigil_config::AuthConfig;
use vigil_core::{Result, Role};

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Email address as submitted
    pub email: String,
    /// Role derived at login
    pub role: Role,
}

impl User {
    /// Build the user for a submitted email. The display name is the local part.
    pub fn from_email(email: &str, admin_email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            name,
            email: email.to_string(),
            role: Role::from_email(email, admin_email),
        }
    }

    /// Whether the user has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Backend that checks credentials and registers accounts
#[async_trait]
pub trait CredentialService: Send + Sync + std::fmt::Debug {
    /// Verify a login pair
    async fn authenticate(&self, email: &str, password: &str) -> Result<()>;

    /// Register a new account
    async fn register(&self, form: &SignupForm) -> Result<()>;
}

/// Accepts every submission after a fixed delay
#[derive(Debug, Clone)]
pub struct SimulatedCredentialService {
    login_delay: Duration,
    signup_delay: Duration,
}

impl SimulatedCredentialService {
    /// Create a service with explicit delays
    pub fn new(login_delay: Duration, signup_delay: Duration) -> Self {
        Self {
            login_delay,
            signup_delay,
        }
    }

    /// Create a service using the configured delays
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.login_delay, config.signup_delay)
    }
}

impl Default for SimulatedCredentialService {
    fn default() -> Self {
        Self::from_config(&AuthConfig::default())
    }
}

#[async_trait]
impl CredentialService for SimulatedCredentialService {
    async fn authenticate(&self, email: &str, _password: &str) -> Result<()> {
        tracing::debug!(email, delay_ms = self.login_delay.as_millis() as u64, "Simulating login");
        tokio::time::sleep(self.login_delay).await;
        Ok(())
    }

    async fn register(&self, form: &SignupForm) -> Result<()> {
        tracing::debug!(email = %form.email, "Simulating signup");
        tokio::time::sleep(self.signup_delay).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_email() {
        let admin = User::from_email("admin@coretech.com", "admin@coretech.com");
        assert_eq!(admin.name, "admin");
        assert!(admin.is_admin());

        let user = User::from_email("jane.doe@example.com", "admin@coretech.com");
        assert_eq!(user.name, "jane.doe");
        assert_eq!(user.role, Role::User);

        // Sentinel match is exact
        let upper = User::from_email("ADMIN@coretech.com", "admin@coretech.com");
        assert_eq!(upper.role, Role::User);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_service_waits_for_delay() {
        let service =
            SimulatedCredentialService::new(Duration::from_secs(2), Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        service.authenticate("a@b.co", "secret1").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));

        service.register(&SignupForm::default()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
