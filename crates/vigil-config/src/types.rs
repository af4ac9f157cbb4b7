//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use vigil_core::RiskThresholds;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Login and signup behaviour
    #[serde(default)]
    pub auth: AuthConfig,

    /// Metric and fleet simulation
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Alert feed simulation
    #[serde(default)]
    pub alerts: AlertConfig,

    /// Responsive layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Settings page round trip
    #[serde(default)]
    pub settings: SettingsConfig,

    /// Observability
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Which login entry point is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Any well-formed email with a 6+ character password; admin via sentinel email
    #[default]
    Sentinel,
    /// Only the fixed demo account is accepted; 8+ character password
    Demo,
}

impl AuthMode {
    /// Minimum password length enforced by this mode
    pub fn default_min_password_length(&self) -> usize {
        match self {
            AuthMode::Sentinel => 6,
            AuthMode::Demo => 8,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Active login mode
    pub mode: AuthMode,

    /// Email granted the admin role
    pub admin_email: String,

    /// Demo account email (demo mode only)
    pub demo_email: String,

    /// Demo account password (demo mode only)
    pub demo_password: String,

    /// Override for the mode's minimum password length
    pub min_password_length: Option<usize>,

    /// Simulated login round trip
    #[serde(with = "humantime_serde")]
    pub login_delay: Duration,

    /// Simulated signup round trip
    #[serde(with = "humantime_serde")]
    pub signup_delay: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            admin_email: "admin@coretech.com".to_string(),
            demo_email: "demo@coretechitplc.com".to_string(),
            demo_password: "Demo@12345".to_string(),
            min_password_length: None,
            login_delay: Duration::from_secs(2),
            signup_delay: Duration::from_secs(2),
        }
    }
}

impl AuthConfig {
    /// Minimum password length after applying the override
    pub fn effective_min_password_length(&self) -> usize {
        self.min_password_length
            .unwrap_or_else(|| self.mode.default_min_password_length())
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,

    /// Overview KPI tick period
    #[serde(with = "humantime_serde")]
    pub overview_interval: Duration,

    /// Component fleet tick period
    #[serde(with = "humantime_serde")]
    pub fleet_interval: Duration,

    /// Analytics KPI tick period
    #[serde(with = "humantime_serde")]
    pub analytics_interval: Duration,

    /// Live resource metrics tick period
    #[serde(with = "humantime_serde")]
    pub live_interval: Duration,

    /// Simulated refresh round trip
    #[serde(with = "humantime_serde")]
    pub refresh_delay: Duration,

    /// Risk score classification
    pub risk_thresholds: RiskThresholds,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            overview_interval: Duration::from_secs(5),
            fleet_interval: Duration::from_secs(5),
            analytics_interval: Duration::from_secs(8),
            live_interval: Duration::from_secs(3),
            refresh_delay: Duration::from_secs(2),
            risk_thresholds: RiskThresholds::default(),
        }
    }
}

/// Alert feed configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertConfig {
    /// Generator tick period
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Chance of synthesizing an alert on each tick
    pub probability: f64,

    /// Maximum retained alerts
    pub max_alerts: usize,

    /// Seed the feed with the fixture alerts
    pub seed_fixtures: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            probability: 0.3,
            max_alerts: 10,
            seed_fixtures: true,
        }
    }
}

/// Responsive layout configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport widths below this are treated as mobile
    pub mobile_breakpoint: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 1024,
        }
    }
}

/// Settings page configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsConfig {
    /// Simulated save round trip
    #[serde(with = "humantime_serde")]
    pub save_delay: Duration,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            save_delay: Duration::from_secs(2),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ObservabilityConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON lines
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.auth.mode, AuthMode::Sentinel);
        assert_eq!(config.auth.admin_email, "admin@coretech.com");
        assert_eq!(config.alerts.max_alerts, 10);
        assert_eq!(config.alerts.interval, Duration::from_secs(10));
        assert_eq!(config.layout.mobile_breakpoint, 1024);
        assert_eq!(config.simulation.risk_thresholds, RiskThresholds::default());
    }

    #[test]
    fn test_min_password_length_per_mode() {
        let mut auth = AuthConfig::default();
        assert_eq!(auth.effective_min_password_length(), 6);

        auth.mode = AuthMode::Demo;
        assert_eq!(auth.effective_min_password_length(), 8);

        auth.min_password_length = Some(12);
        assert_eq!(auth.effective_min_password_length(), 12);
    }
}
