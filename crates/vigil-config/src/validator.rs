//! Configuration validation

use crate::Config;
use std::time::Duration;
use vigil_core::{Error, Result};

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_auth(config)?;
    validate_simulation(config)?;
    validate_alerts(config)?;
    validate_layout(config)?;
    validate_observability(config)?;

    Ok(())
}

fn require_nonzero(name: &str, value: Duration) -> Result<()> {
    if value.is_zero() {
        return Err(Error::Config(format!("{name} must be > 0")));
    }
    Ok(())
}

fn validate_auth(config: &Config) -> Result<()> {
    let auth = &config.auth;

    if !auth.admin_email.contains('@') {
        return Err(Error::Config(format!(
            "admin_email is not an email address: {}",
            auth.admin_email
        )));
    }

    if auth.effective_min_password_length() == 0 {
        return Err(Error::Config("min_password_length must be > 0".to_string()));
    }

    if auth.mode == crate::AuthMode::Demo {
        if !auth.demo_email.contains('@') {
            return Err(Error::Config(
                "demo_email must be set in demo mode".to_string(),
            ));
        }
        if auth.demo_password.chars().count() < auth.effective_min_password_length() {
            return Err(Error::Config(
                "demo_password is shorter than the minimum password length".to_string(),
            ));
        }
    }

    if auth.login_delay > Duration::from_secs(60) {
        tracing::warn!("login_delay is very high (>1 minute)");
    }

    Ok(())
}

fn validate_simulation(config: &Config) -> Result<()> {
    let sim = &config.simulation;

    require_nonzero("overview_interval", sim.overview_interval)?;
    require_nonzero("fleet_interval", sim.fleet_interval)?;
    require_nonzero("analytics_interval", sim.analytics_interval)?;
    require_nonzero("live_interval", sim.live_interval)?;

    let thresholds = &sim.risk_thresholds;
    vigil_core::RiskThresholds::new(thresholds.medium, thresholds.high)?;

    Ok(())
}

fn validate_alerts(config: &Config) -> Result<()> {
    let alerts = &config.alerts;

    require_nonzero("alerts.interval", alerts.interval)?;

    if !(0.0..=1.0).contains(&alerts.probability) {
        return Err(Error::Config(format!(
            "alerts.probability must be within [0, 1] (got {})",
            alerts.probability
        )));
    }

    if alerts.max_alerts == 0 {
        return Err(Error::Config("alerts.max_alerts must be > 0".to_string()));
    }

    Ok(())
}

fn validate_layout(config: &Config) -> Result<()> {
    if config.layout.mobile_breakpoint == 0 {
        return Err(Error::Config(
            "layout.mobile_breakpoint must be > 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_observability(config: &Config) -> Result<()> {
    match config.observability.logging.level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        other => Err(Error::Config(format!("Invalid log level: {other}"))),
    }
}
