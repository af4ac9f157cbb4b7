//! Settings groups and the simulated save round trip

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vigil_config::SettingsConfig;
use vigil_core::{BusyFlag, Error, FieldError, Result};

use crate::export::{export_json, ExportFile, ExportFormat, ReportKind};

/// Company and display preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Company name
    pub company_name: String,
    /// IANA timezone
    pub timezone: String,
    /// UI language
    pub language: String,
    /// Colour theme
    pub theme: String,
    /// Dashboard refresh interval, seconds
    pub refresh_interval: u32,
}

/// Alert delivery preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    /// Email alerts
    pub email_alerts: bool,
    /// SMS alerts
    pub sms_alerts: bool,
    /// Push notifications
    pub push_notifications: bool,
    /// Alert threshold, percent
    pub alert_threshold: u8,
    /// Maintenance notices
    pub maintenance_notifications: bool,
    /// Weekly summary
    pub weekly_reports: bool,
}

/// Authentication policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    /// Require a second factor
    pub two_factor_auth: bool,
    /// Idle session timeout, minutes
    pub session_timeout: u32,
    /// Password lifetime, days
    pub password_expiry: u32,
    /// Failed attempts before lockout
    pub login_attempts: u32,
    /// Allowed client range
    pub ip_whitelist: String,
    /// At-rest encryption
    pub encryption_level: String,
}

/// Collection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSettings {
    /// Retention, days
    pub data_retention: u32,
    /// Sampling period, seconds
    pub sampling_rate: u32,
    /// Alert debounce, minutes
    pub alert_delay: u32,
    /// Automatic scaling
    pub auto_scaling: bool,
    /// Predictive analytics
    pub predictive_analytics: bool,
    /// Live updates
    pub real_time_updates: bool,
}

/// Third-party integrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSettings {
    /// Masked API key
    pub api_key: String,
    /// Outbound webhook
    pub webhook_url: String,
    /// Slack
    pub slack_integration: bool,
    /// Microsoft Teams
    pub teams_integration: bool,
    /// Email
    pub email_integration: bool,
}

/// All settings groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// General
    pub general: GeneralSettings,
    /// Notifications
    pub notifications: NotificationSettings,
    /// Security
    pub security: SecuritySettings,
    /// Monitoring
    pub monitoring: MonitoringSettings,
    /// Integrations
    pub integrations: IntegrationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings {
                company_name: "CoreTechIT PLC".to_string(),
                timezone: "UTC".to_string(),
                language: "en".to_string(),
                theme: "dark".to_string(),
                refresh_interval: 30,
            },
            notifications: NotificationSettings {
                email_alerts: true,
                sms_alerts: false,
                push_notifications: true,
                alert_threshold: 80,
                maintenance_notifications: true,
                weekly_reports: true,
            },
            security: SecuritySettings {
                two_factor_auth: true,
                session_timeout: 60,
                password_expiry: 90,
                login_attempts: 5,
                ip_whitelist: "192.168.1.0/24".to_string(),
                encryption_level: "AES-256".to_string(),
            },
            monitoring: MonitoringSettings {
                data_retention: 365,
                sampling_rate: 60,
                alert_delay: 5,
                auto_scaling: true,
                predictive_analytics: true,
                real_time_updates: true,
            },
            integrations: IntegrationSettings {
                api_key: "ct-api-key-****-****-****-1234".to_string(),
                webhook_url: "https://api.coretechit.com/webhooks".to_string(),
                slack_integration: false,
                teams_integration: true,
                email_integration: true,
            },
        }
    }
}

impl Settings {
    /// Check numeric ranges, reporting every failed field
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: u32| {
            if value == 0 {
                errors.push(FieldError::new(field, "Must be greater than 0"));
            }
        };

        positive("general.refreshInterval", self.general.refresh_interval);
        positive("security.sessionTimeout", self.security.session_timeout);
        positive("security.passwordExpiry", self.security.password_expiry);
        positive("security.loginAttempts", self.security.login_attempts);
        positive("monitoring.dataRetention", self.monitoring.data_retention);
        positive("monitoring.samplingRate", self.monitoring.sampling_rate);

        if self.notifications.alert_threshold > 100 {
            errors.push(FieldError::new(
                "notifications.alertThreshold",
                "Must be between 0 and 100",
            ));
        }
        if self.general.company_name.trim().is_empty() {
            errors.push(FieldError::new("general.companyName", "Company name is required"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

/// Holds the saved settings and runs the save round trip
#[derive(Debug, Clone)]
pub struct SettingsStore {
    saved: Arc<RwLock<Settings>>,
    busy: BusyFlag,
    save_delay: Duration,
}

impl SettingsStore {
    /// Start from the defaults
    pub fn new(save_delay: Duration) -> Self {
        Self {
            saved: Arc::new(RwLock::new(Settings::default())),
            busy: BusyFlag::new(),
            save_delay,
        }
    }

    /// Use the configured save delay
    pub fn from_config(config: &SettingsConfig) -> Self {
        Self::new(config.save_delay)
    }

    /// Last saved settings
    pub fn current(&self) -> Settings {
        self.saved.read().clone()
    }

    /// Whether a save is in flight
    pub fn is_saving(&self) -> bool {
        self.busy.is_busy()
    }

    /// Save after the simulated round trip. A save already in flight
    /// rejects this one; a cancelled save leaves the previous settings.
    pub async fn save(&self, settings: Settings) -> Result<()> {
        let _guard = self.busy.try_acquire("save settings")?;
        settings.validate()?;

        tokio::time::sleep(self.save_delay).await;

        *self.saved.write() = settings;
        info!("Settings saved");
        Ok(())
    }

    /// Settings export file for `date`
    pub fn export(&self, date: NaiveDate) -> Result<ExportFile> {
        let contents = export_json(&self.current())?;
        Ok(ExportFile::new(
            ReportKind::Settings,
            ExportFormat::Json,
            date,
            contents,
        ))
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::from_config(&SettingsConfig::default())
    }
}
