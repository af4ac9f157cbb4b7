//! Alert types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vigil_core::Error;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Needs immediate attention
    Critical,
    /// Degraded
    Warning,
    /// Informational
    Info,
    /// Completed operation
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            other => Err(Error::Config(format!("Unknown alert severity: {other}"))),
        }
    }
}

/// Priority used by the component alert list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority
    Low,
    /// Medium priority
    Medium,
    /// High priority
    High,
}

impl From<Priority> for Severity {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::High => Severity::Critical,
            Priority::Medium => Severity::Warning,
            Priority::Low => Severity::Info,
        }
    }
}

/// A single alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique, strictly increasing id
    pub id: u64,
    /// Severity
    pub severity: Severity,
    /// Short title
    pub title: String,
    /// Detail line
    pub message: String,
    /// When the alert was raised
    pub timestamp: DateTime<Utc>,
    /// Subsystem that raised it
    pub source: String,
    /// Whether an operator acknowledged it
    pub acknowledged: bool,
}

impl Alert {
    /// Create an unacknowledged alert
    pub fn new(
        id: u64,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            severity,
            title: title.into(),
            message: message.into(),
            timestamp,
            source: source.into(),
            acknowledged: false,
        }
    }

    /// Create an alert from a prioritised component alert
    pub fn from_priority(
        id: u64,
        priority: Priority,
        message: impl Into<String>,
        component: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let component = component.into();
        let message = message.into();
        Self::new(id, priority.into(), message.clone(), message, component, timestamp)
    }

    /// The five seed alerts, newest first, timestamped relative to `now`
    pub fn fixtures(now: DateTime<Utc>) -> Vec<Alert> {
        let rows: [(u64, Severity, &str, &str, i64, &str, bool); 5] = [
            (
                1,
                Severity::Critical,
                "Storage Critical",
                "Disk usage at 94% on Server-03",
                2,
                "Storage System",
                false,
            ),
            (
                2,
                Severity::Warning,
                "High CPU Usage",
                "CPU usage at 87% on Web-Server-01",
                5,
                "Web Server",
                false,
            ),
            (
                3,
                Severity::Success,
                "Backup Completed",
                "Daily backup completed successfully",
                15,
                "Backup System",
                true,
            ),
            (
                4,
                Severity::Info,
                "System Update",
                "Security patch available for installation",
                30,
                "Update Manager",
                false,
            ),
            (
                5,
                Severity::Warning,
                "Network Latency",
                "Increased latency detected on network interface",
                45,
                "Network Monitor",
                false,
            ),
        ];

        rows.into_iter()
            .map(|(id, severity, title, message, mins_ago, source, acknowledged)| Alert {
                acknowledged,
                ..Alert::new(
                    id,
                    severity,
                    title,
                    message,
                    source,
                    now - Duration::minutes(mins_ago),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_mapping() {
        assert_eq!(Severity::from(Priority::High), Severity::Critical);
        assert_eq!(Severity::from(Priority::Medium), Severity::Warning);
        assert_eq!(Severity::from(Priority::Low), Severity::Info);

        let alert = Alert::from_priority(9, Priority::High, "Disk failing", "DB-001", Utc::now());
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.source, "DB-001");
        assert!(!alert.acknowledged);
    }

    #[test]
    fn test_fixtures() {
        let now = Utc::now();
        let alerts = Alert::fixtures(now);
        assert_eq!(alerts.len(), 5);
        assert_eq!(alerts[0].title, "Storage Critical");
        assert_eq!(alerts[0].timestamp, now - Duration::minutes(2));
        assert_eq!(alerts.iter().filter(|a| a.acknowledged).count(), 1);
        assert!(alerts[2].acknowledged);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("Critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("fatal".parse::<Severity>().is_err());
    }
}
