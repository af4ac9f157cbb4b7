//! Common types used throughout Vigil

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Risk band of a component, derived from its risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score below the medium threshold
    Low,
    /// Score between the medium and high thresholds
    Medium,
    /// Score at or above the high threshold
    High,
}

impl RiskLevel {
    /// Capitalised label used in exports (`Low`, `Medium`, `High`)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Component status shown for this band
    pub fn status(&self) -> ComponentStatus {
        match self {
            Self::Low => ComponentStatus::Healthy,
            Self::Medium => ComponentStatus::Warning,
            Self::High => ComponentStatus::Critical,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Health status of a monitored component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    /// Operating normally
    Healthy,
    /// Elevated risk
    Warning,
    /// Failure likely
    Critical,
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for ComponentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "healthy" => Ok(Self::Healthy),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            other => Err(Error::Config(format!("Unknown component status: {other}"))),
        }
    }
}

/// Threshold table mapping a 0–100 risk score to a [`RiskLevel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Lowest score classified as medium
    pub medium: u8,
    /// Lowest score classified as high
    pub high: u8,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 60,
            high: 80,
        }
    }
}

impl RiskThresholds {
    /// Create a threshold table, rejecting overlapping or out-of-range bands
    pub fn new(medium: u8, high: u8) -> crate::Result<Self> {
        if medium > high || high > 100 {
            return Err(Error::Config(format!(
                "risk thresholds must satisfy medium <= high <= 100 (got {medium}/{high})"
            )));
        }
        Ok(Self { medium, high })
    }

    /// Classify a score
    pub fn classify(&self, score: u8) -> RiskLevel {
        if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Status shown for a score
    pub fn status(&self, score: u8) -> ComponentStatus {
        self.classify(score).status()
    }
}

/// Role granted to a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular operator
    #[default]
    User,
    /// Administrator
    Admin,
}

impl Role {
    /// Derive the role from a submitted email and the configured admin sentinel
    pub fn from_email(email: &str, admin_email: &str) -> Self {
        if email == admin_email {
            Self::Admin
        } else {
            Self::User
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}
