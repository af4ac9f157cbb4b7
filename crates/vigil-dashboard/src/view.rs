//! Dashboard sections and navigation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use vigil_core::{Error, Result};

/// A dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Overview cards, health, risk and alerts
    #[default]
    Dashboard,
    /// Component fleet table
    Components,
    /// KPIs, trends and predictions
    Analytics,
    /// Report catalog
    Reports,
    /// Full alert feed
    Alerts,
    /// Settings groups
    Settings,
}

impl View {
    /// Every view in sidebar order
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::Components,
        View::Analytics,
        View::Reports,
        View::Alerts,
        View::Settings,
    ];

    /// Identifier used in navigation (`dashboard`, `components`, ...)
    pub fn id(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Components => "components",
            View::Analytics => "analytics",
            View::Reports => "reports",
            View::Alerts => "alerts",
            View::Settings => "settings",
        }
    }

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Components => "Components",
            View::Analytics => "Analytics",
            View::Reports => "Reports",
            View::Alerts => "Alerts",
            View::Settings => "Settings",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        View::ALL
            .into_iter()
            .find(|v| v.id() == s)
            .ok_or_else(|| Error::InvalidView(s.to_string()))
    }
}

/// Tracks the active section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    current: View,
}

impl Navigator {
    /// Start on the dashboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Active view
    pub fn current(&self) -> View {
        self.current
    }

    /// Switch by id. Unknown ids fail with [`Error::InvalidView`] and leave
    /// the active view unchanged.
    pub fn set_view(&mut self, id: &str) -> Result<View> {
        let view: View = id.parse()?;
        self.select(view);
        Ok(view)
    }

    /// Switch to a known view. Returns whether the view changed.
    pub fn select(&mut self, view: View) -> bool {
        if self.current == view {
            return false;
        }
        debug!(from = %self.current, to = %view, "View changed");
        self.current = view;
        true
    }
}
