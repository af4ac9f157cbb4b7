//! # Vigil Dashboard
//!
//! Headless state for the monitoring dashboard:
//! - View navigation and the responsive sidebar
//! - Per-view panels that own their simulation timers
//! - Settings, the report catalog and CSV/JSON export
//! - The [`App`] shell that gates the dashboard behind a session
//!
//! ```no_run
//! use vigil_auth::LoginRequest;
//! use vigil_config::Config;
//! use vigil_dashboard::App;
//!
//! # async fn run() -> vigil_core::Result<()> {
//! let mut app = App::new(Config::default());
//! app.login(LoginRequest::new("ops@example.com", "secret1", Some("token")))
//!     .await?;
//! if let Some(dashboard) = app.dashboard_mut() {
//!     dashboard.set_view("analytics")?;
//! }
//! app.logout();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod app;
pub mod dashboard;
pub mod export;
pub mod layout;
pub mod panel;
pub mod reports;
pub mod settings;
pub mod view;

pub use app::App;
pub use dashboard::Dashboard;
pub use export::{
    export_csv, export_filename, export_json, system_report_csv, system_report_rows,
    AnalyticsMetrics, AnalyticsReport, ExportFile, ExportFormat, ReportKind, SYSTEM_REPORT_HEADER,
};
pub use layout::SidebarLayout;
pub use panel::{AlertsPanel, AnalyticsPanel, ComponentsPanel, OverviewPanel, Panel};
pub use reports::{Report, ReportCatalog, ReportFilter, ReportStatus, ReportType};
pub use settings::{
    GeneralSettings, IntegrationSettings, MonitoringSettings, NotificationSettings,
    SecuritySettings, Settings, SettingsStore,
};
pub use view::{Navigator, View};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::App;
    pub use crate::dashboard::Dashboard;
    pub use crate::export::{ExportFile, ExportFormat, ReportKind};
    pub use crate::panel::Panel;
    pub use crate::settings::{Settings, SettingsStore};
    pub use crate::view::View;
}
