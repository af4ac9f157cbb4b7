//! The authenticated dashboard shell

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};
use vigil_alerts::Alert;
use vigil_config::{validate_config, Config};
use vigil_core::{BusyFlag, Error, Result};

use crate::export::{
    export_json, system_report_csv, AnalyticsReport, ExportFile, ExportFormat, ReportKind,
};
use crate::layout::SidebarLayout;
use crate::panel::Panel;
use crate::reports::ReportCatalog;
use crate::settings::SettingsStore;
use crate::view::{Navigator, View};

/// Navigation, sidebar and the mounted panel for one session
#[derive(Debug)]
pub struct Dashboard {
    config: Config,
    navigator: Navigator,
    sidebar: SidebarLayout,
    panel: Panel,
    settings: SettingsStore,
    reports: ReportCatalog,
    refreshing: BusyFlag,
    last_refresh: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl Dashboard {
    /// Open on the overview with its timers running. The configuration is
    /// validated first, so no panel is ever mounted from values that
    /// `load_config` would reject.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: Config) -> Result<Self> {
        validate_config(&config)?;
        let now = Utc::now();
        let panel = Panel::mount_at(View::Dashboard, &config, now)?;
        Ok(Self {
            navigator: Navigator::new(),
            sidebar: SidebarLayout::new(config.layout.mobile_breakpoint),
            settings: SettingsStore::from_config(&config.settings),
            reports: ReportCatalog::fixtures(now),
            refreshing: BusyFlag::new(),
            last_refresh: Arc::new(Mutex::new(None)),
            panel,
            config,
        })
    }

    /// Active view
    pub fn view(&self) -> View {
        self.navigator.current()
    }

    /// Switch view by id. Unknown ids fail with [`Error::InvalidView`] and
    /// keep the current panel mounted.
    pub fn set_view(&mut self, id: &str) -> Result<View> {
        let view: View = id.parse()?;
        self.select(view)?;
        Ok(view)
    }

    /// Switch to `view`, replacing the mounted panel. Reselecting the
    /// active view keeps its panel.
    pub fn select(&mut self, view: View) -> Result<()> {
        if view != self.navigator.current() {
            let released = self.panel.active_tasks();
            self.panel = Panel::mount(view, &self.config)?;
            self.navigator.select(view);
            debug!(view = %view, released, "Previous panel released");
        }
        self.sidebar.on_view_selected();
        Ok(())
    }

    /// Mounted panel
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    /// Mounted panel, mutably
    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    /// Running simulation timers
    pub fn active_tasks(&self) -> usize {
        self.panel.active_tasks()
    }

    /// Sidebar state
    pub fn sidebar(&self) -> &SidebarLayout {
        &self.sidebar
    }

    /// Apply a viewport width, returning whether the sidebar is collapsed
    pub fn resize(&mut self, width: u32) -> bool {
        self.sidebar.on_resize(width)
    }

    /// Toggle the sidebar by hand
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar.toggle()
    }

    /// Settings store
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Report catalog
    pub fn reports(&self) -> &ReportCatalog {
        &self.reports
    }

    /// Report catalog, mutably
    pub fn reports_mut(&mut self) -> &mut ReportCatalog {
        &mut self.reports
    }

    /// Acknowledge an alert in the mounted feed. Returns whether it exists.
    pub fn acknowledge_alert(&self, id: u64) -> bool {
        self.panel
            .alerts()
            .is_some_and(|alerts| alerts.update(|sim| sim.acknowledge(id)))
    }

    /// Dismiss an alert from the mounted feed
    pub fn dismiss_alert(&self, id: u64) -> Option<Alert> {
        self.panel
            .alerts()
            .and_then(|alerts| alerts.update(|sim| sim.dismiss(id)))
    }

    /// Acknowledge every alert in the mounted feed
    pub fn acknowledge_all_alerts(&self) -> usize {
        self.panel
            .alerts()
            .map_or(0, |alerts| alerts.update(|sim| sim.feed_mut().acknowledge_all()))
    }

    /// Whether a refresh is in flight
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.is_busy()
    }

    /// Completion time of the last refresh
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.lock()
    }

    /// Simulated refresh round trip. A refresh already in flight rejects
    /// this one.
    pub async fn refresh(&self) -> Result<DateTime<Utc>> {
        let _guard = self.refreshing.try_acquire("refresh")?;
        tokio::time::sleep(self.config.simulation.refresh_delay).await;

        let now = Utc::now();
        *self.last_refresh.lock() = Some(now);
        info!(view = %self.view(), "Dashboard refreshed");
        Ok(now)
    }

    /// Render a downloadable report from the mounted panel
    pub fn export(
        &self,
        kind: ReportKind,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<ExportFile> {
        let date = now.date_naive();
        let contents = match (kind, format) {
            (ReportKind::SystemReport, _) => {
                let fleet = self.panel.fleet().ok_or_else(|| {
                    Error::Operation(format!("System report is not available on {}", self.view()))
                })?;
                match format {
                    ExportFormat::Csv => system_report_csv(&fleet, now),
                    ExportFormat::Json => export_json(&fleet.components)?,
                }
            }
            (ReportKind::AnalyticsReport, ExportFormat::Json) => {
                let Panel::Analytics(analytics) = &self.panel else {
                    return Err(Error::Operation(format!(
                        "Analytics report is not available on {}",
                        self.view()
                    )));
                };
                let report = AnalyticsReport::new(
                    &analytics.metrics.latest(),
                    analytics.timeframe(),
                    analytics.horizon(),
                    now,
                )?;
                export_json(&report)?
            }
            (ReportKind::Settings, ExportFormat::Json) => return self.settings.export(date),
            (kind, format) => {
                return Err(Error::Operation(format!(
                    "{} cannot be exported as {format}",
                    kind.prefix()
                )))
            }
        };

        info!(kind = kind.prefix(), %format, bytes = contents.len(), "Report exported");
        Ok(ExportFile::new(kind, format, date, contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn dashboard() -> Dashboard {
        let mut config = Config::default();
        config.simulation.seed = Some(11);
        Dashboard::new(config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_on_overview() {
        let dashboard = dashboard();
        assert_eq!(dashboard.view(), View::Dashboard);
        assert_eq!(dashboard.active_tasks(), 4);
        assert!(!dashboard.sidebar().is_collapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_is_rejected_before_mount() {
        let mut config = Config::default();
        config.simulation.fleet_interval = Duration::ZERO;
        let err = Dashboard::new(config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("fleet_interval"));

        let mut config = Config::default();
        config.alerts.max_alerts = 0;
        assert!(Dashboard::new(config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_releases_previous_timers() {
        let mut dashboard = dashboard();
        let mut health = match dashboard.panel() {
            Panel::Overview(p) => p.health.subscribe(),
            other => panic!("unexpected panel {other:?}"),
        };

        dashboard.set_view("settings").unwrap();
        assert_eq!(dashboard.active_tasks(), 0);
        assert!(health.changed().await.is_err());

        dashboard.set_view("components").unwrap();
        assert_eq!(dashboard.active_tasks(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_view_keeps_panel() {
        let mut dashboard = dashboard();
        dashboard.set_view("analytics").unwrap();

        assert!(matches!(dashboard.set_view("billing"), Err(Error::InvalidView(_))));
        assert_eq!(dashboard.view(), View::Analytics);
        assert!(matches!(dashboard.panel(), Panel::Analytics(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_selection_collapses_mobile_sidebar() {
        let mut dashboard = dashboard();
        assert!(dashboard.resize(800));
        assert!(!dashboard.toggle_sidebar());

        dashboard.select(View::Alerts).unwrap();
        assert!(dashboard.sidebar().is_collapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_actions_go_through_handle() {
        let dashboard = dashboard();
        let feed = dashboard.panel().alert_feed().unwrap();
        let id = feed.alerts[0].id;

        assert!(dashboard.acknowledge_alert(id));
        assert!(!dashboard.acknowledge_alert(999));
        let after = dashboard.panel().alert_feed().unwrap();
        assert_eq!(after.unacknowledged, feed.unacknowledged - 1);

        assert_eq!(dashboard.dismiss_alert(id).map(|a| a.id), Some(id));
        assert!(dashboard.dismiss_alert(id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_is_guarded() {
        let dashboard = dashboard();
        let (first, second) = tokio::join!(dashboard.refresh(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            dashboard.refresh().await
        });
        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::OperationInProgress(_))));
        assert!(dashboard.last_refresh().is_some());
        assert!(!dashboard.is_refreshing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_depends_on_view() {
        let mut dashboard = dashboard();
        let now = Utc::now();

        let csv = dashboard
            .export(ReportKind::SystemReport, ExportFormat::Csv, now)
            .unwrap();
        assert!(csv.filename.starts_with("system-report-"));
        assert!(csv.contents.starts_with("Component,Risk Score,Status,Last Updated\n"));

        assert!(dashboard
            .export(ReportKind::AnalyticsReport, ExportFormat::Json, now)
            .is_err());

        dashboard.select(View::Analytics).unwrap();
        let report = dashboard
            .export(ReportKind::AnalyticsReport, ExportFormat::Json, now)
            .unwrap();
        assert!(report.filename.ends_with(".json"));
        let err = dashboard
            .export(ReportKind::Settings, ExportFormat::Csv, now)
            .unwrap_err();
        assert!(matches!(err, Error::Operation(_)));
        assert_eq!(
            err.to_string(),
            "Operation failed: coretechit-settings cannot be exported as csv"
        );
        assert!(dashboard
            .export(ReportKind::Settings, ExportFormat::Json, now)
            .unwrap()
            .filename
            .starts_with("coretechit-settings-"));
    }
}
