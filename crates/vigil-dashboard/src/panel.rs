//! Mounted view content
//!
//! A [`Panel`] owns the simulation handles its view reads from. Dropping the
//! panel drops the handles, which stops their timers.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use tracing::{debug, info};
use vigil_alerts::{Alert, AlertFeed, AlertFeedSnapshot, AlertSimulator};
use vigil_config::Config;
use vigil_core::Result;
use vigil_telemetry::{
    forecast, rng_for, ComponentFleet, FleetSnapshot, ForecastPoint, Inventory, InventorySnapshot,
    MetricGenerator, MetricSnapshot, Prediction, PredictiveMetric, PredictiveSeries, RiskHorizon,
    SimulationHandle, Timeframe, TrendSeries,
};

use crate::view::View;

fn spawn_alerts(config: &Config, now: DateTime<Utc>) -> Result<SimulationHandle<AlertSimulator>> {
    let alerts = &config.alerts;
    let feed = if alerts.seed_fixtures {
        AlertFeed::with_alerts(alerts.max_alerts, Alert::fixtures(now))
    } else {
        AlertFeed::new(alerts.max_alerts)
    };
    let simulator = AlertSimulator::new(feed, alerts.probability)?;
    SimulationHandle::spawn(
        simulator,
        alerts.interval,
        rng_for(config.simulation.seed, "alerts"),
    )
}

fn spawn_fleet(config: &Config, now: DateTime<Utc>) -> Result<SimulationHandle<ComponentFleet>> {
    let sim = &config.simulation;
    SimulationHandle::spawn(
        ComponentFleet::fixtures_at(sim.risk_thresholds, now),
        sim.fleet_interval,
        rng_for(sim.seed, "fleet"),
    )
}

/// Overview cards, live health, risk table, recent alerts and the
/// predictive chart
#[derive(Debug)]
pub struct OverviewPanel {
    /// Overview KPIs
    pub metrics: SimulationHandle<MetricGenerator>,
    /// Live resource health
    pub health: SimulationHandle<MetricGenerator>,
    /// Component risk table
    pub fleet: SimulationHandle<ComponentFleet>,
    /// Recent alerts
    pub alerts: SimulationHandle<AlertSimulator>,
    predictive: PredictiveSeries,
    rng: StdRng,
}

impl OverviewPanel {
    fn mount(config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let sim = &config.simulation;
        let mut rng = rng_for(sim.seed, "predictive");
        Ok(Self {
            metrics: SimulationHandle::spawn(
                MetricGenerator::overview(),
                sim.overview_interval,
                rng_for(sim.seed, "overview"),
            )?,
            health: SimulationHandle::spawn(
                MetricGenerator::live(),
                sim.live_interval,
                rng_for(sim.seed, "live"),
            )?,
            fleet: spawn_fleet(config, now)?,
            alerts: spawn_alerts(config, now)?,
            predictive: PredictiveSeries::generate(PredictiveMetric::default(), now, &mut rng),
            rng,
        })
    }

    /// The three prediction cards
    pub fn predictions(&self) -> Vec<Prediction> {
        Prediction::fixtures()
    }

    /// Predictive chart for the selected metric
    pub fn predictive(&self) -> &PredictiveSeries {
        &self.predictive
    }

    /// Select the predictive chart metric, regenerating the last 24 hours
    pub fn set_predictive_metric(&mut self, metric: PredictiveMetric) -> &PredictiveSeries {
        if metric != self.predictive.metric {
            self.predictive = PredictiveSeries::generate(metric, Utc::now(), &mut self.rng);
            debug!(metric = %metric, "Predictive series regenerated");
        }
        &self.predictive
    }
}

/// Fleet risk table plus the typed component inventory
#[derive(Debug)]
pub struct ComponentsPanel {
    /// Component fleet
    pub fleet: SimulationHandle<ComponentFleet>,
    /// Component inventory; only online items move
    pub inventory: SimulationHandle<Inventory>,
}

impl ComponentsPanel {
    fn mount(config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let sim = &config.simulation;
        Ok(Self {
            fleet: spawn_fleet(config, now)?,
            inventory: SimulationHandle::spawn(
                Inventory::fixtures_at(now),
                sim.fleet_interval,
                rng_for(sim.seed, "inventory"),
            )?,
        })
    }
}

/// KPIs, trend charts and risk horizons
#[derive(Debug)]
pub struct AnalyticsPanel {
    /// Analytics KPIs
    pub metrics: SimulationHandle<MetricGenerator>,
    timeframe: Timeframe,
    trends: TrendSeries,
    rng: StdRng,
}

impl AnalyticsPanel {
    fn mount(config: &Config) -> Result<Self> {
        let sim = &config.simulation;
        let mut rng = rng_for(sim.seed, "trends");
        let timeframe = Timeframe::default();
        Ok(Self {
            metrics: SimulationHandle::spawn(
                MetricGenerator::analytics(),
                sim.analytics_interval,
                rng_for(sim.seed, "analytics"),
            )?,
            trends: TrendSeries::generate(timeframe, &mut rng),
            timeframe,
            rng,
        })
    }

    /// Selected chart window
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Current trend series
    pub fn trends(&self) -> &TrendSeries {
        &self.trends
    }

    /// Change the chart window, regenerating the series
    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> &TrendSeries {
        if timeframe != self.timeframe {
            self.timeframe = timeframe;
            self.trends = TrendSeries::generate(timeframe, &mut self.rng);
            debug!(timeframe = %timeframe, "Trend series regenerated");
        }
        &self.trends
    }

    /// Risk horizon cards
    pub fn horizon(&self) -> RiskHorizon {
        RiskHorizon::default()
    }

    /// Actual-vs-predicted chart data
    pub fn forecast(&self) -> Vec<ForecastPoint> {
        forecast()
    }
}

/// Full alert feed
#[derive(Debug)]
pub struct AlertsPanel {
    /// Alert simulator
    pub alerts: SimulationHandle<AlertSimulator>,
}

/// Content mounted for the active view
#[derive(Debug)]
pub enum Panel {
    /// Dashboard overview
    Overview(OverviewPanel),
    /// Components table
    Components(ComponentsPanel),
    /// Analytics
    Analytics(AnalyticsPanel),
    /// Alerts
    Alerts(AlertsPanel),
    /// Report catalog, no timers
    Reports,
    /// Settings form, no timers
    Settings,
}

impl Panel {
    /// Mount the panel for `view`, starting its simulations.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(view: View, config: &Config) -> Result<Self> {
        Self::mount_at(view, config, Utc::now())
    }

    /// Mount with fixture timestamps relative to `now`
    pub fn mount_at(view: View, config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let panel = match view {
            View::Dashboard => Panel::Overview(OverviewPanel::mount(config, now)?),
            View::Components => Panel::Components(ComponentsPanel::mount(config, now)?),
            View::Analytics => Panel::Analytics(AnalyticsPanel::mount(config)?),
            View::Alerts => Panel::Alerts(AlertsPanel {
                alerts: spawn_alerts(config, now)?,
            }),
            View::Reports => Panel::Reports,
            View::Settings => Panel::Settings,
        };
        info!(view = %view, tasks = panel.active_tasks(), "Panel mounted");
        Ok(panel)
    }

    /// View this panel belongs to
    pub fn view(&self) -> View {
        match self {
            Panel::Overview(_) => View::Dashboard,
            Panel::Components(_) => View::Components,
            Panel::Analytics(_) => View::Analytics,
            Panel::Alerts(_) => View::Alerts,
            Panel::Reports => View::Reports,
            Panel::Settings => View::Settings,
        }
    }

    /// Number of simulation timers still running
    pub fn active_tasks(&self) -> usize {
        let running = |alive: &[bool]| alive.iter().filter(|r| **r).count();
        match self {
            Panel::Overview(p) => running(&[
                p.metrics.is_running(),
                p.health.is_running(),
                p.fleet.is_running(),
                p.alerts.is_running(),
            ]),
            Panel::Components(p) => running(&[p.fleet.is_running(), p.inventory.is_running()]),
            Panel::Analytics(p) => running(&[p.metrics.is_running()]),
            Panel::Alerts(p) => running(&[p.alerts.is_running()]),
            Panel::Reports | Panel::Settings => 0,
        }
    }

    /// Fleet snapshot, if this panel shows the fleet
    pub fn fleet(&self) -> Option<FleetSnapshot> {
        match self {
            Panel::Overview(p) => Some(p.fleet.latest()),
            Panel::Components(p) => Some(p.fleet.latest()),
            _ => None,
        }
    }

    /// Inventory snapshot, if this panel shows the inventory
    pub fn inventory(&self) -> Option<InventorySnapshot> {
        match self {
            Panel::Components(p) => Some(p.inventory.latest()),
            _ => None,
        }
    }

    /// Alert simulator handle, if this panel shows alerts
    pub fn alerts(&self) -> Option<&SimulationHandle<AlertSimulator>> {
        match self {
            Panel::Overview(p) => Some(&p.alerts),
            Panel::Alerts(p) => Some(&p.alerts),
            _ => None,
        }
    }

    /// Alert feed snapshot, if this panel shows alerts
    pub fn alert_feed(&self) -> Option<AlertFeedSnapshot> {
        self.alerts().map(SimulationHandle::latest)
    }

    /// Named metric snapshots published by this panel
    pub fn metric_snapshots(&self) -> Vec<MetricSnapshot> {
        match self {
            Panel::Overview(p) => vec![p.metrics.latest(), p.health.latest()],
            Panel::Analytics(p) => vec![p.metrics.latest()],
            _ => Vec::new(),
        }
    }
}
