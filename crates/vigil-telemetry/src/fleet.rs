//! Monitored component fleet
//!
//! Six fixture components whose utilisation, risk score and uptime are walked
//! on every tick. A component's status is recomputed from its threshold table
//! whenever the score changes, so the two never disagree.

use crate::task::Simulation;
use crate::walk::WalkSpec;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use vigil_core::{format_relative, ComponentStatus, RiskLevel, RiskThresholds};

pub(crate) const CPU_WALK: WalkSpec = WalkSpec::continuous(10.0, 100.0, 10.0);
pub(crate) const MEMORY_WALK: WalkSpec = WalkSpec::continuous(20.0, 100.0, 8.0);
const RISK_WALK: WalkSpec = WalkSpec::continuous(0.0, 100.0, 6.0);
const UPTIME_WALK: WalkSpec = WalkSpec::continuous(95.0, 100.0, 0.2);

/// Resource utilisation of a component
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetrics {
    /// CPU utilisation percent
    pub cpu: f64,
    /// Memory utilisation percent
    pub memory: f64,
    /// Uptime percent, one decimal
    pub uptime: f64,
}

/// A monitored infrastructure component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemComponent {
    id: String,
    name: String,
    risk_score: u8,
    status: ComponentStatus,
    last_updated: DateTime<Utc>,
    metrics: ComponentMetrics,
    #[serde(skip)]
    thresholds: RiskThresholds,
}

impl SystemComponent {
    /// Create a component; the status is derived from `risk_score`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        risk_score: u8,
        metrics: ComponentMetrics,
        thresholds: RiskThresholds,
        last_updated: DateTime<Utc>,
    ) -> Self {
        let risk_score = risk_score.min(100);
        Self {
            id: id.into(),
            name: name.into(),
            risk_score,
            status: thresholds.status(risk_score),
            last_updated,
            metrics,
            thresholds,
        }
    }

    /// Component identifier (`WEB-001`)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Risk score, 0-100
    pub fn risk_score(&self) -> u8 {
        self.risk_score
    }

    /// Status derived from the risk score
    pub fn status(&self) -> ComponentStatus {
        self.status
    }

    /// Risk band derived from the risk score
    pub fn risk_level(&self) -> RiskLevel {
        self.thresholds.classify(self.risk_score)
    }

    /// Last time the simulator touched this component
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// `last_updated` rendered relative to `now`
    pub fn last_updated_label(&self, now: DateTime<Utc>) -> String {
        format_relative(self.last_updated, now)
    }

    /// Current utilisation
    pub fn metrics(&self) -> ComponentMetrics {
        self.metrics
    }

    /// Set the risk score and refresh the status
    pub fn set_risk_score(&mut self, score: u8) {
        self.risk_score = score.min(100);
        self.status = self.thresholds.status(self.risk_score);
    }

    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) {
        self.metrics.cpu = CPU_WALK.next(self.metrics.cpu, rng);
        self.metrics.memory = MEMORY_WALK.next(self.metrics.memory, rng);
        self.metrics.uptime = (UPTIME_WALK.next(self.metrics.uptime, rng) * 10.0).round() / 10.0;

        let score = RISK_WALK.next(f64::from(self.risk_score), rng).round();
        self.set_risk_score(score as u8);
        self.last_updated = now;
    }
}

/// Search and status filter for the components view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetFilter {
    /// Case-insensitive substring of the id or name; empty matches all
    pub search: String,
    /// Only components with this status
    pub status: Option<ComponentStatus>,
}

impl FleetFilter {
    /// Whether a component passes the filter
    pub fn matches(&self, component: &SystemComponent) -> bool {
        if let Some(status) = self.status {
            if component.status() != status {
                return false;
            }
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        component.name().to_lowercase().contains(&needle)
            || component.id().to_lowercase().contains(&needle)
    }
}

/// Point-in-time copy of the fleet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Ticks applied so far
    pub tick: u64,
    /// Components in fixture order
    pub components: Vec<SystemComponent>,
}

impl FleetSnapshot {
    /// Number of components with `status`
    pub fn count(&self, status: ComponentStatus) -> usize {
        self.components.iter().filter(|c| c.status() == status).count()
    }

    /// Mean risk score, 0 for an empty fleet
    pub fn average_risk(&self) -> f64 {
        average_risk(&self.components)
    }
}

fn average_risk(components: &[SystemComponent]) -> f64 {
    if components.is_empty() {
        return 0.0;
    }
    let total: u32 = components.iter().map(|c| u32::from(c.risk_score())).sum();
    f64::from(total) / components.len() as f64
}

/// The simulated component fleet
#[derive(Debug, Clone)]
pub struct ComponentFleet {
    components: Vec<SystemComponent>,
    ticks: u64,
}

impl ComponentFleet {
    /// Build a fleet from explicit components
    pub fn new(components: Vec<SystemComponent>) -> Self {
        Self {
            components,
            ticks: 0,
        }
    }

    /// The six fixture components, last updated relative to now
    pub fn fixtures(thresholds: RiskThresholds) -> Self {
        Self::fixtures_at(thresholds, Utc::now())
    }

    /// The six fixture components, last updated relative to `now`
    pub fn fixtures_at(thresholds: RiskThresholds, now: DateTime<Utc>) -> Self {
        let rows: [(&str, &str, u8, i64, f64, f64, f64); 6] = [
            ("WEB-001", "Web Server Cluster", 23, 120, 45.0, 62.0, 99.8),
            ("DB-001", "Database Primary", 67, 60, 78.0, 84.0, 99.2),
            ("LB-001", "Load Balancer", 15, 30, 32.0, 41.0, 99.9),
            ("CDN-001", "CDN Gateway", 89, 45, 91.0, 95.0, 97.3),
            ("API-001", "API Gateway", 41, 180, 56.0, 68.0, 99.5),
            ("CACHE-001", "Redis Cache", 8, 60, 23.0, 34.0, 99.9),
        ];

        let components = rows
            .iter()
            .map(|&(id, name, risk, secs_ago, cpu, memory, uptime)| {
                SystemComponent::new(
                    id,
                    name,
                    risk,
                    ComponentMetrics {
                        cpu,
                        memory,
                        uptime,
                    },
                    thresholds,
                    now - Duration::seconds(secs_ago),
                )
            })
            .collect();

        Self::new(components)
    }

    /// All components in fixture order
    pub fn components(&self) -> &[SystemComponent] {
        &self.components
    }

    /// Look up a component by id
    pub fn get(&self, id: &str) -> Option<&SystemComponent> {
        self.components.iter().find(|c| c.id() == id)
    }

    /// Mutable lookup by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SystemComponent> {
        self.components.iter_mut().find(|c| c.id() == id)
    }

    /// Components passing `filter`, in fixture order
    pub fn filter(&self, filter: &FleetFilter) -> Vec<&SystemComponent> {
        self.components.iter().filter(|c| filter.matches(c)).collect()
    }

    /// Mean risk score
    pub fn average_risk(&self) -> f64 {
        average_risk(&self.components)
    }

    /// Walk every component once
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let now = Utc::now();
        for component in &mut self.components {
            component.step(rng, now);
        }
        self.ticks += 1;
    }

    /// Ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Copy the current state
    pub fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            timestamp: Utc::now().timestamp_millis(),
            tick: self.ticks,
            components: self.components.clone(),
        }
    }
}

impl Simulation for ComponentFleet {
    type Snapshot = FleetSnapshot;

    fn name(&self) -> &str {
        "fleet"
    }

    fn step(&mut self, rng: &mut StdRng) {
        self.tick(rng);
    }

    fn snapshot(&self) -> FleetSnapshot {
        ComponentFleet::snapshot(self)
    }
}
