//! Probabilistic alert synthesis

use crate::alert::{Alert, Severity};
use crate::feed::{AlertFeed, AlertFeedSnapshot};
use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use vigil_core::{current_timestamp_ms, Error, Result};
use vigil_telemetry::Simulation;

const SEVERITIES: [Severity; 3] = [Severity::Warning, Severity::Info, Severity::Critical];
const TITLES: [&str; 3] = ["Memory Usage High", "Network Spike", "Service Restart"];
const SOURCES: [&str; 3] = ["Database", "Web Server", "Network"];
const MESSAGE: &str = "Automated system alert generated";

/// Wraps an [`AlertFeed`] and occasionally prepends a synthetic alert
#[derive(Debug, Clone)]
pub struct AlertSimulator {
    feed: AlertFeed,
    probability: f64,
    last_id: u64,
    ticks: u64,
}

impl AlertSimulator {
    /// Create a simulator over `feed` raising an alert with `probability` per tick
    pub fn new(feed: AlertFeed, probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::Config(format!(
                "alert probability must be within [0, 1] (got {probability})"
            )));
        }
        let last_id = feed.max_id().unwrap_or(0);
        Ok(Self {
            feed,
            probability,
            last_id,
            ticks: 0,
        })
    }

    /// Feed state
    pub fn feed(&self) -> &AlertFeed {
        &self.feed
    }

    /// Mutable feed state, for acknowledge and dismiss
    pub fn feed_mut(&mut self) -> &mut AlertFeed {
        &mut self.feed
    }

    /// Ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Acknowledge an alert
    pub fn acknowledge(&mut self, id: u64) -> bool {
        self.feed.acknowledge(id)
    }

    /// Dismiss an alert
    pub fn dismiss(&mut self, id: u64) -> Option<Alert> {
        self.feed.dismiss(id)
    }

    /// Next id: the clock in milliseconds, bumped past the previous id if the
    /// clock has not advanced
    fn next_id(&mut self, now_ms: u64) -> u64 {
        let id = now_ms.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    /// Run one tick at `now_ms`. Returns the id of the synthesized alert, if any.
    pub fn tick_at<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: u64) -> Option<u64> {
        self.ticks += 1;

        let roll: f64 = rng.gen();
        if roll >= self.probability {
            return None;
        }

        let severity = *SEVERITIES.choose(rng)?;
        let title = *TITLES.choose(rng)?;
        let source = *SOURCES.choose(rng)?;
        let id = self.next_id(now_ms);
        let timestamp: DateTime<Utc> = Utc
            .timestamp_millis_opt(now_ms as i64)
            .single()
            .unwrap_or_else(Utc::now);

        self.feed
            .push(Alert::new(id, severity, title, MESSAGE, source, timestamp));
        info!(alert_id = id, severity = %severity, title, source, "Alert raised");
        Some(id)
    }
}

impl Simulation for AlertSimulator {
    type Snapshot = AlertFeedSnapshot;

    fn name(&self) -> &str {
        "alerts"
    }

    fn step(&mut self, rng: &mut StdRng) {
        self.tick_at(rng, current_timestamp_ms());
    }

    fn snapshot(&self) -> AlertFeedSnapshot {
        self.feed.snapshot()
    }
}
