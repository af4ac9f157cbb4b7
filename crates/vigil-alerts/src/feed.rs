//! Bounded alert list

use crate::alert::{Alert, Severity};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Newest-first list of at most `capacity` alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertFeed {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

/// Point-in-time copy of a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFeedSnapshot {
    /// Alerts, newest first
    pub alerts: Vec<Alert>,
    /// Alerts not yet acknowledged
    pub unacknowledged: usize,
}

impl AlertFeed {
    /// Create an empty feed. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a feed seeded with alerts given newest first
    pub fn with_alerts(capacity: usize, alerts: impl IntoIterator<Item = Alert>) -> Self {
        let mut feed = Self::new(capacity);
        feed.alerts.extend(alerts);
        feed.alerts.truncate(feed.capacity);
        feed
    }

    /// Maximum retained alerts
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of alerts
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether the feed is empty
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Alerts, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter()
    }

    /// Look up an alert
    pub fn get(&self, id: u64) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    /// Largest id present
    pub fn max_id(&self) -> Option<u64> {
        self.alerts.iter().map(|a| a.id).max()
    }

    /// Prepend an alert, dropping the oldest beyond capacity.
    /// Returns the evicted alert, if any.
    pub fn push(&mut self, alert: Alert) -> Option<Alert> {
        self.alerts.push_front(alert);
        if self.alerts.len() > self.capacity {
            self.alerts.pop_back()
        } else {
            None
        }
    }

    /// Mark an alert acknowledged. Returns false when the id is absent.
    /// Acknowledging twice is harmless.
    pub fn acknowledge(&mut self, id: u64) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                if !alert.acknowledged {
                    alert.acknowledged = true;
                    debug!(alert_id = id, "Alert acknowledged");
                }
                true
            }
            None => false,
        }
    }

    /// Remove an alert. Absent ids are a no-op.
    pub fn dismiss(&mut self, id: u64) -> Option<Alert> {
        let index = self.alerts.iter().position(|a| a.id == id)?;
        let removed = self.alerts.remove(index);
        debug!(alert_id = id, "Alert dismissed");
        removed
    }

    /// Acknowledge every alert, returning how many changed
    pub fn acknowledge_all(&mut self) -> usize {
        let mut changed = 0;
        for alert in self.alerts.iter_mut().filter(|a| !a.acknowledged) {
            alert.acknowledged = true;
            changed += 1;
        }
        changed
    }

    /// Alerts still awaiting acknowledgement
    pub fn unacknowledged_count(&self) -> usize {
        self.alerts.iter().filter(|a| !a.acknowledged).count()
    }

    /// Alerts of one severity, newest first
    pub fn by_severity(&self, severity: Severity) -> Vec<&Alert> {
        self.alerts.iter().filter(|a| a.severity == severity).collect()
    }

    /// Copy the current list
    pub fn snapshot(&self) -> AlertFeedSnapshot {
        AlertFeedSnapshot {
            alerts: self.alerts.iter().cloned().collect(),
            unacknowledged: self.unacknowledged_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alert(id: u64) -> Alert {
        Alert::new(id, Severity::Info, "t", "m", "s", Utc::now())
    }

    fn seeded() -> AlertFeed {
        AlertFeed::with_alerts(10, Alert::fixtures(Utc::now()))
    }

    #[test]
    fn test_push_prepends_and_truncates() {
        let mut feed = AlertFeed::new(3);
        assert!(feed.push(alert(1)).is_none());
        feed.push(alert(2));
        feed.push(alert(3));
        let evicted = feed.push(alert(4));

        assert_eq!(evicted.map(|a| a.id), Some(1));
        assert_eq!(feed.iter().map(|a| a.id).collect::<Vec<_>>(), vec![4, 3, 2]);
    }

    #[test]
    fn test_with_alerts_respects_capacity() {
        let feed = AlertFeed::with_alerts(2, Alert::fixtures(Utc::now()));
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.iter().next().map(|a| a.id), Some(1));
    }

    #[test]
    fn test_dismiss_removes_exactly_one() {
        let mut feed = seeded();
        assert_eq!(feed.dismiss(2).map(|a| a.id), Some(2));
        assert_eq!(feed.len(), 4);
        assert!(feed.get(2).is_none());

        // Second dismissal is a no-op
        assert!(feed.dismiss(2).is_none());
        assert_eq!(feed.len(), 4);
    }

    #[test]
    fn test_acknowledge_is_idempotent() {
        let mut feed = seeded();
        assert_eq!(feed.unacknowledged_count(), 4);

        assert!(feed.acknowledge(1));
        assert!(feed.acknowledge(1));
        assert_eq!(feed.unacknowledged_count(), 3);
        assert!(feed.get(1).unwrap().acknowledged);

        assert!(!feed.acknowledge(999));
        assert_eq!(feed.len(), 5);
    }

    #[test]
    fn test_acknowledge_all() {
        let mut feed = seeded();
        assert_eq!(feed.acknowledge_all(), 4);
        assert_eq!(feed.unacknowledged_count(), 0);
        assert_eq!(feed.acknowledge_all(), 0);
    }

    #[test]
    fn test_snapshot_and_severity_filter() {
        let feed = seeded();
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.alerts.len(), 5);
        assert_eq!(snapshot.unacknowledged, 4);
        assert_eq!(feed.by_severity(Severity::Warning).len(), 2);
        assert_eq!(feed.max_id(), Some(5));
    }

    #[test]
    fn test_zero_capacity_keeps_newest() {
        let mut feed = AlertFeed::new(0);
        feed.push(alert(1));
        feed.push(alert(2));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.iter().next().map(|a| a.id), Some(2));
    }
}
