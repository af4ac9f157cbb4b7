//! Component inventory for the components view
//!
//! Eight typed components with an operational status. Only `online`
//! components have their utilisation walked; everything else keeps the
//! values it had when it left service.

use crate::fleet::{CPU_WALK, MEMORY_WALK};
use crate::task::Simulation;
use crate::walk::WalkSpec;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vigil_core::Error;

const NETWORK_WALK: WalkSpec = WalkSpec::continuous(70.0, 100.0, 5.0);

/// Kind of infrastructure an inventory item is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// Application or web server
    Server,
    /// Database instance
    Database,
    /// Router, switch or other network gear
    Network,
    /// Storage array
    Storage,
    /// Firewall or other security appliance
    Security,
}

impl ComponentKind {
    /// All kinds in filter order
    pub const ALL: [ComponentKind; 5] = [
        Self::Server,
        Self::Database,
        Self::Network,
        Self::Storage,
        Self::Security,
    ];

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Database => "database",
            Self::Network => "network",
            Self::Storage => "storage",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("Unknown component type: {s}")))
    }
}

/// Operational status of an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    /// In service; the only status whose metrics move
    Online,
    /// Down
    Offline,
    /// In service but degraded
    Warning,
    /// Taken out of service on purpose
    Maintenance,
}

impl InventoryStatus {
    /// All statuses in filter order
    pub const ALL: [InventoryStatus; 4] = [
        Self::Online,
        Self::Offline,
        Self::Warning,
        Self::Maintenance,
    ];

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Warning => "warning",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InventoryStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("Unknown inventory status: {s}")))
    }
}

/// One row of the components view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Identifier (`srv-001`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of component
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Operational status
    pub status: InventoryStatus,
    /// CPU utilisation percent
    pub cpu: f64,
    /// Memory utilisation percent
    pub memory: f64,
    /// Disk utilisation percent
    pub disk: f64,
    /// Network availability percent
    pub network: f64,
    /// Uptime as shown (`15d 4h 23m`)
    pub uptime: String,
    /// Last time the item reported
    pub last_update: DateTime<Utc>,
    /// Physical location
    pub location: String,
    /// Management address
    pub ip: String,
}

impl InventoryItem {
    /// `last_update` rendered relative to `now`: `Just now`, `5m ago`,
    /// `3h ago`, or the date once a day has passed
    pub fn last_update_label(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.last_update).num_minutes().max(0);
        if minutes < 1 {
            "Just now".to_string()
        } else if minutes < 60 {
            format!("{minutes}m ago")
        } else if minutes / 60 < 24 {
            format!("{}h ago", minutes / 60)
        } else {
            self.last_update.format("%Y-%m-%d").to_string()
        }
    }

    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) {
        if self.status != InventoryStatus::Online {
            return;
        }
        self.cpu = CPU_WALK.next(self.cpu, rng);
        self.memory = MEMORY_WALK.next(self.memory, rng);
        self.network = NETWORK_WALK.next(self.network, rng);
        self.last_update = now;
    }
}

/// Search, type and status filter for the inventory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Case-insensitive substring of the name or location, or a substring
    /// of the ip; empty matches all
    pub search: String,
    /// Only items of this kind
    pub kind: Option<ComponentKind>,
    /// Only items with this status
    pub status: Option<InventoryStatus>,
}

impl InventoryFilter {
    /// Whether an item passes every set criterion
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if self.kind.is_some_and(|kind| item.kind != kind) {
            return false;
        }
        if self.status.is_some_and(|status| item.status != status) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        item.name.to_lowercase().contains(&needle)
            || item.ip.contains(&self.search)
            || item.location.to_lowercase().contains(&needle)
    }
}

/// Point-in-time copy of the inventory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Ticks applied so far
    pub tick: u64,
    /// Items in fixture order
    pub items: Vec<InventoryItem>,
}

impl InventorySnapshot {
    /// Number of items with `status`
    pub fn count(&self, status: InventoryStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    /// Items passing `filter`, in fixture order
    pub fn filter(&self, filter: &InventoryFilter) -> Vec<&InventoryItem> {
        self.items.iter().filter(|i| filter.matches(i)).collect()
    }
}

/// The simulated component inventory
#[derive(Debug, Clone)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    ticks: u64,
}

impl Inventory {
    /// Build from explicit items
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items, ticks: 0 }
    }

    /// The eight fixture items, reporting relative to `now`
    pub fn fixtures_at(now: DateTime<Utc>) -> Self {
        use ComponentKind::*;
        use InventoryStatus::*;

        #[rustfmt::skip]
        let rows = [
            ("srv-001", "Web Server 01", Server, Online, [45.0, 67.0, 34.0, 89.0], "15d 4h 23m", "Data Center A", "192.168.1.10"),
            ("srv-002", "Web Server 02", Server, Warning, [87.0, 92.0, 45.0, 78.0], "8d 12h 45m", "Data Center A", "192.168.1.11"),
            ("db-001", "Primary Database", Database, Online, [23.0, 56.0, 78.0, 95.0], "45d 2h 12m", "Data Center B", "192.168.2.10"),
            ("db-002", "Backup Database", Database, Maintenance, [12.0, 34.0, 67.0, 88.0], "0d 0h 0m", "Data Center B", "192.168.2.11"),
            ("net-001", "Core Router", Network, Online, [34.0, 45.0, 23.0, 98.0], "89d 15h 30m", "Network Room", "192.168.0.1"),
            ("stor-001", "Storage Array 01", Storage, Warning, [56.0, 78.0, 94.0, 87.0], "23d 8h 15m", "Data Center A", "192.168.3.10"),
            ("sec-001", "Firewall Primary", Security, Online, [28.0, 42.0, 15.0, 96.0], "67d 3h 45m", "Security Zone", "192.168.0.2"),
            ("srv-003", "Application Server", Server, Offline, [0.0, 0.0, 0.0, 0.0], "0d 0h 0m", "Data Center C", "192.168.1.12"),
        ];

        let items = rows
            .into_iter()
            .map(|(id, name, kind, status, [cpu, memory, disk, network], uptime, location, ip)| {
                // The offline server stopped reporting half an hour ago
                let last_update = if status == Offline {
                    now - Duration::minutes(30)
                } else {
                    now
                };
                InventoryItem {
                    id: id.to_string(),
                    name: name.to_string(),
                    kind,
                    status,
                    cpu,
                    memory,
                    disk,
                    network,
                    uptime: uptime.to_string(),
                    last_update,
                    location: location.to_string(),
                    ip: ip.to_string(),
                }
            })
            .collect();

        Self::new(items)
    }

    /// All items in fixture order
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Look up an item by id
    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Mutable lookup by id
    pub fn get_mut(&mut self, id: &str) -> Option<&mut InventoryItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Items passing `filter`, in fixture order
    pub fn filter(&self, filter: &InventoryFilter) -> Vec<&InventoryItem> {
        self.items.iter().filter(|i| filter.matches(i)).collect()
    }

    /// Walk every online item once
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let now = Utc::now();
        for item in &mut self.items {
            item.step(rng, now);
        }
        self.ticks += 1;
    }

    /// Ticks applied so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Copy the current state
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            timestamp: Utc::now().timestamp_millis(),
            tick: self.ticks,
            items: self.items.clone(),
        }
    }
}

impl Simulation for Inventory {
    type Snapshot = InventorySnapshot;

    fn name(&self) -> &str {
        "inventory"
    }

    fn step(&mut self, rng: &mut StdRng) {
        self.tick(rng);
    }

    fn snapshot(&self) -> InventorySnapshot {
        Inventory::snapshot(self)
    }
}
