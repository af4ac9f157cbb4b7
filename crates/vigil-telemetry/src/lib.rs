//! # Vigil Telemetry
//!
//! Synthetic telemetry for the dashboard. Nothing here measures a real system:
//! - Bounded random walks for named metrics
//! - The monitored component fleet and its risk scores
//! - The typed component inventory behind the components view
//! - Sine-based trend series for the analytics and predictive charts
//! - Fixed predictive-analytics cards
//! - Owned, cancellable simulation tasks that publish snapshots

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod fleet;
pub mod generator;
pub mod inventory;
pub mod predictions;
pub mod series;
pub mod task;
pub mod walk;

pub use fleet::{ComponentFleet, ComponentMetrics, FleetFilter, FleetSnapshot, SystemComponent};
pub use generator::{MetricGenerator, MetricReading, MetricSnapshot};
pub use inventory::{
    ComponentKind, Inventory, InventoryFilter, InventoryItem, InventorySnapshot, InventoryStatus,
};
pub use predictions::{forecast, ForecastPoint, HorizonRisk, Prediction, RiskHorizon, Trend};
pub use series::{
    area_path, line_path, PredictiveMetric, PredictivePoint, PredictiveSeries, Timeframe,
    TrendMetric, TrendSeries,
};
pub use task::{rng_for, Simulation, SimulationHandle};
pub use walk::{Step, WalkSpec};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::fleet::{ComponentFleet, FleetFilter, FleetSnapshot, SystemComponent};
    pub use crate::generator::{MetricGenerator, MetricSnapshot};
    pub use crate::inventory::{Inventory, InventoryFilter, InventorySnapshot};
    pub use crate::predictions::{Prediction, RiskHorizon};
    pub use crate::series::{
        PredictiveMetric, PredictiveSeries, Timeframe, TrendMetric, TrendSeries,
    };
    pub use crate::task::{Simulation, SimulationHandle};
    pub use crate::walk::{Step, WalkSpec};
}
