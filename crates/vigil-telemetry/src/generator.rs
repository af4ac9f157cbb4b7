//! Named metric generator

use crate::task::Simulation;
use crate::walk::WalkSpec;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use vigil_core::{current_timestamp_ms, Error, Result};

#[derive(Debug, Clone)]
struct MetricField {
    name: String,
    value: f64,
    spec: WalkSpec,
}

/// A set of named metrics walked together on every tick
#[derive(Debug, Clone)]
pub struct MetricGenerator {
    label: String,
    fields: Vec<MetricField>,
    ticks: u64,
}

/// One metric value in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    /// Metric name
    pub name: String,
    /// Current value
    pub value: f64,
    /// Declared lower bound
    pub lower: f64,
    /// Declared upper bound
    pub upper: f64,
}

/// Point-in-time copy of a generator, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Generator label
    pub label: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Number of ticks applied so far
    pub tick: u64,
    /// Readings
    pub readings: Vec<MetricReading>,
}

impl MetricSnapshot {
    /// Look up a reading by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.readings
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value)
    }
}

impl MetricGenerator {
    /// Create an empty generator
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fields: Vec::new(),
            ticks: 0,
        }
    }

    /// Add a walked metric. Names must be unique and the initial value must lie in bounds.
    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        initial: f64,
        spec: WalkSpec,
    ) -> Result<()> {
        let name = name.into();
        spec.validate()?;

        if self.fields.iter().any(|f| f.name == name) {
            return Err(Error::Config(format!("duplicate metric '{name}'")));
        }
        if !spec.contains(initial) {
            return Err(Error::Config(format!(
                "initial value {initial} for '{name}' is outside [{}, {}]",
                spec.lower, spec.upper
            )));
        }

        self.fields.push(MetricField {
            name,
            value: initial,
            spec,
        });
        Ok(())
    }

    /// Builder form of [`MetricGenerator::add_field`]
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        initial: f64,
        spec: WalkSpec,
    ) -> Result<Self> {
        self.add_field(name, initial, spec)?;
        Ok(self)
    }

    fn preset(label: &str, fields: &[(&str, f64, WalkSpec)]) -> Self {
        Self {
            label: label.to_string(),
            fields: fields
                .iter()
                .map(|(name, value, spec)| MetricField {
                    name: (*name).to_string(),
                    value: *value,
                    spec: *spec,
                })
                .collect(),
            ticks: 0,
        }
    }

    /// Dashboard overview KPIs
    pub fn overview() -> Self {
        Self::preset(
            "overview",
            &[
                ("overallHealth", 87.0, WalkSpec::continuous(70.0, 100.0, 4.0)),
                ("activeAlerts", 3.0, WalkSpec::discrete(0.0, 10.0, 0.7, 2.0)),
                ("systemsOnline", 24.0, WalkSpec::discrete(20.0, 26.0, 0.3, 2.0)),
                ("totalSystems", 26.0, WalkSpec::continuous(26.0, 26.0, 0.0)),
            ],
        )
    }

    /// Analytics KPIs
    pub fn analytics() -> Self {
        Self::preset(
            "analytics",
            &[
                ("performanceScore", 87.0, WalkSpec::continuous(70.0, 100.0, 4.0)),
                ("systemEfficiency", 92.0, WalkSpec::continuous(80.0, 100.0, 3.0)),
                ("predictedFailures", 3.0, WalkSpec::discrete(0.0, 10.0, 0.7, 2.0)),
                ("costOptimization", 78.0, WalkSpec::continuous(60.0, 100.0, 5.0)),
            ],
        )
    }

    /// Live system health
    pub fn live() -> Self {
        Self::preset(
            "live",
            &[
                ("overall", 87.0, WalkSpec::continuous(70.0, 100.0, 4.0)),
                ("cpu", 45.0, WalkSpec::continuous(20.0, 100.0, 8.0)),
                ("memory", 67.0, WalkSpec::continuous(30.0, 100.0, 6.0)),
                ("storage", 34.0, WalkSpec::continuous(20.0, 100.0, 3.0)),
                ("network", 92.0, WalkSpec::continuous(80.0, 100.0, 5.0)),
            ],
        )
    }

    /// Generator label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Walk every field once
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for field in &mut self.fields {
            field.value = field.spec.next(field.value, rng);
        }
        self.ticks += 1;
    }

    /// Current value of a field
    pub fn value(&self, name: &str) -> Option<f64> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value)
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Number of ticks applied
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Copy the current values
    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            label: self.label.clone(),
            timestamp: current_timestamp_ms(),
            tick: self.ticks,
            readings: self
                .fields
                .iter()
                .map(|f| MetricReading {
                    name: f.name.clone(),
                    value: f.value,
                    lower: f.spec.lower,
                    upper: f.spec.upper,
                })
                .collect(),
        }
    }
}

impl Simulation for MetricGenerator {
    type Snapshot = MetricSnapshot;

    fn name(&self) -> &str {
        &self.label
    }

    fn step(&mut self, rng: &mut StdRng) {
        self.tick(rng);
    }

    fn snapshot(&self) -> MetricSnapshot {
        MetricGenerator::snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_presets_start_in_bounds() {
        for generator in [
            MetricGenerator::overview(),
            MetricGenerator::analytics(),
            MetricGenerator::live(),
        ] {
            for reading in generator.snapshot().readings {
                assert!(
                    reading.value >= reading.lower && reading.value <= reading.upper,
                    "{}: {}",
                    reading.name,
                    reading.value
                );
            }
        }
    }

    #[test]
    fn test_presets_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut generators = [
            MetricGenerator::overview(),
            MetricGenerator::analytics(),
            MetricGenerator::live(),
        ];
        for _ in 0..1_000 {
            for generator in &mut generators {
                generator.tick(&mut rng);
            }
        }
        for generator in &generators {
            assert_eq!(generator.ticks(), 1_000);
            for reading in generator.snapshot().readings {
                assert!(reading.value >= reading.lower && reading.value <= reading.upper);
            }
        }
    }

    #[test]
    fn test_live_bounds_match_dashboard() {
        let snapshot = MetricGenerator::live().snapshot();
        let cpu = snapshot.readings.iter().find(|r| r.name == "cpu").unwrap();
        assert_eq!((cpu.lower, cpu.upper), (20.0, 100.0));
        let network = snapshot.readings.iter().find(|r| r.name == "network").unwrap();
        assert_eq!((network.lower, network.upper), (80.0, 100.0));
        assert_eq!(snapshot.get("storage"), Some(34.0));
    }

    #[test]
    fn test_constant_field_never_moves() {
        let mut generator = MetricGenerator::overview();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            generator.tick(&mut rng);
        }
        assert_eq!(generator.value("totalSystems"), Some(26.0));
    }

    #[test]
    fn test_add_field_validation() {
        let generator = MetricGenerator::new("custom")
            .with_field("cpu", 50.0, WalkSpec::continuous(20.0, 100.0, 10.0))
            .unwrap();
        assert_eq!(generator.names().collect::<Vec<_>>(), vec!["cpu"]);

        let dup = generator
            .clone()
            .with_field("cpu", 50.0, WalkSpec::continuous(20.0, 100.0, 10.0));
        assert!(dup.is_err());

        let out_of_bounds = generator
            .clone()
            .with_field("disk", 5.0, WalkSpec::continuous(20.0, 100.0, 10.0));
        assert!(out_of_bounds.is_err());

        let inverted = generator.with_field("net", 50.0, WalkSpec::continuous(100.0, 70.0, 5.0));
        assert!(inverted.is_err());
    }

    #[test]
    fn test_snapshot_lookup_and_order() {
        let snapshot = MetricGenerator::analytics().snapshot();
        assert_eq!(snapshot.label, "analytics");
        assert_eq!(snapshot.get("systemEfficiency"), Some(92.0));
        assert_eq!(snapshot.get("missing"), None);
        let names: Vec<_> = snapshot.readings.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "performanceScore",
                "systemEfficiency",
                "predictedFailures",
                "costOptimization"
            ]
        );
    }
}
