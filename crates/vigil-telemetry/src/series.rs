//! Synthetic trend series for the analytics and predictive charts

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vigil_core::Error;

/// Left edge of the plot box
const PLOT_LEFT: f64 = 40.0;
/// Plot box width
const PLOT_WIDTH: f64 = 720.0;
/// Baseline (0%) of the plot box
const PLOT_BOTTOM: f64 = 180.0;
/// Plot box height
const PLOT_HEIGHT: f64 = 160.0;

/// Window covered by a trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    /// Last 24 hours, hourly points
    #[serde(rename = "24h")]
    Day,
    /// Last 7 days, daily points
    #[default]
    #[serde(rename = "7d")]
    Week,
    /// Last 30 days, daily points
    #[serde(rename = "30d")]
    Month,
}

impl Timeframe {
    /// Number of points in a series for this window
    pub fn points(&self) -> usize {
        match self {
            Self::Day => 24,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Short identifier (`24h`, `7d`, `30d`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            other => Err(Error::Config(format!("Unknown timeframe: {other}"))),
        }
    }
}

/// Metric plotted by the trend chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMetric {
    /// CPU utilisation
    Cpu,
    /// Memory utilisation
    Memory,
    /// Network throughput
    Network,
    /// Storage utilisation
    Storage,
}

impl TrendMetric {
    /// All metrics in chart order
    pub const ALL: [TrendMetric; 4] = [Self::Cpu, Self::Memory, Self::Network, Self::Storage];

    // (base, frequency, amplitude, jitter, lower, upper)
    fn shape(&self) -> (f64, f64, f64, f64, f64, f64) {
        match self {
            Self::Cpu => (50.0, 0.3, 20.0, 10.0, 20.0, 90.0),
            Self::Memory => (60.0, 0.2, 15.0, 8.0, 30.0, 95.0),
            Self::Network => (85.0, 0.4, 10.0, 5.0, 70.0, 100.0),
            Self::Storage => (65.0, 0.25, 12.0, 6.0, 40.0, 85.0),
        }
    }

    fn generate<R: Rng + ?Sized>(&self, points: usize, rng: &mut R) -> Vec<f64> {
        let (base, freq, amp, jitter, lower, upper) = self.shape();
        (0..points)
            .map(|i| {
                let r: f64 = rng.gen();
                let v = base + (i as f64 * freq).sin() * amp + r * jitter;
                lower.max(upper.min(v))
            })
            .collect()
    }
}

impl FromStr for TrendMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "memory" => Ok(Self::Memory),
            "network" => Ok(Self::Network),
            "storage" => Ok(Self::Storage),
            other => Err(Error::Config(format!("Unknown trend metric: {other}"))),
        }
    }
}

/// Trend series for every chart metric over one timeframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Window the series covers
    pub timeframe: Timeframe,
    /// CPU points
    pub cpu: Vec<f64>,
    /// Memory points
    pub memory: Vec<f64>,
    /// Network points
    pub network: Vec<f64>,
    /// Storage points
    pub storage: Vec<f64>,
}

impl TrendSeries {
    /// Generate a fresh series. Regenerated whenever the timeframe changes.
    pub fn generate<R: Rng + ?Sized>(timeframe: Timeframe, rng: &mut R) -> Self {
        let n = timeframe.points();
        Self {
            timeframe,
            cpu: TrendMetric::Cpu.generate(n, rng),
            memory: TrendMetric::Memory.generate(n, rng),
            network: TrendMetric::Network.generate(n, rng),
            storage: TrendMetric::Storage.generate(n, rng),
        }
    }

    /// Points for one metric
    pub fn metric(&self, metric: TrendMetric) -> &[f64] {
        match metric {
            TrendMetric::Cpu => &self.cpu,
            TrendMetric::Memory => &self.memory,
            TrendMetric::Network => &self.network,
            TrendMetric::Storage => &self.storage,
        }
    }
}

/// Metric shown by the overview's predictive chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictiveMetric {
    /// Likelihood of a failure
    #[default]
    FailureRisk,
    /// Overall performance
    Performance,
    /// Used capacity
    Capacity,
}

impl PredictiveMetric {
    /// All metrics in selector order
    pub const ALL: [PredictiveMetric; 3] = [Self::FailureRisk, Self::Performance, Self::Capacity];

    /// Identifier (`failure_risk`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailureRisk => "failure_risk",
            Self::Performance => "performance",
            Self::Capacity => "capacity",
        }
    }

    /// Selector label
    pub fn label(&self) -> &'static str {
        match self {
            Self::FailureRisk => "Failure Risk",
            Self::Performance => "Performance",
            Self::Capacity => "Capacity",
        }
    }

    // (base, frequency, amplitude, jitter)
    fn shape(&self) -> (f64, f64, f64, f64) {
        match self {
            Self::FailureRisk => (30.0, 0.3, 20.0, 10.0),
            Self::Performance => (85.0, 0.2, 10.0, 5.0),
            Self::Capacity => (65.0, 0.4, 15.0, 8.0),
        }
    }
}

impl fmt::Display for PredictiveMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictiveMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| Error::Config(format!("Unknown predictive metric: {s}")))
    }
}

/// One hourly point of a predictive series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictivePoint {
    /// Start of the hour
    pub timestamp: DateTime<Utc>,
    /// Whole percent, 0-100
    pub value: u8,
}

/// The last 24 hours of one predictive metric, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictiveSeries {
    /// Metric plotted
    pub metric: PredictiveMetric,
    /// Hourly points
    pub points: Vec<PredictivePoint>,
}

impl PredictiveSeries {
    /// Hours covered by a series
    pub const HOURS: usize = 24;

    /// Generate the series ending at `now`. Regenerated whenever the
    /// selected metric changes.
    pub fn generate<R: Rng + ?Sized>(
        metric: PredictiveMetric,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let (base, freq, amp, jitter) = metric.shape();
        let points = (0..Self::HOURS)
            .rev()
            .map(|hours_ago| {
                let r: f64 = rng.gen();
                let v = base + (hours_ago as f64 * freq).sin() * amp + r * jitter;
                PredictivePoint {
                    timestamp: now - Duration::hours(hours_ago as i64),
                    value: v.clamp(0.0, 100.0).round() as u8,
                }
            })
            .collect();
        Self { metric, points }
    }

    /// Values, oldest first
    pub fn values(&self) -> Vec<u8> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Most recent value
    pub fn current(&self) -> Option<u8> {
        self.points.last().map(|p| p.value)
    }

    /// Lowest value
    pub fn min(&self) -> Option<u8> {
        self.points.iter().map(|p| p.value).min()
    }

    /// Highest value
    pub fn max(&self) -> Option<u8> {
        self.points.iter().map(|p| p.value).max()
    }

    /// Rounded mean, 0 for an empty series
    pub fn average(&self) -> u8 {
        if self.points.is_empty() {
            return 0;
        }
        let total: u32 = self.points.iter().map(|p| u32::from(p.value)).sum();
        (f64::from(total) / self.points.len() as f64).round() as u8
    }
}

fn plot_point(index: usize, len: usize, value: f64) -> (f64, f64) {
    let x = if len > 1 {
        PLOT_LEFT + (index as f64 / (len - 1) as f64) * PLOT_WIDTH
    } else {
        PLOT_LEFT
    };
    let y = PLOT_BOTTOM - (value / 100.0) * PLOT_HEIGHT;
    (x, y)
}

fn segments(points: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    points
        .iter()
        .enumerate()
        .map(move |(i, &v)| plot_point(i, points.len(), v))
}

/// SVG path for a percentage series as a line, empty for no points
pub fn line_path(points: &[f64]) -> String {
    segments(points)
        .enumerate()
        .map(|(i, (x, y))| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{cmd} {x:.1} {y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// SVG path for a percentage series as a filled area down to the baseline
pub fn area_path(points: &[f64]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut path = format!("M {PLOT_LEFT:.1} {PLOT_BOTTOM:.1}");
    for (x, y) in segments(points) {
        path.push_str(&format!(" L {x:.1} {y:.1}"));
    }
    path.push_str(&format!(" L {:.1} {PLOT_BOTTOM:.1} Z", PLOT_LEFT + PLOT_WIDTH));
    path
}
