//! CSV and JSON export
//!
//! CSV output joins fields with `,` and rows with `\n`, header first, with no
//! trailing newline. Fields are written verbatim; embedded commas and quotes
//! are not escaped.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use vigil_core::{Error, Result};
use vigil_telemetry::{FleetSnapshot, MetricSnapshot, RiskHorizon, Timeframe};

/// Header of the system report
pub const SYSTEM_REPORT_HEADER: [&str; 4] = ["Component", "Risk Score", "Status", "Last Updated"];

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}

impl ExportFormat {
    /// File extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::Config(format!("Unknown export format: {other}"))),
        }
    }
}

/// Downloadable report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// Fleet risk table
    SystemReport,
    /// Analytics KPIs and predictions
    AnalyticsReport,
    /// Settings groups
    Settings,
}

impl ReportKind {
    /// Filename prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            ReportKind::SystemReport => "system-report",
            ReportKind::AnalyticsReport => "analytics-report",
            ReportKind::Settings => "coretechit-settings",
        }
    }

    /// Format the dashboard produces for this report
    pub fn default_format(&self) -> ExportFormat {
        match self {
            ReportKind::SystemReport => ExportFormat::Csv,
            ReportKind::AnalyticsReport | ReportKind::Settings => ExportFormat::Json,
        }
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system-report" => Ok(ReportKind::SystemReport),
            "analytics-report" => Ok(ReportKind::AnalyticsReport),
            "settings" | "coretechit-settings" => Ok(ReportKind::Settings),
            other => Err(Error::Config(format!("Unknown report kind: {other}"))),
        }
    }
}

/// Render rows as CSV
pub fn export_csv<H, R, F>(header: &[H], rows: impl IntoIterator<Item = R>) -> String
where
    H: AsRef<str>,
    R: IntoIterator<Item = F>,
    F: AsRef<str>,
{
    let mut lines = vec![header.iter().map(|h| h.as_ref()).collect::<Vec<&str>>().join(",")];
    for row in rows {
        let fields: Vec<String> = row.into_iter().map(|f| f.as_ref().to_string()).collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// Render a value as two-space pretty JSON
pub fn export_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// `<prefix>-<YYYY-MM-DD>.<ext>`
pub fn export_filename(prefix: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!("{prefix}-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Export text together with its filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested filename
    pub filename: String,
    /// File contents
    pub contents: String,
}

impl ExportFile {
    /// Name a rendered report for `date`
    pub fn new(kind: ReportKind, format: ExportFormat, date: NaiveDate, contents: String) -> Self {
        Self {
            filename: export_filename(kind.prefix(), date, format),
            contents,
        }
    }

    /// Write into `dir`, returning the full path
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, &self.contents)?;
        info!(path = %path.display(), bytes = self.contents.len(), "Export written");
        Ok(path)
    }
}

/// System report rows, one per component
pub fn system_report_rows(fleet: &FleetSnapshot, now: DateTime<Utc>) -> Vec<Vec<String>> {
    fleet
        .components
        .iter()
        .map(|c| {
            vec![
                c.name().to_string(),
                format!("{}%", c.risk_score()),
                c.risk_level().label().to_string(),
                c.last_updated_label(now),
            ]
        })
        .collect()
}

/// System report as CSV
pub fn system_report_csv(fleet: &FleetSnapshot, now: DateTime<Utc>) -> String {
    export_csv(&SYSTEM_REPORT_HEADER, system_report_rows(fleet, now))
}

/// KPI block of the analytics report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetrics {
    /// Performance score, percent
    pub performance_score: f64,
    /// System efficiency, percent
    pub system_efficiency: f64,
    /// Predicted failures
    pub predicted_failures: f64,
    /// Cost optimisation, percent
    pub cost_optimization: f64,
}

impl AnalyticsMetrics {
    /// Read the KPIs from an analytics snapshot
    pub fn from_snapshot(snapshot: &MetricSnapshot) -> Result<Self> {
        let get = |name: &str| {
            snapshot
                .get(name)
                .ok_or_else(|| Error::Internal(format!("analytics snapshot lacks '{name}'")))
        };
        Ok(Self {
            performance_score: get("performanceScore")?,
            system_efficiency: get("systemEfficiency")?,
            predicted_failures: get("predictedFailures")?,
            cost_optimization: get("costOptimization")?,
        })
    }
}

/// Analytics report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Generation time
    pub timestamp: DateTime<Utc>,
    /// Selected chart window
    pub timeframe: Timeframe,
    /// KPIs
    pub metrics: AnalyticsMetrics,
    /// Risk horizons
    pub predictions: RiskHorizon,
}

impl AnalyticsReport {
    /// Build the report from the current analytics state
    pub fn new(
        snapshot: &MetricSnapshot,
        timeframe: Timeframe,
        predictions: RiskHorizon,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(Self {
            timestamp: now,
            timeframe,
            metrics: AnalyticsMetrics::from_snapshot(snapshot)?,
            predictions,
        })
    }
}
