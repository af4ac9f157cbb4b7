//! Report catalog shown on the reports view

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::{Error, Result};

/// Report subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Performance metrics
    Performance,
    /// Security audit
    Security,
    /// Capacity planning
    Capacity,
    /// Regulatory compliance
    Compliance,
    /// User-defined export
    Custom,
}

/// Report generation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Ready to download
    Completed,
    /// Being generated
    Generating,
    /// Waiting for its schedule
    Scheduled,
    /// Generation failed
    Failed,
}

/// A catalogued report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report id
    pub id: String,
    /// Display name
    pub name: String,
    /// Subject
    #[serde(rename = "type")]
    pub kind: ReportType,
    /// Generation state
    pub status: ReportStatus,
    /// Creation (or scheduled) time
    pub created_at: DateTime<Utc>,
    /// Human-readable size
    pub size: String,
    /// File format label (`PDF`, `CSV`, `JSON`, `Excel`)
    pub format: String,
    /// One-line description
    pub description: String,
    /// Recurrence, if scheduled
    pub schedule: Option<String>,
}

/// Filter for the report list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Case-insensitive substring of the name or description
    pub search: String,
    /// Only this subject
    pub kind: Option<ReportType>,
    /// Only this state
    pub status: Option<ReportStatus>,
}

impl ReportFilter {
    fn matches(&self, report: &Report) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = report.name.to_lowercase().contains(&needle)
            || report.description.to_lowercase().contains(&needle);
        matches_search
            && self.kind.map_or(true, |k| report.kind == k)
            && self.status.map_or(true, |s| report.status == s)
    }
}

/// In-memory report list
#[derive(Debug, Clone, Default)]
pub struct ReportCatalog {
    reports: Vec<Report>,
}

impl ReportCatalog {
    /// The five fixture reports, dated relative to `now`
    pub fn fixtures(now: DateTime<Utc>) -> Self {
        let report = |id: &str,
                      name: &str,
                      kind,
                      status,
                      created_at,
                      size: &str,
                      format: &str,
                      description: &str,
                      schedule: Option<&str>| Report {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            status,
            created_at,
            size: size.to_string(),
            format: format.to_string(),
            description: description.to_string(),
            schedule: schedule.map(str::to_string),
        };

        Self {
            reports: vec![
                report(
                    "rpt-001",
                    "System Performance Report",
                    ReportType::Performance,
                    ReportStatus::Completed,
                    now - Duration::hours(2),
                    "2.4 MB",
                    "PDF",
                    "Comprehensive analysis of system performance metrics over the last 30 days",
                    Some("Weekly"),
                ),
                report(
                    "rpt-002",
                    "Security Audit Report",
                    ReportType::Security,
                    ReportStatus::Completed,
                    now - Duration::hours(24),
                    "1.8 MB",
                    "PDF",
                    "Security vulnerabilities and compliance status assessment",
                    Some("Monthly"),
                ),
                report(
                    "rpt-003",
                    "Capacity Planning Report",
                    ReportType::Capacity,
                    ReportStatus::Generating,
                    now,
                    "Generating...",
                    "Excel",
                    "Resource utilization trends and capacity forecasting",
                    Some("Quarterly"),
                ),
                report(
                    "rpt-004",
                    "Compliance Report",
                    ReportType::Compliance,
                    ReportStatus::Scheduled,
                    now + Duration::hours(24),
                    "Pending",
                    "PDF",
                    "Regulatory compliance status and audit trail",
                    Some("Monthly"),
                ),
                report(
                    "rpt-005",
                    "Custom Analytics Export",
                    ReportType::Custom,
                    ReportStatus::Failed,
                    now - Duration::hours(6),
                    "Failed",
                    "JSON",
                    "Custom data export with specific metrics and timeframes",
                    None,
                ),
            ],
        }
    }

    /// All reports
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Reports passing `filter`, in catalog order
    pub fn filter(&self, filter: &ReportFilter) -> Vec<&Report> {
        self.reports.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Remove a report. Absent ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Report> {
        let index = self.reports.iter().position(|r| r.id == id)?;
        Some(self.reports.remove(index))
    }

    /// Download filename for a completed report
    pub fn download_name(&self, id: &str) -> Result<String> {
        let report = self
            .reports
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::Operation(format!("Unknown report: {id}")))?;

        if report.status != ReportStatus::Completed {
            return Err(Error::Operation(format!(
                "Report {id} is not ready for download"
            )));
        }

        let stem = report.name.split_whitespace().collect::<Vec<_>>().join("_");
        Ok(format!("{stem}.{}", report.format.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ReportCatalog {
        ReportCatalog::fixtures(Utc::now())
    }

    #[test]
    fn test_filter_by_search_type_and_status() {
        let catalog = catalog();
        assert_eq!(catalog.filter(&ReportFilter::default()).len(), 5);

        let security = catalog.filter(&ReportFilter {
            search: "COMPLIANCE".to_string(),
            ..ReportFilter::default()
        });
        // Matches rpt-002 by description and rpt-004 by name
        assert_eq!(security.len(), 2);

        let completed_pdf = catalog.filter(&ReportFilter {
            search: String::new(),
            kind: Some(ReportType::Performance),
            status: Some(ReportStatus::Completed),
        });
        assert_eq!(completed_pdf.len(), 1);
        assert_eq!(completed_pdf[0].id, "rpt-001");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut catalog = catalog();
        assert!(catalog.delete("rpt-003").is_some());
        assert!(catalog.delete("rpt-003").is_none());
        assert_eq!(catalog.reports().len(), 4);
    }

    #[test]
    fn test_download_name() {
        let catalog = catalog();
        assert_eq!(
            catalog.download_name("rpt-001").unwrap(),
            "System_Performance_Report.pdf"
        );
        assert!(catalog.download_name("rpt-005").is_err());
        assert!(catalog.download_name("rpt-999").is_err());
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_value(&catalog().reports()[0]).unwrap();
        assert_eq!(json["type"], "performance");
        assert_eq!(json["createdAt"].as_str().map(|s| s.is_empty()), Some(false));
    }
}
