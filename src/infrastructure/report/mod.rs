//! CSV report output
//!
//! The audit emits two artifacts per run: a consolidated per-endpoint report
//! and a per-API summary. Filenames carry a timestamp so successive runs
//! never clobber each other.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::domain::entities::{ApiAuditResult, ReportRow};

/// Report column order; kept in sync with [`ReportRow`] field order
const REPORT_HEADER: [&str; 10] = [
    "api",
    "method",
    "path",
    "is_authorized",
    "authorization_type",
    "specific_auth_type",
    "authorizer_name",
    "api_key",
    "whitelist",
    "endpoint_url",
];

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

/// Destination for audit report rows.
///
/// The audit appends rows as each API completes, so a partial report
/// survives a failure partway through a run.
pub trait ReportSink: Send {
    fn append_rows(&mut self, rows: &[ReportRow]) -> Result<(), ReportError>;
}

/// Consolidated CSV report writer
pub struct CsvReportWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvReportWriter {
    /// Create the report file with headers. When the run targets one API its
    /// name prefixes the filename; otherwise the generic report name is used.
    pub fn create(output_dir: &Path, api_name: Option<&str>) -> Result<Self, ReportError> {
        fs::create_dir_all(output_dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = match api_name {
            Some(name) => format!("{}_report_{timestamp}.csv", safe_filename(name)),
            None => format!("security_audit_report_{timestamp}.csv"),
        };
        let path = output_dir.join(filename);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(REPORT_HEADER)?;
        writer.flush()?;

        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvReportWriter {
    fn append_rows(&mut self, rows: &[ReportRow]) -> Result<(), ReportError> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// One line of the per-API summary report
#[derive(Debug, Serialize)]
pub struct SummaryRow {
    pub api_name: String,
    pub total_endpoints: usize,
    pub protected_endpoints: usize,
    pub unprotected_endpoints: usize,
    pub security_status: String,
}

impl SummaryRow {
    fn from_result(result: &ApiAuditResult) -> Self {
        let status = if result.error.is_some() {
            "Audit failed".to_string()
        } else if result.total_endpoints() == 0 {
            "No endpoints".to_string()
        } else if result.unprotected == 0 {
            "Secure".to_string()
        } else {
            "At Risk".to_string()
        };

        Self {
            api_name: result.api_name.clone(),
            total_endpoints: result.total_endpoints(),
            protected_endpoints: result.protected,
            unprotected_endpoints: result.unprotected,
            security_status: status,
        }
    }
}

/// Write the per-API summary CSV next to the consolidated report
pub fn write_summary(
    output_dir: &Path,
    results: &[ApiAuditResult],
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("api_summary_{timestamp}.csv"));

    let mut writer = csv::Writer::from_path(&path)?;
    for result in results {
        writer.serialize(SummaryRow::from_result(result))?;
    }
    writer.flush()?;

    Ok(path)
}

fn safe_filename(name: &str) -> String {
    name.replace([' ', '/'], "_")
}
