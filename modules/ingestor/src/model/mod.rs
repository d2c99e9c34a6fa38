//! The scan report and pipeline context handed to the SBOM ingestion pipeline.

mod report;

pub use report::*;

/// The pipeline a set of reports was produced by.
///
/// The project is the scope of persisted occurrences and of deletion reconciliation.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pipeline {
    pub id: i64,
    pub project_id: i64,
    /// The commit the pipeline ran for.
    pub sha: String,
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl Pipeline {
    /// Reports that passed their own structural validation.
    pub fn valid_reports(&self) -> impl Iterator<Item = &Report> {
        self.reports.iter().filter(|report| report.is_valid())
    }
}
