use super::IngestReportService;
use crate::{model::Pipeline, validation::Rejection, Error};
use std::collections::BTreeSet;
use tracing::instrument;
use uuid::Uuid;

/// Proof that all valid reports of a pipeline were ingested.
///
/// Only [`IngestReportsService`] creates it, so the occurrence ids it carries are always the
/// complete set of a pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedIngestion {
    project_id: i64,
    pipeline_id: i64,
    occurrence_ids: BTreeSet<Uuid>,
    rejections: Vec<Rejection>,
    ingested_reports: usize,
    skipped_reports: usize,
}

impl CompletedIngestion {
    pub fn project_id(&self) -> i64 {
        self.project_id
    }

    pub fn pipeline_id(&self) -> i64 {
        self.pipeline_id
    }

    pub fn occurrence_ids(&self) -> &BTreeSet<Uuid> {
        &self.occurrence_ids
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.occurrence_ids.contains(id)
    }

    pub fn rejections(&self) -> &[Rejection] {
        &self.rejections
    }

    pub fn ingested_reports(&self) -> usize {
        self.ingested_reports
    }

    /// Number of reports skipped for being invalid.
    pub fn skipped_reports(&self) -> usize {
        self.skipped_reports
    }

    pub(crate) fn into_rejections(self) -> Vec<Rejection> {
        self.rejections
    }
}

/// Ingests every valid report of a pipeline.
pub struct IngestReportsService {
    report: IngestReportService,
}

impl IngestReportsService {
    pub fn new(report: IngestReportService) -> Self {
        Self { report }
    }

    #[instrument(
        skip_all,
        fields(pipeline = pipeline.id, project = pipeline.project_id, reports = pipeline.reports.len()),
        err
    )]
    pub async fn execute(&self, pipeline: &Pipeline) -> Result<CompletedIngestion, Error> {
        let mut completed = CompletedIngestion {
            project_id: pipeline.project_id,
            pipeline_id: pipeline.id,
            occurrence_ids: BTreeSet::new(),
            rejections: vec![],
            ingested_reports: 0,
            skipped_reports: pipeline.reports.len() - pipeline.valid_reports().count(),
        };

        if completed.skipped_reports > 0 {
            log::info!(
                "skipping {} invalid reports of pipeline {}",
                completed.skipped_reports,
                pipeline.id
            );
        }

        for report in pipeline.valid_reports() {
            let ingested = self.report.execute(pipeline, report).await?;
            completed.occurrence_ids.extend(ingested.occurrence_ids);
            completed.rejections.extend(ingested.rejections);
            completed.ingested_reports += 1;
        }

        Ok(completed)
    }
}
