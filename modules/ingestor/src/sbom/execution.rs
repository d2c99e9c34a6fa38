use super::{
    DeleteNotPresentOccurrencesService, IngestReportService, IngestReportSliceService,
    IngestReportsService,
};
use crate::{config::IngestionConfig, model::Pipeline, validation::Rejection, Error};
use sbom_ingest_common::db::Database;
use serde::Serialize;
use tracing::instrument;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct IngestionSummary {
    pub ingested_occurrences: usize,
    pub deleted_occurrences: u64,
    pub ingested_reports: usize,
    pub skipped_reports: usize,
    pub rejections: Vec<Rejection>,
}

/// Ingests the SBOM reports of a pipeline, then removes the occurrences no longer reported.
pub struct ExecutionService {
    reports: IngestReportsService,
    deletion: DeleteNotPresentOccurrencesService,
}

impl ExecutionService {
    pub fn new(db: Database, config: IngestionConfig) -> Self {
        let slice = IngestReportSliceService::new(db.clone());
        let report = IngestReportService::new(slice, config.sbom_slice_size);

        Self {
            reports: IngestReportsService::new(report),
            deletion: DeleteNotPresentOccurrencesService::new(
                db,
                config.sbom_deletion_batch_size,
            ),
        }
    }

    #[instrument(skip_all, fields(pipeline = pipeline.id, project = pipeline.project_id), err)]
    pub async fn execute(&self, pipeline: &Pipeline) -> Result<IngestionSummary, Error> {
        let completed = self.reports.execute(pipeline).await?;

        // an invalid report says nothing about which of its occurrences are still present
        let deleted_occurrences = if completed.skipped_reports() > 0 {
            log::warn!(
                "{} invalid reports in pipeline {}, keeping existing occurrences",
                completed.skipped_reports(),
                pipeline.id
            );
            0
        } else {
            self.deletion.execute(pipeline, &completed).await?
        };

        Ok(IngestionSummary {
            ingested_occurrences: completed.occurrence_ids().len(),
            deleted_occurrences,
            ingested_reports: completed.ingested_reports(),
            skipped_reports: completed.skipped_reports(),
            rejections: completed.into_rejections(),
        })
    }
}
