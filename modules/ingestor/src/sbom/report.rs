use super::{IngestReportSliceService, OccurrenceMapCollection};
use crate::{
    model::{Pipeline, Report},
    validation::Rejection,
    Error,
};
use std::num::NonZeroUsize;
use tracing::instrument;
use uuid::Uuid;

/// The result of ingesting a full report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestedReport {
    pub occurrence_ids: Vec<Uuid>,
    pub rejections: Vec<Rejection>,
    pub slices: usize,
}

/// Ingests a report, slice by slice.
pub struct IngestReportService {
    slice: IngestReportSliceService,
    slice_size: NonZeroUsize,
}

impl IngestReportService {
    pub fn new(slice: IngestReportSliceService, slice_size: NonZeroUsize) -> Self {
        Self { slice, slice_size }
    }

    /// Ingest all components of a report.
    ///
    /// Slices are processed sequentially. A failing slice aborts the report, slices committed
    /// before it stay committed.
    #[instrument(
        skip_all,
        fields(pipeline = pipeline.id, components = report.components.len()),
        err
    )]
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        report: &Report,
    ) -> Result<IngestedReport, Error> {
        let collection = OccurrenceMapCollection::new(report);
        let mut maps = collection.iter();
        let mut result = IngestedReport::default();

        loop {
            let mut slice = maps
                .by_ref()
                .take(self.slice_size.get())
                .collect::<Vec<_>>();
            if slice.is_empty() {
                break;
            }

            let ingested = self.slice.execute(pipeline, &mut slice).await?;
            result.occurrence_ids.extend(ingested.occurrence_ids);
            result.rejections.extend(ingested.rejections);
            result.slices += 1;
        }

        log::debug!(
            "ingested {} occurrences in {} slices",
            result.occurrence_ids.len(),
            result.slices
        );

        Ok(result)
    }
}
