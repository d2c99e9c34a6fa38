use super::{
    slice::ingest_slice,
    tasks::{advisory_tasks, PackageMetadataTask},
    AdvisoryDataObject, AdvisoryMap, IngestionOutcome,
};
use crate::{validation::Partitioned, Error};
use sbom_ingest_common::db::Database;
use std::{collections::HashSet, io::Read, num::NonZeroUsize};
use tracing::instrument;

/// Ingests security advisories and the packages they affect, slice by slice.
pub struct AdvisoryIngestionService {
    db: Database,
    slice_size: NonZeroUsize,
    tasks: Vec<Box<dyn PackageMetadataTask<AdvisoryMap>>>,
}

impl AdvisoryIngestionService {
    pub fn new(db: Database, slice_size: NonZeroUsize) -> Self {
        Self {
            db,
            slice_size,
            tasks: advisory_tasks(),
        }
    }

    /// Read advisories from newline delimited JSON and ingest them.
    ///
    /// Entries which can't be read are part of the outcome's rejections.
    #[instrument(skip_all, err)]
    pub async fn execute_ndjson<R: Read>(&self, reader: R) -> Result<IngestionOutcome, Error> {
        let Partitioned { valid, rejected } = AdvisoryDataObject::from_ndjson(reader)?;

        let mut outcome = self.execute(valid).await?;
        outcome.rejections.splice(0..0, rejected);

        Ok(outcome)
    }

    #[instrument(skip_all, err)]
    pub async fn execute<I>(&self, advisories: I) -> Result<IngestionOutcome, Error>
    where
        I: IntoIterator<Item = AdvisoryDataObject>,
    {
        let mut advisories = advisories.into_iter();
        let mut outcome = IngestionOutcome::default();
        // the same advisory may show up more than once
        let mut affected = HashSet::new();

        loop {
            let mut maps = advisories
                .by_ref()
                .take(self.slice_size.get())
                .map(AdvisoryMap::new)
                .collect::<Vec<_>>();
            if maps.is_empty() {
                break;
            }

            outcome
                .rejections
                .extend(ingest_slice(&self.db, &self.tasks, &mut maps).await?);

            for map in &maps {
                if map.advisory_id().is_some() {
                    outcome.ingested += 1;
                }
                affected.extend(map.affected_package_ids().iter().copied());
            }
            outcome.slices += 1;
        }
        outcome.related = affected.len();

        log::info!(
            "ingested {} advisories with {} affected packages, rejected {}",
            outcome.ingested,
            outcome.related,
            outcome.rejections.len()
        );

        Ok(outcome)
    }
}
