use super::{
    slice::ingest_slice,
    tasks::{license_tasks, PackageMetadataTask},
    DataObject, IngestionOutcome, LicenseMap,
};
use crate::{
    validation::{partition, Partitioned},
    Error,
};
use sbom_ingest_common::db::Database;
use std::{collections::HashSet, num::NonZeroUsize};
use tracing::instrument;

/// Ingests package license data objects, slice by slice.
pub struct LicenseIngestionService {
    db: Database,
    slice_size: NonZeroUsize,
    tasks: Vec<Box<dyn PackageMetadataTask<LicenseMap>>>,
}

impl LicenseIngestionService {
    pub fn new(db: Database, slice_size: NonZeroUsize) -> Self {
        Self {
            db,
            slice_size,
            tasks: license_tasks(),
        }
    }

    /// Ingest data objects.
    ///
    /// Invalid objects are rejected without affecting the rest of their slice. Slices committed
    /// before a failing one stay committed.
    #[instrument(skip_all, err)]
    pub async fn execute<I>(&self, objects: I) -> Result<IngestionOutcome, Error>
    where
        I: IntoIterator<Item = DataObject>,
    {
        let mut objects = objects.into_iter();
        let mut outcome = IngestionOutcome::default();
        let mut assignments = HashSet::new();

        loop {
            let slice = objects.by_ref().take(self.slice_size.get()).collect::<Vec<_>>();
            if slice.is_empty() {
                break;
            }

            let Partitioned { valid, rejected } = partition(slice);
            outcome.rejections.extend(rejected);

            let mut maps = valid
                .into_iter()
                .filter_map(LicenseMap::new)
                .collect::<Vec<_>>();

            if !maps.is_empty() {
                outcome
                    .rejections
                    .extend(ingest_slice(&self.db, &self.tasks, &mut maps).await?);
            }

            outcome.ingested += maps.len();
            assignments.extend(maps.iter().filter_map(LicenseMap::package_version_license_id));
            outcome.slices += 1;
        }
        outcome.related = assignments.len();

        log::info!(
            "ingested {} license data objects, rejected {}",
            outcome.ingested,
            outcome.rejections.len()
        );

        Ok(outcome)
    }
}
