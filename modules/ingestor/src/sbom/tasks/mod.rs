//! The ingestion tasks of a slice.
//!
//! Each task resolves one entity type for every map of a slice, and writes the id of the
//! persisted row back into the maps. Tasks run in a fixed order, as every task consumes the ids
//! assigned by the ones before.

mod component_versions;
mod components;
mod occurrences;
mod sources;

pub use component_versions::*;
pub use components::*;
pub use occurrences::*;
pub use sources::*;

use super::OccurrenceMap;
use crate::{model::Pipeline, validation::Rejection, Error};
use sea_orm::DatabaseTransaction;

#[async_trait::async_trait]
pub trait IngestionTask: Send + Sync {
    fn name(&self) -> &'static str;

    /// Persist the task's entities for a slice, returning the rejected candidates.
    async fn execute(
        &self,
        tx: &DatabaseTransaction,
        pipeline: &Pipeline,
        maps: &mut [OccurrenceMap],
    ) -> Result<Vec<Rejection>, Error>;
}

/// The tasks of a slice, in the order they must run.
pub fn default_tasks() -> Vec<Box<dyn IngestionTask>> {
    vec![
        Box::new(IngestComponents),
        Box::new(IngestComponentVersions),
        Box::new(IngestSources),
        Box::new(IngestOccurrences),
    ]
}
