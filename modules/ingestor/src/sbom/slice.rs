use super::{
    tasks::{default_tasks, IngestionTask},
    OccurrenceMap,
};
use crate::{model::Pipeline, validation::Rejection, Error};
use itertools::Itertools;
use sbom_ingest_common::db::Database;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tracing::instrument;
use uuid::Uuid;

/// The result of ingesting one slice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestedSlice {
    /// Ids of the occurrences of the slice, in map order.
    pub occurrence_ids: Vec<Uuid>,
    pub rejections: Vec<Rejection>,
}

/// Runs the ingestion tasks over one slice of occurrence maps, in a single transaction.
pub struct IngestReportSliceService {
    db: Database,
    tasks: Vec<Box<dyn IngestionTask>>,
}

impl IngestReportSliceService {
    pub fn new(db: Database) -> Self {
        Self::with_tasks(db, default_tasks())
    }

    /// Use a custom list of tasks, run in the order given.
    pub fn with_tasks(db: Database, tasks: Vec<Box<dyn IngestionTask>>) -> Self {
        Self { db, tasks }
    }

    /// Ingest a slice.
    ///
    /// Either all entities of the slice get committed, or none. Any task failure rolls back the
    /// slice and is returned.
    #[instrument(skip_all, fields(pipeline = pipeline.id, maps = maps.len()), err)]
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        maps: &mut [OccurrenceMap],
    ) -> Result<IngestedSlice, Error> {
        let tx = self.db.begin().await?;

        match self.run(&tx, pipeline, maps).await {
            Ok(rejections) => {
                tx.commit().await?;

                let occurrence_ids = maps
                    .iter()
                    .filter_map(OccurrenceMap::occurrence_id)
                    .unique()
                    .collect();

                Ok(IngestedSlice {
                    occurrence_ids,
                    rejections,
                })
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    log::warn!("failed to roll back slice: {rollback}");
                }
                Err(err)
            }
        }
    }

    async fn run(
        &self,
        tx: &DatabaseTransaction,
        pipeline: &Pipeline,
        maps: &mut [OccurrenceMap],
    ) -> Result<Vec<Rejection>, Error> {
        let mut rejections = vec![];

        for task in &self.tasks {
            log::debug!("running task: {}", task.name());
            rejections.extend(task.execute(tx, pipeline, maps).await?);
        }

        Ok(rejections)
    }
}
