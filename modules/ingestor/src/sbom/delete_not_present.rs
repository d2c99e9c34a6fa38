use super::CompletedIngestion;
use crate::{model::Pipeline, Error};
use sbom_ingest_common::db::Database;
use sbom_ingest_entity::sbom_occurrence;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use std::num::NonZeroUsize;
use tracing::instrument;
use uuid::Uuid;

/// Deletes the stored occurrences of a project which a completed ingestion did not report.
pub struct DeleteNotPresentOccurrencesService {
    db: Database,
    batch_size: NonZeroUsize,
}

impl DeleteNotPresentOccurrencesService {
    pub fn new(db: Database, batch_size: NonZeroUsize) -> Self {
        Self { db, batch_size }
    }

    /// Delete stale occurrences, returning how many were deleted.
    ///
    /// Stored occurrences are walked in batches, ordered by id. Each batch deletes its stale
    /// rows in one statement.
    #[instrument(skip_all, fields(pipeline = pipeline.id, project = pipeline.project_id), err)]
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        completed: &CompletedIngestion,
    ) -> Result<u64, Error> {
        if completed.project_id() != pipeline.project_id {
            return Err(Error::ProjectMismatch {
                ingested: completed.project_id(),
                pipeline: completed.pipeline_id(),
                requested: pipeline.project_id,
            });
        }

        let batch_size = self.batch_size.get();
        let mut last = None::<Uuid>;
        let mut deleted = 0;

        loop {
            let mut query = sbom_occurrence::Entity::find()
                .select_only()
                .column(sbom_occurrence::Column::Id)
                .filter(sbom_occurrence::Column::ProjectId.eq(pipeline.project_id))
                .order_by_asc(sbom_occurrence::Column::Id)
                .limit(batch_size as u64);
            if let Some(last) = last {
                query = query.filter(sbom_occurrence::Column::Id.gt(last));
            }

            let ids: Vec<Uuid> = query.into_tuple().all(&self.db).await?;
            let Some(&tail) = ids.last() else {
                break;
            };
            last = Some(tail);
            let exhausted = ids.len() < batch_size;

            let stale = ids
                .into_iter()
                .filter(|id| !completed.contains(id))
                .collect::<Vec<_>>();

            if !stale.is_empty() {
                deleted += sbom_occurrence::Entity::delete_many()
                    .filter(sbom_occurrence::Column::Id.is_in(stale))
                    .exec(&self.db)
                    .await?
                    .rows_affected;
            }

            if exhausted {
                break;
            }
        }

        log::info!(
            "deleted {deleted} stale occurrences of project {}",
            pipeline.project_id
        );

        Ok(deleted)
    }
}
