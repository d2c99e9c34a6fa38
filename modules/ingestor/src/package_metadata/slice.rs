use super::tasks::PackageMetadataTask;
use crate::{validation::Rejection, Error};
use sbom_ingest_common::db::Database;
use sea_orm::TransactionTrait;

/// Run tasks over one slice of maps, in a single transaction.
pub(crate) async fn ingest_slice<M>(
    db: &Database,
    tasks: &[Box<dyn PackageMetadataTask<M>>],
    maps: &mut [M],
) -> Result<Vec<Rejection>, Error>
where
    M: Send + Sync,
{
    let tx = db.begin().await?;
    let mut rejections = vec![];

    for task in tasks {
        log::debug!("running task: {}", task.name());
        match task.execute(&tx, maps).await {
            Ok(rejected) => rejections.extend(rejected),
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    log::warn!("failed to roll back slice: {rollback}");
                }
                return Err(err);
            }
        }
    }

    tx.commit().await?;

    Ok(rejections)
}
