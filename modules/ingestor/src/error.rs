use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Database(#[from] DbErr),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(
        "occurrences ingested for project {ingested} (pipeline {pipeline}) can not reconcile project {requested}"
    )]
    ProjectMismatch {
        ingested: i64,
        pipeline: i64,
        requested: i64,
    },

    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
