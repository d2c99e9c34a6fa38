use sbom_ingest_common::db::chunk::EntityChunkedIter;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel};
use sea_query::OnConflict;

/// Bulk insert active models, resolving conflicts as instructed.
///
/// Models are split into statements fitting the parameter limit of the backend. Returns the
/// number of affected rows.
pub(crate) async fn upsert<A, C>(db: &C, models: Vec<A>, on_conflict: OnConflict) -> Result<u64, DbErr>
where
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    let mut affected = 0;

    for batch in models.chunked_for(db.get_database_backend()) {
        affected += A::Entity::insert_many(batch)
            .on_conflict(on_conflict.clone())
            .exec_without_returning(db)
            .await?;
    }

    Ok(affected)
}

/// Conflict resolution keeping the stored row.
pub(crate) fn keep_existing<C>(id: C) -> OnConflict
where
    C: sea_query::IntoIden,
{
    OnConflict::column(id).do_nothing().to_owned()
}

/// Conflict resolution overwriting the mutable columns of the stored row.
pub(crate) fn update<C, I>(id: C, columns: I) -> OnConflict
where
    C: sea_query::IntoIden,
    I: IntoIterator<Item = C>,
{
    OnConflict::column(id).update_columns(columns).to_owned()
}
