//! Splitting of bulk inserts, keeping each statement within the bind-parameter limit of the
//! database backend.

use itertools::Itertools;
use sea_orm::{ActiveModelTrait, DbBackend, EntityTrait, Iterable};

/// The maximum number of bind parameters a single statement may carry.
pub fn parameter_limit(backend: DbBackend) -> usize {
    match backend {
        // SQLITE_MAX_VARIABLE_NUMBER default since 3.32
        DbBackend::Sqlite => 32_766,
        _ => u16::MAX as usize,
    }
}

pub trait EntityChunkedIter: Sized {
    type Item: ActiveModelTrait;

    /// Chunk active models so that one `INSERT` per chunk fits the backend's parameter limit.
    ///
    /// The chunks are materialized, so they can be held across `.await` points of a `Send`
    /// future.
    fn chunked_for(self, backend: DbBackend) -> Vec<Vec<Self::Item>>;
}

impl<T> EntityChunkedIter for T
where
    T: IntoIterator,
    <T as IntoIterator>::Item: ActiveModelTrait,
{
    type Item = T::Item;

    fn chunked_for(self, backend: DbBackend) -> Vec<Vec<Self::Item>> {
        let columns = <<Self::Item as ActiveModelTrait>::Entity as EntityTrait>::Column::iter()
            .count()
            .max(1);
        self.into_iter()
            .chunks(rows_per_statement(parameter_limit(backend), columns))
            .into_iter()
            .map(|chunk| chunk.collect())
            .collect()
    }
}

fn rows_per_statement(limit: usize, columns: usize) -> usize {
    (limit / columns).max(1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rows_fit_parameter_limit() {
        assert_eq!(rows_per_statement(65_535, 5), 13_107);
        assert_eq!(rows_per_statement(32_766, 9), 3_640);
        assert_eq!(rows_per_statement(3, 10), 1);
    }

    #[test]
    fn sqlite_is_tighter_than_postgres() {
        assert!(parameter_limit(DbBackend::Sqlite) < parameter_limit(DbBackend::Postgres));
    }
}
