use std::marker::PhantomData;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::MySqlRow;
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, error};

use super::{Record, RecordStore};
use crate::error::AppError;
use crate::utils::db_utils::{bind_query, bind_query_as, build_insert_sql, build_update_sql};

/// MySQL duplicate-key SQLSTATE.
const DUPLICATE_KEY: &str = "23000";

/// Record store backed by one MySQL table per record type.
///
/// Column names are the record's serde field names; see `db::ensure_schema`.
pub struct MySqlStore<R> {
    pool: MySqlPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> MySqlStore<R> {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

fn is_duplicate_key(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(DUPLICATE_KEY),
        _ => false,
    }
}

#[async_trait]
impl<R> RecordStore<R> for MySqlStore<R>
where
    R: Record + for<'r> FromRow<'r, MySqlRow>,
{
    async fn create(&self, record: R) -> Result<R, AppError> {
        let payload = serde_json::to_value(&record)?;
        let insert = build_insert_sql(R::TABLE, &payload)?;
        debug!(sql = %insert.sql, "Inserting record");

        let result = bind_query(sqlx::query(&insert.sql), insert.values)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => self
                .get(record.id())
                .await?
                .ok_or_else(|| AppError::internal(format!("{} vanished after insert", R::KIND))),
            Err(e) if is_duplicate_key(&e) => {
                Err(AppError::conflict(format!("{} already exists", R::KIND)))
            }
            Err(e) => {
                error!(error = %e, table = R::TABLE, "Insert failed");
                Err(e.into())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<R>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", R::TABLE);

        sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, table = R::TABLE, id, "Failed to fetch record");
                e.into()
            })
    }

    async fn update(&self, id: &str, patch: R::Patch) -> Result<R, AppError> {
        let payload = serde_json::to_value(&patch)?;
        let is_empty = payload.as_object().is_some_and(|o| o.is_empty());

        if !is_empty {
            let update = build_update_sql(R::TABLE, &payload, "id", id)?;
            debug!(sql = %update.sql, id, "Updating record");

            bind_query(sqlx::query(&update.sql), update.values)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    error!(error = %e, table = R::TABLE, id, "Update failed");
                    AppError::from(e)
                })?;
        }

        // rows_affected is 0 for a no-op update, so existence is checked by reading back
        self.get(id).await?.ok_or(AppError::NotFound(R::KIND))
    }

    async fn query(&self, filter: &R::Filter) -> Result<Vec<R>, AppError> {
        let (where_sql, values) = R::where_clause(filter).into_parts();
        let sql = format!(
            "SELECT * FROM {}{} ORDER BY {}",
            R::TABLE,
            where_sql,
            R::ORDER_BY
        );
        debug!(sql = %sql, bindings = ?values, "Querying records");

        bind_query_as(sqlx::query_as::<_, R>(&sql), values)
            .fetch(&self.pool)
            .try_collect()
            .await
            .map_err(|e| {
                error!(error = %e, sql = %sql, "Query failed");
                e.into()
            })
    }

    async fn delete(&self, id: &str) -> Result<R, AppError> {
        let existing = self.get(id).await?.ok_or(AppError::NotFound(R::KIND))?;

        let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, table = R::TABLE, id, "Delete failed");
                AppError::from(e)
            })?;

        Ok(existing)
    }
}
