use async_trait::async_trait;
use burrow_core::repository::Result;
use burrow_core::{NewUrlRecord, ReadRepository, Repository, ShortCode, StorageError, UrlRecord};
use jiff::Timestamp;
use sqlx::{MySqlPool, Row};
use tracing::{debug, trace, warn};

const SCHEMA: &str = include_str!("../ddl/mysql/short_urls.sql");

/// MySQL implementation of the repository contract.
///
/// Records live in a single `short_urls` table keyed by the binary short
/// code. `created_at` is stored as unix milliseconds.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_urls` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("short_urls schema is up to date");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

/// The current time at the precision the table stores.
fn now_millis() -> Result<Timestamp> {
    parse_created_at(Timestamp::now().as_millisecond())
}

fn parse_created_at(millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", millis))
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_) => StorageError::Unavailable(message),
        sqlx::Error::Configuration(_) => StorageError::Operation(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "looking up record in MySQL");

        let row = sqlx::query(
            r#"
            SELECT long_url, created_at
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str().as_bytes())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(code = %code, error = %e, "MySQL error on lookup");
            map_sqlx_error(e)
        })?;

        let Some(row) = row else {
            debug!(code = %code, "short code not found in MySQL");
            return Ok(None);
        };

        let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
        let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
        let created_at = parse_created_at(created_at_raw)?;

        Ok(Some(UrlRecord {
            short_code: code.clone(),
            long_url,
            created_at,
        }))
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn create(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        let record = record.into_record(now_millis()?);

        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, long_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(record.short_code.as_str().as_bytes())
        .bind(record.long_url.as_str())
        .bind(record.created_at.as_millisecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                trace!(code = %record.short_code, "stored record in MySQL");
                Ok(record)
            }
            Err(err) if is_unique_violation(&err) => {
                warn!(code = %record.short_code, "short code collision on insert");
                Err(StorageError::Conflict(record.short_code.into_inner()))
            }
            Err(err) => {
                warn!(code = %record.short_code, error = %err, "MySQL error on insert");
                Err(map_sqlx_error(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_at_round_trips_through_millis() {
        let now = now_millis().unwrap();
        assert_eq!(parse_created_at(now.as_millisecond()).unwrap(), now);
    }

    #[test]
    fn out_of_range_created_at_is_invalid_data() {
        let err = parse_created_at(i64::MAX).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[test]
    fn pool_timeout_maps_to_timeout() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StorageError::Timeout(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StorageError::InvalidData(_)
        ));
    }
}
