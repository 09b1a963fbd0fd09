use crate::error::DbError;
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, PgRow, Postgres};
use sqlx::query::Query;
use std::future::Future;
use std::time::Duration;

/// A parameterized statement ready to run against the store.
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// SQLSTATE `query_canceled`, raised when `statement_timeout` fires.
const QUERY_CANCELED: &str = "57014";

/// Slack given to the server-side timeout before the client gives up.
const CLIENT_TIMEOUT_GRACE: Duration = Duration::from_millis(500);

/// Thin adapter over the connection pool.
///
/// Statements are bounded by the session `statement_timeout` the pool sets
/// on each connection (see [`crate::connection::with_statement_timeout`]),
/// which cancels the query and leaves the connection reusable. A client-side
/// timeout slightly longer than that covers a server that stops answering
/// altogether; in that case the connection is dropped rather than reused.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
    statement_timeout: Duration,
}

impl Store {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Runs a query expected to produce zero or one row.
    pub async fn fetch_optional(&self, query: PgQuery<'_>) -> Result<Option<PgRow>, DbError> {
        self.timed(query.fetch_optional(&self.pool)).await
    }

    /// Runs a query expected to produce exactly one row, e.g. `INSERT .. RETURNING`.
    pub async fn fetch_one(&self, query: PgQuery<'_>) -> Result<PgRow, DbError> {
        self.timed(query.fetch_one(&self.pool)).await
    }

    pub async fn fetch_all(&self, query: PgQuery<'_>) -> Result<Vec<PgRow>, DbError> {
        self.timed(query.fetch_all(&self.pool)).await
    }

    async fn timed<T, F>(&self, fut: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.statement_timeout + CLIENT_TIMEOUT_GRACE, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if is_query_canceled(&e) => Err(DbError::Timeout(self.statement_timeout)),
            Ok(Err(e)) => Err(DbError::from(e)),
            Err(_) => Err(DbError::Timeout(self.statement_timeout)),
        }
    }
}

fn is_query_canceled(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(QUERY_CANCELED),
        _ => false,
    }
}
