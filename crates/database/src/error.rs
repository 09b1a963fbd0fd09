use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection configuration: {0}")]
    ConnectionConfigError(String),

    #[error("The database is unreachable: {0}")]
    Connectivity(#[source] sqlx::Error),

    #[error("A database query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("The database did not answer within {0:?}")]
    Timeout(Duration),

    #[error("The requested data was not found in the database.")]
    NotFound,
}

impl DbError {
    /// True for failures caused by the store being unavailable rather than by
    /// the query itself.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DbError::Connectivity(_) | DbError::Timeout(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Configuration(e) => DbError::ConnectionConfigError(e.to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_) => DbError::Connectivity(err),
            other => DbError::Query(other),
        }
    }
}
