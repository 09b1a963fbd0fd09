use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::str::FromStr;
use std::time::Duration;

fn pool_options(settings: &DatabaseSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
}

/// Sets the session `statement_timeout` on every connection the options open.
///
/// Postgres cancels an overrunning statement itself, so the connection comes
/// back to the pool idle instead of staying busy until the query finishes.
pub fn with_statement_timeout(options: PgConnectOptions, timeout_ms: u64) -> PgConnectOptions {
    options.options([("statement_timeout", format!("{timeout_ms}ms"))])
}

fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    let options = PgConnectOptions::from_str(&settings.url)?;
    Ok(with_statement_timeout(options, settings.statement_timeout_ms))
}

/// Establishes a bounded connection pool to the PostgreSQL database.
///
/// The pool is the only shared resource of the service; every request
/// acquires a connection per query and hands it back when the query
/// completes or the server cancels it.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let pool = pool_options(settings)
        .connect_with(connect_options(settings)?)
        .await?;
    tracing::info!(
        max_connections = settings.max_connections,
        statement_timeout_ms = settings.statement_timeout_ms,
        "Connected to the verification database."
    );
    Ok(pool)
}

/// Builds the pool without opening a connection, so the server can start
/// while the database is still coming up.
pub fn connect_lazy(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    Ok(pool_options(settings).connect_lazy_with(connect_options(settings)?))
}
