use serde::Deserialize;
use std::net::SocketAddr;

/// The root configuration structure for the query service.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub pagination: PaginationSettings,
    pub log: LogSettings,
}

/// Where the HTTP surface listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Socket address to bind, e.g. "0.0.0.0:3000".
    pub bind: SocketAddr,
}

/// Parameters for the PostgreSQL connection pool.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string. `DATABASE_URL` takes precedence over the file.
    pub url: String,
    /// Upper bound on pooled connections shared by all in-flight requests.
    pub max_connections: u32,
    /// How long a request may wait for a free connection.
    pub acquire_timeout_secs: u64,
    /// Connections idle for longer than this are closed.
    pub idle_timeout_secs: u64,
    /// Deadline for a single store round trip, including acquisition.
    pub statement_timeout_ms: u64,
}

/// The page window applied to the wide listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    pub default_limit: i64,
    pub max_limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    Full,
    Compact,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// An `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}
