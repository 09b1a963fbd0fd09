//! # Verification Database Crate
//!
//! Read-side interface to the PostgreSQL store the route verifier writes
//! into: AS policy objects, observed routes, exchange reports and report
//! items.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** all SQL lives here. Callers hand in typed, already
//!   validated values (`OverallReportType`, `ReportItemType`,
//!   `NetworkPrefix`) and get records back.
//! - **Parameterized only:** caller input is always bound, never formatted
//!   into SQL text.
//! - **Asynchronous & Pooled:** a bounded `PgPool` shared by all requests;
//!   each store round trip is guarded by a timeout.
//!
//! ## Public API
//!
//! - `connect` / `connect_lazy`: build the connection pool from settings.
//! - `DbRepository`: one method per supported question.
//! - `Page` / `PageRequest`: the window applied to the wide listings.
//! - `DbError`: not found, connectivity, query and timeout failures.

// Declare the modules that constitute this crate.
pub mod aggregation;
pub mod connection;
pub mod error;
pub mod records;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use aggregation::{Page, PageRequest};
pub use connection::{connect, connect_lazy, with_statement_timeout};
pub use error::DbError;
pub use records::{
    AsCount, AutNumRecord, Book, ExchangeReport, NewBook, ReportListing, RouteForAs, RpslObject,
};
pub use repository::DbRepository;
pub use store::Store;
