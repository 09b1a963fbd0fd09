//! Row shapes returned by the repository.
//!
//! Field names are the column names of the underlying query, so a record
//! serializes to JSON with the same keys the database uses.

use chrono::{DateTime, Utc};
use core_types::{AsRole, OverallReportType, ReportItemFamily, ReportItemType};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::{FromRow, Row};

/// A row from `rpsl_obj`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RpslObject {
    pub rpsl_obj_name: String,
    pub body: String,
}

/// The declared policy lists of an AS, from `aut_num`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AutNumRecord {
    pub as_num: i32,
    pub as_name: String,
    pub imports: JsonValue,
    pub exports: JsonValue,
}

/// A row from `exchange_report`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ExchangeReport {
    pub report_id: i32,
    pub from_as: i32,
    pub to_as: i32,
    pub import: bool,
    pub overall_type: OverallReportType,
    pub parent_observed_route: i32,
    pub recorded_time: DateTime<Utc>,
}

/// How often an AS appears in a filtered set of reports.
///
/// `count` is `from_count + to_count`: an AS that is both sender and
/// receiver of one report is counted once per role.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct AsCount {
    pub as_num: i32,
    pub count: i64,
    pub from_count: i64,
    pub to_count: i64,
}

/// One row of the report / route / report item join used by the paginated
/// listings. Report item columns are absent for reports without items when
/// the join is optional.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ReportListing {
    pub report_id: i32,
    pub from_as: i32,
    pub to_as: i32,
    pub import: bool,
    pub overall_type: OverallReportType,
    pub recorded_time: DateTime<Utc>,
    pub observed_route_id: i32,
    pub address_prefix: IpNetwork,
    pub raw_line: String,
    pub report_item_id: Option<i32>,
    pub category: Option<OverallReportType>,
    pub specific_case: Option<ReportItemType>,
    pub str_content: Option<String>,
    pub num_content: Option<i32>,
    /// Derived from `specific_case`, not stored.
    #[sqlx(skip)]
    pub item_family: Option<ReportItemFamily>,
    /// Rows matching the filter before the page window was applied.
    pub total_count: i64,
}

/// An observed route reached through a report the AS took part in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteForAs {
    pub observed_route_id: i32,
    pub address_prefix: IpNetwork,
    pub raw_line: String,
    pub recorded_time: DateTime<Utc>,
    pub role: AsRole,
}

impl<'r> FromRow<'r, PgRow> for RouteForAs {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let role: String = row.try_get("role")?;
        let role = role
            .parse::<AsRole>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: e.into(),
            })?;
        Ok(Self {
            observed_route_id: row.try_get("observed_route_id")?,
            address_prefix: row.try_get("address_prefix")?,
            raw_line: row.try_get("raw_line")?,
            recorded_time: row.try_get("recorded_time")?,
            role,
        })
    }
}

/// A row from the `books` table, the one write path of the service.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub pages_num: i32,
    pub review: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub pages_num: i32,
    pub review: String,
}
