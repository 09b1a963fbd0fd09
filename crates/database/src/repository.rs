use crate::DbError;
use crate::aggregation::{
    ListingFilter, Page, PageRequest, ReportFilter, as_count_query, listing_count_query,
    listing_query, routes_for_as_query,
};
use crate::records::{
    AsCount, AutNumRecord, Book, ExchangeReport, NewBook, ReportListing, RouteForAs, RpslObject,
};
use crate::store::Store;
use core_types::{NetworkPrefix, OverallReportType, ReportItemType};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::{FromRow, Row};
use std::time::Duration;

const EXCHANGE_REPORT_COLUMNS: &str = "report_id, from_as, to_as, import, overall_type, \
     parent_observed_route, recorded_time";

/// The `DbRepository` answers every supported question about the
/// verification store. It encapsulates all SQL; callers pass already
/// validated, typed arguments.
#[derive(Debug, Clone)]
pub struct DbRepository {
    store: Store,
}

fn decode_all<T>(rows: &[PgRow]) -> Result<Vec<T>, DbError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    rows.iter()
        .map(|row| T::from_row(row).map_err(DbError::from))
        .collect()
}

fn decode_one<T>(row: Option<PgRow>) -> Result<T, DbError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    let row = row.ok_or(DbError::NotFound)?;
    Ok(T::from_row(&row)?)
}

impl DbRepository {
    /// Creates a new `DbRepository` over a shared connection pool.
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            store: Store::new(pool, statement_timeout),
        }
    }

    /// Round trip used by health checks.
    pub async fn ping(&self) -> Result<(), DbError> {
        self.store.fetch_optional(sqlx::query("SELECT 1")).await?;
        Ok(())
    }

    pub async fn get_rpsl_obj(&self, name: &str) -> Result<RpslObject, DbError> {
        let row = self
            .store
            .fetch_optional(
                sqlx::query("SELECT rpsl_obj_name, body FROM rpsl_obj WHERE rpsl_obj_name = $1")
                    .bind(name),
            )
            .await?;
        decode_one(row)
    }

    pub async fn get_aut_num(&self, as_num: i32) -> Result<AutNumRecord, DbError> {
        let row = self
            .store
            .fetch_optional(
                sqlx::query(
                    "SELECT as_num, as_name, imports, exports FROM aut_num WHERE as_num = $1",
                )
                .bind(as_num),
            )
            .await?;
        decode_one(row)
    }

    /// All reports recorded for one observed route. An unknown route simply
    /// has no reports.
    pub async fn get_verification_reports(
        &self,
        observed_route_id: i32,
    ) -> Result<Vec<ExchangeReport>, DbError> {
        let sql = format!(
            "SELECT {EXCHANGE_REPORT_COLUMNS} FROM exchange_report \
             WHERE parent_observed_route = $1 ORDER BY recorded_time ASC, report_id ASC"
        );
        let rows = self
            .store
            .fetch_all(sqlx::query(&sql).bind(observed_route_id))
            .await?;
        decode_all(&rows)
    }

    pub async fn get_by_overall_report_type(
        &self,
        overall_type: OverallReportType,
    ) -> Result<Vec<ExchangeReport>, DbError> {
        let sql = format!(
            "SELECT {EXCHANGE_REPORT_COLUMNS} FROM exchange_report \
             WHERE overall_type = $1 ORDER BY report_id ASC"
        );
        let rows = self
            .store
            .fetch_all(sqlx::query(&sql).bind(overall_type))
            .await?;
        decode_all(&rows)
    }

    pub async fn get_as_for_overall_report_type(
        &self,
        overall_type: OverallReportType,
    ) -> Result<Vec<AsCount>, DbError> {
        self.as_counts(ReportFilter::OverallType(overall_type)).await
    }

    pub async fn get_as_for_report_item_type(
        &self,
        item_type: ReportItemType,
    ) -> Result<Vec<AsCount>, DbError> {
        self.as_counts(ReportFilter::ReportItemType(item_type)).await
    }

    async fn as_counts(&self, filter: ReportFilter) -> Result<Vec<AsCount>, DbError> {
        let mut qb = as_count_query(filter);
        let rows = self.store.fetch_all(qb.build()).await?;
        let counts = decode_all(&rows)?;
        tracing::debug!(?filter, n_as = counts.len(), "Aggregated reports by AS.");
        Ok(counts)
    }

    pub async fn get_for_overall_report_type(
        &self,
        overall_type: OverallReportType,
        page: PageRequest,
    ) -> Result<Page<ReportListing>, DbError> {
        self.listing(ListingFilter::OverallType(overall_type), page)
            .await
    }

    pub async fn get_for_report_item_type(
        &self,
        item_type: ReportItemType,
        page: PageRequest,
    ) -> Result<Page<ReportListing>, DbError> {
        self.listing(ListingFilter::ReportItemType(item_type), page)
            .await
    }

    /// Reports and items of the observed routes announced for exactly this
    /// prefix. A prefix nobody announced yields an empty page.
    pub async fn get_for_address_prefix(
        &self,
        prefix: &NetworkPrefix,
        page: PageRequest,
    ) -> Result<Page<ReportListing>, DbError> {
        let rows = self
            .store
            .fetch_all(
                sqlx::query(
                    "SELECT observed_route_id FROM observed_route \
                     WHERE address_prefix = $1 ORDER BY observed_route_id ASC",
                )
                .bind(prefix.network()),
            )
            .await?;
        let route_ids = rows
            .iter()
            .map(|row| row.try_get::<i32, _>("observed_route_id"))
            .collect::<Result<Vec<_>, _>>()?;

        if route_ids.is_empty() {
            tracing::debug!(%prefix, "No observed route for prefix.");
            return Ok(Page::empty(page));
        }
        self.listing(ListingFilter::ObservedRoutes(route_ids), page)
            .await
    }

    async fn listing(
        &self,
        filter: ListingFilter,
        page: PageRequest,
    ) -> Result<Page<ReportListing>, DbError> {
        let mut qb = listing_query(&filter, page);
        let rows = self.store.fetch_all(qb.build()).await?;
        let mut items: Vec<ReportListing> = decode_all(&rows)?;
        for item in &mut items {
            item.item_family = item.specific_case.map(|case| case.family());
        }

        let fallback_total = if items.is_empty() && page.offset > 0 {
            let mut count = listing_count_query(&filter);
            let row = self.store.fetch_one(count.build()).await?;
            row.try_get::<i64, _>("total_count")?
        } else {
            0
        };

        Ok(Page::from_rows(page, items, fallback_total))
    }

    /// Reports in which the AS is sender or receiver, each report once.
    pub async fn get_reports_for_as(&self, as_num: i32) -> Result<Vec<ExchangeReport>, DbError> {
        let sql = format!(
            "SELECT {EXCHANGE_REPORT_COLUMNS} FROM exchange_report WHERE from_as = $1 \
             UNION \
             SELECT {EXCHANGE_REPORT_COLUMNS} FROM exchange_report WHERE to_as = $1 \
             ORDER BY report_id ASC"
        );
        let rows = self.store.fetch_all(sqlx::query(&sql).bind(as_num)).await?;
        decode_all(&rows)
    }

    pub async fn get_routes_for_as(&self, as_num: i32) -> Result<Vec<RouteForAs>, DbError> {
        let mut qb = routes_for_as_query(as_num);
        let rows = self.store.fetch_all(qb.build()).await?;
        decode_all(&rows)
    }

    /// The first AS set (by name) that lists `as_num` as a member.
    pub async fn get_as_set_name(&self, as_num: i32) -> Result<String, DbError> {
        let row = self
            .store
            .fetch_optional(
                sqlx::query(
                    "SELECT as_set_name FROM as_set_contains_num \
                     NATURAL JOIN autonomous_system \
                     WHERE as_num = $1 ORDER BY as_set_name ASC LIMIT 1",
                )
                .bind(as_num),
            )
            .await?
            .ok_or(DbError::NotFound)?;
        Ok(row.try_get("as_set_name")?)
    }

    /// Stores a book review. This is the only write the service performs and
    /// it never touches verification data.
    pub async fn insert_book(&self, book: &NewBook) -> Result<Book, DbError> {
        let row = self
            .store
            .fetch_one(
                sqlx::query(
                    "INSERT INTO books (title, author, pages_num, review) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING id, title, author, pages_num, review",
                )
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.pages_num)
                .bind(&book.review),
            )
            .await?;
        tracing::info!(title = %book.title, "Inserted book.");
        Ok(Book::from_row(&row)?)
    }
}
