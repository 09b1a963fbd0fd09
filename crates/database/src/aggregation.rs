//! Query builders for the joined listings, the per-AS role aggregation and
//! the page window.
//!
//! The three wide listings share one statement shape and differ only in the
//! report item join and the `WHERE` clause, so they are built from a single
//! [`ListingFilter`] rather than spelled out per endpoint.

use core_types::{AsRole, OverallReportType, ReportItemType};
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

use crate::records::ReportListing;

pub const DEFAULT_PAGE_OFFSET: i64 = 0;
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// The window applied to a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: DEFAULT_PAGE_OFFSET,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a window from optional caller input. Negative offsets become 0
    /// and the limit is clamped into `1..=max_limit`.
    pub fn clamped(
        offset: Option<i64>,
        limit: Option<i64>,
        default_limit: i64,
        max_limit: i64,
    ) -> Self {
        Self {
            offset: offset.unwrap_or(DEFAULT_PAGE_OFFSET).max(0),
            limit: limit.unwrap_or(default_limit).clamp(1, max_limit.max(1)),
        }
    }
}

/// Rows that carry the size of the unwindowed result alongside themselves.
pub trait Windowed {
    fn total_count(&self) -> i64;
}

impl Windowed for ReportListing {
    fn total_count(&self) -> i64 {
        self.total_count
    }
}

/// One page of a listing plus the metadata needed to request the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub offset: i64,
    pub limit: i64,
    pub total_count: i64,
    /// Whether rows remain beyond this window.
    pub has_more: bool,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            offset: request.offset,
            limit: request.limit,
            total_count: 0,
            has_more: false,
            items: Vec::new(),
        }
    }
}

impl<T: Windowed> Page<T> {
    /// Assembles a page from windowed rows. The total is read from the first
    /// row; `fallback_total` is used when the window is empty.
    pub fn from_rows(request: PageRequest, items: Vec<T>, fallback_total: i64) -> Self {
        let total_count = items
            .first()
            .map(Windowed::total_count)
            .unwrap_or(fallback_total);
        Self {
            offset: request.offset,
            limit: request.limit,
            total_count,
            has_more: request.offset + (items.len() as i64) < total_count,
            items,
        }
    }
}

/// Which reports a paginated listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingFilter {
    /// Reports of one overall type, with their items if any.
    OverallType(OverallReportType),
    /// Only report/item pairs whose item has this specific case.
    ReportItemType(ReportItemType),
    /// Reports of the given observed routes, with their items if any.
    ObservedRoutes(Vec<i32>),
}

impl ListingFilter {
    fn report_item_join(&self) -> &'static str {
        match self {
            ListingFilter::ReportItemType(_) => "JOIN",
            _ => "LEFT JOIN",
        }
    }

    fn push_from_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(
            " FROM exchange_report AS er \
             JOIN observed_route AS o ON o.observed_route_id = er.parent_observed_route ",
        );
        qb.push(self.report_item_join());
        qb.push(" report_item AS ri ON ri.parent_report = er.report_id WHERE ");
        match self {
            ListingFilter::OverallType(ty) => {
                qb.push("er.overall_type = ").push_bind(*ty);
            }
            ListingFilter::ReportItemType(ty) => {
                qb.push("ri.specific_case = ").push_bind(*ty);
            }
            ListingFilter::ObservedRoutes(ids) => {
                qb.push("o.observed_route_id = ANY(").push_bind(ids.clone()).push(")");
            }
        }
    }
}

/// The windowed report / route / item join, each row carrying the unwindowed
/// row count as `total_count`.
pub fn listing_query(filter: &ListingFilter, page: PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT er.report_id, er.from_as, er.to_as, er.import, er.overall_type, er.recorded_time, \
         o.observed_route_id, o.address_prefix, o.raw_line, \
         ri.report_item_id, ri.category, ri.specific_case, ri.str_content, ri.num_content, \
         COUNT(*) OVER () AS total_count",
    );
    filter.push_from_where(&mut qb);
    qb.push(" ORDER BY er.recorded_time ASC, er.report_id ASC, ri.report_item_id ASC NULLS FIRST");
    qb.push(" OFFSET ").push_bind(page.offset);
    qb.push(" LIMIT ").push_bind(page.limit);
    qb
}

/// Counts the rows of the same join. Only needed when the window lies past
/// the end of the result, where no row is left to carry `total_count`.
pub fn listing_count_query(filter: &ListingFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) AS total_count");
    filter.push_from_where(&mut qb);
    qb
}

/// Which reports an AS aggregation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFilter {
    OverallType(OverallReportType),
    /// Reports having at least one item of this specific case.
    ReportItemType(ReportItemType),
}

/// Groups the matching reports by AS.
///
/// Each matching report is exploded into one `from` and one `to` role row
/// before grouping, so an AS on both ends of a report is counted twice.
pub fn as_count_query(filter: ReportFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("WITH matching AS (");
    match filter {
        ReportFilter::OverallType(ty) => {
            qb.push(
                "SELECT er.report_id, er.from_as, er.to_as FROM exchange_report AS er \
                 WHERE er.overall_type = ",
            )
            .push_bind(ty);
        }
        ReportFilter::ReportItemType(ty) => {
            qb.push(
                "SELECT DISTINCT er.report_id, er.from_as, er.to_as FROM exchange_report AS er \
                 JOIN report_item AS ri ON ri.parent_report = er.report_id \
                 WHERE ri.specific_case = ",
            )
            .push_bind(ty);
        }
    }
    qb.push(format!(
        "), roles AS (\
         SELECT m.from_as AS as_num, '{from}' AS role FROM matching AS m \
         UNION ALL \
         SELECT m.to_as AS as_num, '{to}' AS role FROM matching AS m\
         ) \
         SELECT roles.as_num, COUNT(*) AS count, \
         COUNT(*) FILTER (WHERE roles.role = '{from}') AS from_count, \
         COUNT(*) FILTER (WHERE roles.role = '{to}') AS to_count \
         FROM roles GROUP BY roles.as_num ORDER BY roles.as_num ASC",
        from = AsRole::From.as_str(),
        to = AsRole::To.as_str(),
    ));
    qb
}

/// Distinct observed routes reached through reports of `as_num`, once per
/// role the AS played.
pub fn routes_for_as_query(as_num: i32) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("");
    for (i, (role, column)) in [(AsRole::From, "from_as"), (AsRole::To, "to_as")]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            qb.push(" UNION ");
        }
        qb.push(format!(
            "SELECT o.observed_route_id, o.address_prefix, o.raw_line, \
             o.recorded_time, '{}' AS role \
             FROM observed_route AS o \
             JOIN exchange_report AS er ON er.parent_observed_route = o.observed_route_id \
             WHERE er.{} = ",
            role.as_str(),
            column
        ))
        .push_bind(as_num);
    }
    qb.push(" ORDER BY observed_route_id ASC, role ASC");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(qb: &QueryBuilder<'static, Postgres>) -> String {
        qb.sql().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn default_window_is_first_ten_rows() {
        assert_eq!(PageRequest::default(), PageRequest { offset: 0, limit: 10 });
        assert_eq!(PageRequest::clamped(None, None, 10, 100), PageRequest::default());
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(
            PageRequest::clamped(Some(-5), Some(0), 10, 100),
            PageRequest { offset: 0, limit: 1 }
        );
        assert_eq!(
            PageRequest::clamped(Some(20), Some(1000), 10, 100),
            PageRequest { offset: 20, limit: 100 }
        );
    }

    struct Row(i64);

    impl Windowed for Row {
        fn total_count(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn page_total_comes_from_rows_not_window_size() {
        let page = Page::from_rows(PageRequest::default(), vec![Row(42), Row(42)], 0);
        assert_eq!(page.total_count, 42);
        assert!(page.has_more);

        let past_end = Page::<Row>::from_rows(PageRequest { offset: 50, limit: 10 }, vec![], 42);
        assert_eq!(past_end.total_count, 42);
        assert!(!past_end.has_more);

        let empty = Page::<Row>::empty(PageRequest::default());
        assert_eq!(empty.total_count, 0);
        assert!(empty.items.is_empty());
        assert!(!empty.has_more);

        let last = Page::from_rows(
            PageRequest { offset: 40, limit: 10 },
            vec![Row(42), Row(42)],
            0,
        );
        assert!(!last.has_more);
    }

    #[test]
    fn overall_type_listing_keeps_reports_without_items() {
        let sql = normalized(&listing_query(
            &ListingFilter::OverallType(OverallReportType::Bad),
            PageRequest::default(),
        ));
        assert!(sql.contains("LEFT JOIN report_item AS ri"));
        assert!(sql.contains("WHERE er.overall_type = $1"));
        assert!(sql.contains("COUNT(*) OVER () AS total_count"));
        assert!(sql.ends_with("OFFSET $2 LIMIT $3"));
    }

    #[test]
    fn report_item_listing_requires_an_item() {
        let sql = normalized(&listing_query(
            &ListingFilter::ReportItemType(ReportItemType::ErrFilter),
            PageRequest::default(),
        ));
        assert!(sql.contains(" JOIN report_item AS ri"));
        assert!(!sql.contains("LEFT JOIN report_item"));
        assert!(sql.contains("WHERE ri.specific_case = $1"));
        assert!(sql.contains("ORDER BY er.recorded_time ASC"));
    }

    #[test]
    fn route_listing_filters_by_route_ids() {
        let filter = ListingFilter::ObservedRoutes(vec![1, 2]);
        let sql = normalized(&listing_query(&filter, PageRequest::default()));
        assert!(sql.contains("o.observed_route_id = ANY($1)"));
        let count = normalized(&listing_count_query(&filter));
        assert!(count.starts_with("SELECT COUNT(*) AS total_count FROM exchange_report"));
        assert!(!count.contains("OFFSET"));
    }

    #[test]
    fn as_counts_union_both_roles_before_grouping() {
        let sql = normalized(&as_count_query(ReportFilter::OverallType(OverallReportType::Ok)));
        assert!(sql.contains("SELECT m.from_as AS as_num, 'from' AS role"));
        assert!(sql.contains("UNION ALL SELECT m.to_as AS as_num, 'to' AS role"));
        assert!(sql.contains("GROUP BY roles.as_num ORDER BY roles.as_num ASC"));

        let sql = normalized(&as_count_query(ReportFilter::ReportItemType(
            ReportItemType::Recursion,
        )));
        assert!(sql.contains("SELECT DISTINCT er.report_id"));
        assert!(sql.contains("WHERE ri.specific_case = $1"));
    }

    #[test]
    fn routes_for_as_binds_the_as_once_per_role() {
        let sql = normalized(&routes_for_as_query(3333));
        assert!(sql.contains("WHERE er.from_as = $1 UNION SELECT"));
        assert!(sql.contains("WHERE er.to_as = $2"));
        assert!(sql.contains("'to' AS role"));
    }
}
