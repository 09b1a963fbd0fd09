use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use core_types::{NetworkPrefix, OverallReportType, ReportItemType};
use database::{
    AsCount, AutNumRecord, Book, ExchangeReport, NewBook, Page, PageRequest, ReportListing,
    RouteForAs, RpslObject,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type PathParam<T> = WithRejection<Path<T>, AppError>;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    offset: Option<i64>,
    limit: Option<i64>,
}

impl PageParams {
    fn window(&self, state: &AppState) -> PageRequest {
        PageRequest::clamped(
            self.offset,
            self.limit,
            state.pagination.default_limit,
            state.pagination.max_limit,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct AsSetName {
    pub as_num: i32,
    pub as_set_name: String,
}

/// # GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Result<&'static str, AppError> {
    state.db_repo.ping().await?;
    Ok("OK")
}

/// # GET /rpsl_obj/:name
pub async fn get_rpsl_obj(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(name), _): PathParam<String>,
) -> Result<Json<RpslObject>, AppError> {
    let obj = state
        .db_repo
        .get_rpsl_obj(&name)
        .await
        .map_err(AppError::not_found(|| format!("RPSL object `{}` not found", name)))?;
    Ok(Json(obj))
}

/// # GET /aut_num/:as_num
pub async fn get_aut_num(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(as_num), _): PathParam<i32>,
) -> Result<Json<AutNumRecord>, AppError> {
    let aut_num = state
        .db_repo
        .get_aut_num(as_num)
        .await
        .map_err(AppError::not_found(|| format!("aut-num AS{} not found", as_num)))?;
    Ok(Json(aut_num))
}

/// # GET /verification_reports/:observed_route_id
pub async fn get_verification_reports(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(observed_route_id), _): PathParam<i32>,
) -> Result<Json<Vec<ExchangeReport>>, AppError> {
    let reports = state
        .db_repo
        .get_verification_reports(observed_route_id)
        .await?;
    Ok(Json(reports))
}

/// # GET /overall_report_type/:type
pub async fn get_by_overall_report_type(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(ty), _): PathParam<String>,
) -> Result<Json<Vec<ExchangeReport>>, AppError> {
    let ty: OverallReportType = ty.parse()?;
    let reports = state.db_repo.get_by_overall_report_type(ty).await?;
    Ok(Json(reports))
}

/// # GET /as_for_overall_report_type/:type
pub async fn get_as_for_overall_report_type(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(ty), _): PathParam<String>,
) -> Result<Json<Vec<AsCount>>, AppError> {
    let ty: OverallReportType = ty.parse()?;
    let counts = state.db_repo.get_as_for_overall_report_type(ty).await?;
    Ok(Json(counts))
}

/// # GET /as_for_report_item_type/:type
pub async fn get_as_for_report_item_type(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(ty), _): PathParam<String>,
) -> Result<Json<Vec<AsCount>>, AppError> {
    let ty: ReportItemType = ty.parse()?;
    let counts = state.db_repo.get_as_for_report_item_type(ty).await?;
    Ok(Json(counts))
}

/// # GET /for_overall_report_type/:type
/// Reports of one overall type joined with their routes and items, one page
/// at a time (`?offset=&limit=`, default 0 and 10).
pub async fn get_for_overall_report_type(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(ty), _): PathParam<String>,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Json<Page<ReportListing>>, AppError> {
    let ty: OverallReportType = ty.parse()?;
    let page = state
        .db_repo
        .get_for_overall_report_type(ty, params.window(&state))
        .await?;
    Ok(Json(page))
}

/// # GET /for_report_item_type/:type
pub async fn get_for_report_item_type(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(ty), _): PathParam<String>,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Json<Page<ReportListing>>, AppError> {
    let ty: ReportItemType = ty.parse()?;
    let page = state
        .db_repo
        .get_for_report_item_type(ty, params.window(&state))
        .await?;
    Ok(Json(page))
}

/// # GET /for_address_prefix/:address/:prefix_length
pub async fn get_for_address_prefix(
    State(state): State<Arc<AppState>>,
    WithRejection(Path((address, prefix_length)), _): PathParam<(String, String)>,
    WithRejection(Query(params), _): WithRejection<Query<PageParams>, AppError>,
) -> Result<Json<Page<ReportListing>>, AppError> {
    let prefix = NetworkPrefix::parse(&address, &prefix_length)?;
    let page = state
        .db_repo
        .get_for_address_prefix(&prefix, params.window(&state))
        .await?;
    Ok(Json(page))
}

/// # GET /report_for_as/:as_num
pub async fn get_reports_for_as(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(as_num), _): PathParam<i32>,
) -> Result<Json<Vec<ExchangeReport>>, AppError> {
    let reports = state.db_repo.get_reports_for_as(as_num).await?;
    Ok(Json(reports))
}

/// # GET /route_for_as/:as_num
pub async fn get_routes_for_as(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(as_num), _): PathParam<i32>,
) -> Result<Json<Vec<RouteForAs>>, AppError> {
    let routes = state.db_repo.get_routes_for_as(as_num).await?;
    Ok(Json(routes))
}

/// # GET /as_set/:as_num
pub async fn get_as_set_name(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(as_num), _): PathParam<i32>,
) -> Result<Json<AsSetName>, AppError> {
    let as_set_name = state
        .db_repo
        .get_as_set_name(as_num)
        .await
        .map_err(AppError::not_found(|| {
            format!("AS{} is not a member of any as-set", as_num)
        }))?;
    Ok(Json(AsSetName {
        as_num,
        as_set_name,
    }))
}

/// # POST /books
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(book), _): WithRejection<Json<NewBook>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let book: Book = state.db_repo.insert_book(&book).await?;
    Ok((StatusCode::CREATED, Json(book)))
}
