use crate::aggregate;
use crate::errors::AppError;
use crate::models::{
    Accident, AttendanceWorkersResponse, DashboardResponse, Partner, RiskAllSitesResponse,
    RiskDailyResponse, RiskDocument, RiskItem, RiskSummaryResponse, SeniorWorker, Site,
    TbmLogView, TbmSummaryResponse, TbmUnconfirmedResponse,
};
use crate::period::{DateInterval, Period};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

/// (site, date, period) tuple shared by most aggregate endpoints. A missing
/// `site_id` means all-sites scope; the period defaults to DAILY.
#[derive(Debug, Deserialize)]
pub struct ScopeQuery {
    pub site_id: Option<i64>,
    pub date: NaiveDate,
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub site_id: Option<i64>,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SiteScopedQuery {
    pub site_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub period: Period,
    pub partner_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AllSitesQuery {
    pub date: NaiveDate,
    #[serde(default)]
    pub period: Period,
}

pub async fn index() -> Html<String> {
    Html(render_index(&Local::now().date_naive().to_string()))
}

// ---- master data ----

pub async fn sites(State(state): State<AppState>) -> Json<Vec<Site>> {
    let data = state.data.lock().await;
    let mut sites = data.sites.clone();
    sites.sort_by(|a, b| a.name.cmp(&b.name));
    Json(sites)
}

pub async fn site_by_id(
    State(state): State<AppState>,
    Path(site_id): Path<i64>,
) -> Result<Json<Site>, AppError> {
    let data = state.data.lock().await;
    data.sites
        .iter()
        .find(|s| s.id == site_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("site not found"))
}

pub async fn partners(State(state): State<AppState>) -> Json<Vec<Partner>> {
    let data = state.data.lock().await;
    let mut partners = data.partners.clone();
    partners.sort_by(|a, b| a.name.cmp(&b.name));
    Json(partners)
}

pub async fn partner_by_id(
    State(state): State<AppState>,
    Path(partner_id): Path<i64>,
) -> Result<Json<Partner>, AppError> {
    let data = state.data.lock().await;
    data.partners
        .iter()
        .find(|p| p.id == partner_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found("partner not found"))
}

// ---- dashboard (attendance) ----

pub async fn dashboard_summary(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Json<DashboardResponse> {
    let interval = DateInterval::resolve(query.date, query.period);
    let data = state.data.lock().await;
    Json(aggregate::dashboard_summary(&data, query.site_id, interval))
}

pub async fn dashboard_seniors(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Json<Vec<SeniorWorker>> {
    let data = state.data.lock().await;
    Json(aggregate::senior_workers(&data, query.site_id, query.date))
}

pub async fn dashboard_accidents(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Json<Vec<Accident>> {
    let interval = DateInterval::resolve(query.date, query.period);
    let data = state.data.lock().await;
    Json(aggregate::accidents(&data, query.site_id, interval))
}

pub async fn attendance_workers(
    State(state): State<AppState>,
    Query(query): Query<SiteScopedQuery>,
) -> Json<AttendanceWorkersResponse> {
    let interval = DateInterval::resolve(query.date, query.period);
    let data = state.data.lock().await;
    Json(aggregate::attendance_workers(
        &data,
        query.site_id,
        query.partner_id,
        interval,
    ))
}

// ---- risk assessment ----

pub async fn dashboard_risk(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Json<RiskSummaryResponse> {
    let interval = DateInterval::resolve(query.date, query.period);
    let data = state.data.lock().await;
    Json(aggregate::risk_summary(&data, query.site_id, interval))
}

pub async fn risk_daily(
    State(state): State<AppState>,
    Query(query): Query<SiteScopedQuery>,
) -> Json<RiskDailyResponse> {
    let interval = DateInterval::resolve(query.date, query.period);
    let today = Local::now().date_naive();
    let data = state.data.lock().await;
    Json(aggregate::risk_daily(&data, query.site_id, interval, today))
}

pub async fn risk_all_sites(
    State(state): State<AppState>,
    Query(query): Query<AllSitesQuery>,
) -> Json<RiskAllSitesResponse> {
    let interval = DateInterval::resolve(query.date, query.period);
    let today = Local::now().date_naive();
    let data = state.data.lock().await;
    Json(aggregate::risk_all_sites(&data, interval, today))
}

pub async fn risk_documents(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Json<Vec<RiskDocument>> {
    let interval = DateInterval::resolve(query.date, query.period);
    let data = state.data.lock().await;
    Json(aggregate::risk_documents(&data, query.site_id, interval))
}

pub async fn risk_items(
    State(state): State<AppState>,
    Path(doc_id): Path<i64>,
) -> Result<Json<Vec<RiskItem>>, AppError> {
    let data = state.data.lock().await;
    aggregate::risk_items(&data, doc_id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("risk document not found"))
}

// ---- TBM ----

pub async fn dashboard_tbm(
    State(state): State<AppState>,
    Query(query): Query<ScopeQuery>,
) -> Json<TbmSummaryResponse> {
    let interval = DateInterval::resolve(query.date, query.period);
    let data = state.data.lock().await;
    Json(aggregate::tbm_summary(&data, query.site_id, interval))
}

pub async fn tbm_logs(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Json<Vec<TbmLogView>> {
    let data = state.data.lock().await;
    Json(aggregate::tbm_logs(&data, query.site_id, query.date))
}

pub async fn tbm_participants(
    State(state): State<AppState>,
    Path(tbm_id): Path<i64>,
) -> Result<Json<Vec<String>>, AppError> {
    let data = state.data.lock().await;
    aggregate::tbm_participants(&data, tbm_id)
        .map(Json)
        .ok_or_else(|| AppError::not_found("TBM log not found"))
}

pub async fn tbm_unconfirmed(
    State(state): State<AppState>,
    Query(query): Query<SiteScopedQuery>,
) -> Json<TbmUnconfirmedResponse> {
    let interval = DateInterval::resolve(query.date, query.period);
    let data = state.data.lock().await;
    Json(aggregate::tbm_unconfirmed(
        &data,
        query.site_id,
        interval,
        query.partner_id,
    ))
}
