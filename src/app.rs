use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/sites", get(handlers::sites))
        .route("/sites/:site_id", get(handlers::site_by_id))
        .route("/partners", get(handlers::partners))
        .route("/partners/:partner_id", get(handlers::partner_by_id))
        .route("/dashboard/summary", get(handlers::dashboard_summary))
        .route("/dashboard/seniors", get(handlers::dashboard_seniors))
        .route("/dashboard/accidents", get(handlers::dashboard_accidents))
        .route(
            "/dashboard/attendance/workers",
            get(handlers::attendance_workers),
        )
        .route("/dashboard/risk", get(handlers::dashboard_risk))
        .route("/risk/daily", get(handlers::risk_daily))
        .route("/risk/all-sites", get(handlers::risk_all_sites))
        .route("/risk/documents", get(handlers::risk_documents))
        .route("/risk/items/:doc_id", get(handlers::risk_items))
        .route("/dashboard/tbm", get(handlers::dashboard_tbm))
        .route("/tbm/logs", get(handlers::tbm_logs))
        .route("/tbm/participants/:tbm_id", get(handlers::tbm_participants))
        .route("/tbm/unconfirmed", get(handlers::tbm_unconfirmed))
        .with_state(state)
}
