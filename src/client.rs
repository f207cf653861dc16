use crate::models::{
    Accident, AttendanceWorkersResponse, DashboardResponse, Partner, RiskAllSitesResponse,
    RiskDailyResponse, RiskDocument, RiskItem, RiskSummaryResponse, SeniorWorker, Site,
    TbmLogView, TbmSummaryResponse, TbmUnconfirmedResponse,
};
use crate::period::Period;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::fmt;

/// Gateway failure taxonomy. Transport failures are retryable with the
/// identical request; a non-success status from the backend is not.
#[derive(Debug)]
pub enum FetchError {
    Network(reqwest::Error),
    Api { status: u16, body: String },
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Network(err) => !err.is_decode(),
            FetchError::Api { .. } => false,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(err) => write!(f, "network error: {err}"),
            FetchError::Api { status, body } => write!(f, "API error {status}: {body}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Assembles the outgoing query, dropping absent parameters entirely. An
/// all-sites request carries no `site_id` key rather than a literal null.
fn build_query(params: &[(&str, Option<String>)]) -> Vec<(String, String)> {
    params
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
}

/// Typed client over the dashboard REST surface.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<T, FetchError> {
        let mut request = self.http.get(format!("{}{path}", self.base_url));
        let query = build_query(params);
        if !query.is_empty() {
            request = request.query(&query);
        }

        let response = request.send().await.map_err(FetchError::Network)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(FetchError::Network)
    }

    // ---- master data ----

    pub async fn sites(&self) -> Result<Vec<Site>, FetchError> {
        self.get_json("/sites", &[]).await
    }

    pub async fn site(&self, site_id: i64) -> Result<Site, FetchError> {
        self.get_json(&format!("/sites/{site_id}"), &[]).await
    }

    pub async fn partners(&self) -> Result<Vec<Partner>, FetchError> {
        self.get_json("/partners", &[]).await
    }

    pub async fn partner(&self, partner_id: i64) -> Result<Partner, FetchError> {
        self.get_json(&format!("/partners/{partner_id}"), &[]).await
    }

    // ---- dashboard ----

    pub async fn dashboard_summary(
        &self,
        site_id: Option<i64>,
        date: NaiveDate,
        period: Period,
    ) -> Result<DashboardResponse, FetchError> {
        self.get_json("/dashboard/summary", &scope_params(site_id, date, period))
            .await
    }

    pub async fn seniors(
        &self,
        site_id: Option<i64>,
        date: NaiveDate,
    ) -> Result<Vec<SeniorWorker>, FetchError> {
        self.get_json(
            "/dashboard/seniors",
            &[
                ("site_id", site_id.map(|id| id.to_string())),
                ("date", Some(date.to_string())),
            ],
        )
        .await
    }

    pub async fn accidents(
        &self,
        site_id: Option<i64>,
        date: NaiveDate,
        period: Period,
    ) -> Result<Vec<Accident>, FetchError> {
        self.get_json("/dashboard/accidents", &scope_params(site_id, date, period))
            .await
    }

    pub async fn attendance_workers(
        &self,
        site_id: i64,
        date: NaiveDate,
        period: Period,
        partner_id: Option<i64>,
    ) -> Result<AttendanceWorkersResponse, FetchError> {
        self.get_json(
            "/dashboard/attendance/workers",
            &site_scoped_params(site_id, date, period, partner_id),
        )
        .await
    }

    // ---- risk assessment ----

    pub async fn risk_summary(
        &self,
        site_id: Option<i64>,
        date: NaiveDate,
        period: Period,
    ) -> Result<RiskSummaryResponse, FetchError> {
        self.get_json("/dashboard/risk", &scope_params(site_id, date, period))
            .await
    }

    pub async fn risk_daily(
        &self,
        site_id: i64,
        date: NaiveDate,
        period: Period,
    ) -> Result<RiskDailyResponse, FetchError> {
        self.get_json(
            "/risk/daily",
            &site_scoped_params(site_id, date, period, None),
        )
        .await
    }

    pub async fn risk_all_sites(
        &self,
        date: NaiveDate,
        period: Period,
    ) -> Result<RiskAllSitesResponse, FetchError> {
        self.get_json(
            "/risk/all-sites",
            &[
                ("date", Some(date.to_string())),
                ("period", Some(period.as_str().to_string())),
            ],
        )
        .await
    }

    pub async fn risk_documents(
        &self,
        site_id: Option<i64>,
        date: NaiveDate,
        period: Period,
    ) -> Result<Vec<RiskDocument>, FetchError> {
        self.get_json("/risk/documents", &scope_params(site_id, date, period))
            .await
    }

    pub async fn risk_items(&self, doc_id: i64) -> Result<Vec<RiskItem>, FetchError> {
        self.get_json(&format!("/risk/items/{doc_id}"), &[]).await
    }

    // ---- TBM ----

    pub async fn tbm_summary(
        &self,
        site_id: Option<i64>,
        date: NaiveDate,
        period: Period,
    ) -> Result<TbmSummaryResponse, FetchError> {
        self.get_json("/dashboard/tbm", &scope_params(site_id, date, period))
            .await
    }

    pub async fn tbm_logs(
        &self,
        site_id: Option<i64>,
        date: NaiveDate,
    ) -> Result<Vec<TbmLogView>, FetchError> {
        self.get_json(
            "/tbm/logs",
            &[
                ("site_id", site_id.map(|id| id.to_string())),
                ("date", Some(date.to_string())),
            ],
        )
        .await
    }

    pub async fn tbm_participants(&self, tbm_id: i64) -> Result<Vec<String>, FetchError> {
        self.get_json(&format!("/tbm/participants/{tbm_id}"), &[])
            .await
    }

    /// On-demand unconfirmed-worker lookup, not part of the primary load.
    pub async fn tbm_unconfirmed(
        &self,
        site_id: i64,
        date: NaiveDate,
        period: Period,
        partner_id: Option<i64>,
    ) -> Result<TbmUnconfirmedResponse, FetchError> {
        self.get_json(
            "/tbm/unconfirmed",
            &site_scoped_params(site_id, date, period, partner_id),
        )
        .await
    }
}

fn scope_params(
    site_id: Option<i64>,
    date: NaiveDate,
    period: Period,
) -> [(&'static str, Option<String>); 3] {
    [
        ("site_id", site_id.map(|id| id.to_string())),
        ("date", Some(date.to_string())),
        ("period", Some(period.as_str().to_string())),
    ]
}

fn site_scoped_params(
    site_id: i64,
    date: NaiveDate,
    period: Period,
    partner_id: Option<i64>,
) -> [(&'static str, Option<String>); 4] {
    [
        ("site_id", Some(site_id.to_string())),
        ("date", Some(date.to_string())),
        ("period", Some(period.as_str().to_string())),
        ("partner_id", partner_id.map(|id| id.to_string())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_params_are_omitted_not_serialized_as_null() {
        let query = build_query(&scope_params(
            None,
            NaiveDate::from_ymd_opt(2025, 12, 19).unwrap(),
            Period::Weekly,
        ));
        assert_eq!(
            query,
            vec![
                ("date".to_string(), "2025-12-19".to_string()),
                ("period".to_string(), "WEEKLY".to_string()),
            ]
        );

        let query = build_query(&scope_params(
            Some(3),
            NaiveDate::from_ymd_opt(2025, 12, 19).unwrap(),
            Period::Daily,
        ));
        assert_eq!(query[0], ("site_id".to_string(), "3".to_string()));
    }

    #[test]
    fn api_errors_are_not_retryable() {
        let err = FetchError::Api {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!err.is_retryable());
    }
}
