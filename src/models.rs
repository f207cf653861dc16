use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---- normalized dataset records ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "관리자")]
    Manager,
    #[serde(rename = "근로자")]
    Worker,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "관리자",
            Role::Worker => "근로자",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub work_date: NaiveDate,
    pub site_id: i64,
    pub partner_id: i64,
    pub worker_name: String,
    pub role: Role,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub is_senior: bool,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    #[serde(default)]
    pub has_accident: bool,
}

/// Risk-assessment document classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "최초")]
    Initial,
    #[serde(rename = "수시")]
    AdHoc,
    #[serde(rename = "정기")]
    Periodic,
}

impl DocType {
    pub const ALL: [DocType; 3] = [DocType::Initial, DocType::AdHoc, DocType::Periodic];

    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Initial => "최초",
            DocType::AdHoc => "수시",
            DocType::Periodic => "정기",
        }
    }
}

/// One dated line inside a risk document. The category label drives the
/// risk-factor/action classification; the measure text, when present, is a
/// recorded corrective measure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskEntry {
    pub date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub measure: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfirmation {
    pub worker_name: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDoc {
    pub id: i64,
    pub site_id: i64,
    pub partner_id: i64,
    pub doc_type: DocType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub entries: Vec<RiskEntry>,
    #[serde(default)]
    pub confirmations: Vec<RiskConfirmation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TbmLog {
    pub id: i64,
    pub work_date: NaiveDate,
    pub site_id: i64,
    pub partner_id: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// The whole in-memory dataset the server aggregates over. One shape for
/// both the ETL-produced file and the built-in sample fixture.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dataset {
    pub sites: Vec<Site>,
    pub partners: Vec<Partner>,
    pub attendance: Vec<AttendanceRecord>,
    pub risk_docs: Vec<RiskDoc>,
    pub tbm_logs: Vec<TbmLog>,
}

impl Dataset {
    pub fn site_name(&self, site_id: i64) -> Option<&str> {
        self.sites
            .iter()
            .find(|s| s.id == site_id)
            .map(|s| s.name.as_str())
    }

    pub fn partner_name(&self, partner_id: i64) -> Option<&str> {
        self.partners
            .iter()
            .find(|p| p.id == partner_id)
            .map(|p| p.name.as_str())
    }
}

// ---- dashboard (attendance) responses ----

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardSummary {
    pub total_workers: u32,
    pub manager_count: u32,
    pub field_worker_count: u32,
    pub senior_total: u32,
    pub senior_managers: u32,
    pub senior_workers: u32,
    pub checkout_count: u32,
    pub checkout_rate: u32,
    pub accident_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    pub id: String,
    pub label: String,
    pub manager_count: u32,
    pub worker_count: u32,
    pub total_count: u32,
    pub accident_count: u32,
    pub senior_manager_count: u32,
    pub senior_worker_count: u32,
    pub total_senior_count: u32,
    pub checkout_count: u32,
    pub checkout_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub summary: DashboardSummary,
    pub rows: Vec<SummaryRow>,
}

/// Bar-chart projection of a summary row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub manager_count: u32,
    pub worker_count: u32,
}

/// One of exactly two age buckets in the headcount pie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u32,
}

/// Client-side projection of the dashboard response for chart rendering.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardViewModel {
    pub summary: DashboardSummary,
    pub rows: Vec<SummaryRow>,
    pub chart_data: Vec<ChartPoint>,
    pub pie_data: [PieSlice; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeniorWorker {
    pub name: String,
    pub age: u32,
    pub role: Role,
    pub partner: String,
    pub site: String,
    pub work_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accident {
    pub worker_name: String,
    pub role: Role,
    pub partner: String,
    pub site: String,
    pub work_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceWorker {
    pub work_date: NaiveDate,
    pub worker_name: String,
    pub role: Role,
    pub partner_name: String,
    pub age: Option<u32>,
    pub is_senior: bool,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub has_accident: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceWorkersResponse {
    pub site_id: i64,
    pub site_name: String,
    pub total_count: u32,
    pub workers: Vec<AttendanceWorker>,
}

// ---- risk-assessment responses ----

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RiskSummary {
    pub participating_companies: u32,
    pub active_documents: u32,
    pub risk_factors: u32,
    pub action_results: u32,
    /// Entries whose category matched no classification marker. Counted
    /// rather than silently dropped.
    #[serde(default)]
    pub unclassified: u32,
}

/// Legacy flat row: one site (all-sites scope) or one partner (single-site
/// scope), with no doc-type breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTableRow {
    pub id: String,
    pub label: String,
    pub comp_count: u32,
    pub doc_count: u32,
    pub risk_count: u32,
    pub action_count: u32,
    pub worker_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskChartPoint {
    pub date: NaiveDate,
    pub risk_count: u32,
    pub action_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummaryResponse {
    pub summary: RiskSummary,
    pub rows: Vec<RiskTableRow>,
    pub chart_data: Vec<RiskChartPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RiskDocTypeStats {
    pub doc_type: String,
    pub doc_count: u32,
    pub risk_count: u32,
    pub measure_count: u32,
    pub action_count: u32,
    pub confirm_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskCompanyRow {
    pub id: String,
    pub label: String,
    pub doc_types: Vec<RiskDocTypeStats>,
    pub total_doc_count: u32,
    pub total_risk_count: u32,
    pub total_measure_count: u32,
    pub total_action_count: u32,
    pub total_confirm_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSiteRow {
    pub id: String,
    pub label: String,
    pub companies: Vec<RiskCompanyRow>,
    pub total_comp_count: u32,
    pub total_doc_count: u32,
    pub total_risk_count: u32,
    pub total_measure_count: u32,
    pub total_action_count: u32,
    pub total_confirm_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDailyResponse {
    pub summary: RiskSummary,
    pub rows: Vec<RiskCompanyRow>,
    pub chart_data: Vec<RiskChartPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAllSitesResponse {
    pub summary: RiskSummary,
    pub rows: Vec<RiskSiteRow>,
    pub chart_data: Vec<RiskChartPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDocument {
    pub id: i64,
    pub site_name: String,
    pub partner_name: String,
    pub doc_type: DocType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub filename: Option<String>,
    pub item_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskItem {
    pub date: NaiveDate,
    pub category: String,
    pub measure: Option<String>,
}

// ---- TBM responses ----

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TbmSummary {
    pub participating_companies: u32,
    pub written_tbm_docs: u32,
    pub total_tbm_attendees: u32,
    pub participation_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TbmTableRow {
    pub id: String,
    pub label: String,
    pub comp_count: u32,
    pub tbm_count: u32,
    pub total_attendance: u32,
    pub attendees: u32,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TbmSummaryResponse {
    pub summary: TbmSummary,
    pub rows: Vec<TbmTableRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TbmLogView {
    pub id: i64,
    pub work_date: NaiveDate,
    pub site_name: String,
    pub partner_name: String,
    pub content: Option<String>,
    pub participant_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnconfirmedWorker {
    pub worker_name: String,
    pub role: Role,
    pub partner_name: String,
    pub work_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TbmUnconfirmedResponse {
    pub site_id: i64,
    pub site_name: String,
    pub total_attendance: u32,
    pub tbm_confirmed: u32,
    pub unconfirmed_count: u32,
    pub unconfirmed_workers: Vec<UnconfirmedWorker>,
}
