use crate::models::{
    Accident, AttendanceWorker, AttendanceWorkersResponse, ChartPoint, DashboardResponse,
    DashboardSummary, DashboardViewModel, Dataset, DocType, PieSlice, RiskChartPoint,
    RiskCompanyRow, RiskDailyResponse, RiskDoc, RiskDocTypeStats, RiskDocument, RiskItem,
    RiskAllSitesResponse, RiskSiteRow, RiskSummary, RiskSummaryResponse, RiskTableRow,
    SeniorWorker, SummaryRow, TbmLogView, TbmSummary, TbmSummaryResponse, TbmTableRow,
    TbmUnconfirmedResponse, UnconfirmedWorker,
};
use crate::period::DateInterval;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

const UNKNOWN: &str = "-";

/// Integer percent, rounded; 0 when the denominator is 0.
fn percent(part: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (f64::from(part) / f64::from(total) * 100.0).round() as u32
    }
}

/// Participation rate with one decimal, clamped to 100. Recorded attendees
/// can exceed recorded attendance (duplicate sign-ins), so clamping is the
/// policy rather than erroring.
fn participation_rate(attendees: u32, attendance: u32) -> f64 {
    if attendance == 0 {
        return 0.0;
    }
    let rate = f64::from(attendees) / f64::from(attendance) * 100.0;
    ((rate * 10.0).round() / 10.0).min(100.0)
}

// ---- category classification ----

/// Classification of one risk-document entry. A single label may carry both
/// markers; that entry then counts in both buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryClass {
    pub risk_factor: bool,
    pub action: bool,
}

impl EntryClass {
    pub fn is_unclassified(self) -> bool {
        !self.risk_factor && !self.action
    }
}

/// Mapping table: `추가위험` marks a risk factor, `조치`/`이행` mark an
/// action. Anything else lands in the unclassified bucket instead of being
/// dropped.
pub fn classify(category: &str) -> EntryClass {
    EntryClass {
        risk_factor: category.contains("추가위험"),
        action: category.contains("조치") || category.contains("이행"),
    }
}

// ---- dashboard (attendance) ----

#[derive(Default)]
struct AttendanceAcc {
    manager: u32,
    worker: u32,
    total: u32,
    accident: u32,
    senior_manager: u32,
    senior_worker: u32,
    senior_total: u32,
    checkout: u32,
}

/// Attendance rollup. All-sites scope groups by site, single-site scope by
/// partner; rows come back sorted by group name.
pub fn dashboard_summary(
    data: &Dataset,
    site_id: Option<i64>,
    interval: DateInterval,
) -> DashboardResponse {
    let mut groups: BTreeMap<i64, AttendanceAcc> = BTreeMap::new();

    for record in &data.attendance {
        if !interval.contains(record.work_date) {
            continue;
        }
        let key = match site_id {
            Some(site) => {
                if record.site_id != site {
                    continue;
                }
                record.partner_id
            }
            None => record.site_id,
        };
        let acc = groups.entry(key).or_default();
        acc.total += 1;
        match record.role {
            crate::models::Role::Manager => {
                acc.manager += 1;
                if record.is_senior {
                    acc.senior_manager += 1;
                }
            }
            crate::models::Role::Worker => {
                acc.worker += 1;
                if record.is_senior {
                    acc.senior_worker += 1;
                }
            }
        }
        if record.is_senior {
            acc.senior_total += 1;
        }
        if record.check_out.is_some() {
            acc.checkout += 1;
        }
        if record.has_accident {
            acc.accident += 1;
        }
    }

    let mut summary = DashboardSummary::default();
    let mut rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|(group_id, acc)| {
            summary.total_workers += acc.total;
            summary.manager_count += acc.manager;
            summary.field_worker_count += acc.worker;
            summary.senior_managers += acc.senior_manager;
            summary.senior_workers += acc.senior_worker;
            summary.senior_total += acc.senior_total;
            summary.checkout_count += acc.checkout;
            summary.accident_count += acc.accident;

            let label = match site_id {
                Some(_) => data.partner_name(group_id),
                None => data.site_name(group_id),
            };
            SummaryRow {
                id: group_id.to_string(),
                label: label.unwrap_or(UNKNOWN).to_string(),
                manager_count: acc.manager,
                worker_count: acc.worker,
                total_count: acc.total,
                accident_count: acc.accident,
                senior_manager_count: acc.senior_manager,
                senior_worker_count: acc.senior_worker,
                total_senior_count: acc.senior_total,
                checkout_count: acc.checkout,
                checkout_rate: percent(acc.checkout, acc.total),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));
    summary.checkout_rate = percent(summary.checkout_count, summary.total_workers);

    DashboardResponse { summary, rows }
}

/// Chart/pie projection of a dashboard response. The pie is exactly two age
/// buckets; senior counts are clamped so neither bucket goes negative even
/// on inconsistent upstream data.
pub fn build_dashboard_view(response: DashboardResponse) -> DashboardViewModel {
    let chart_data = response
        .rows
        .iter()
        .map(|row| ChartPoint {
            name: row.label.clone(),
            manager_count: row.manager_count,
            worker_count: row.worker_count,
        })
        .collect();

    let total = response.summary.total_workers;
    let senior = response.summary.senior_total.min(total);
    let pie_data = [
        PieSlice {
            name: "65세 미만".to_string(),
            value: total - senior,
        },
        PieSlice {
            name: "65세 이상".to_string(),
            value: senior,
        },
    ];

    DashboardViewModel {
        summary: response.summary,
        rows: response.rows,
        chart_data,
        pie_data,
    }
}

pub fn senior_workers(data: &Dataset, site_id: Option<i64>, date: NaiveDate) -> Vec<SeniorWorker> {
    let mut seniors: Vec<SeniorWorker> = data
        .attendance
        .iter()
        .filter(|r| r.is_senior && r.work_date == date)
        .filter(|r| site_id.is_none_or(|site| r.site_id == site))
        .map(|r| SeniorWorker {
            name: r.worker_name.clone(),
            age: r.age.unwrap_or(0),
            role: r.role,
            partner: data.partner_name(r.partner_id).unwrap_or(UNKNOWN).to_string(),
            site: data.site_name(r.site_id).unwrap_or(UNKNOWN).to_string(),
            work_date: r.work_date,
        })
        .collect();
    seniors.sort_by(|a, b| b.age.cmp(&a.age).then_with(|| a.name.cmp(&b.name)));
    seniors
}

pub fn accidents(data: &Dataset, site_id: Option<i64>, interval: DateInterval) -> Vec<Accident> {
    let mut list: Vec<Accident> = data
        .attendance
        .iter()
        .filter(|r| r.has_accident && interval.contains(r.work_date))
        .filter(|r| site_id.is_none_or(|site| r.site_id == site))
        .map(|r| Accident {
            worker_name: r.worker_name.clone(),
            role: r.role,
            partner: data.partner_name(r.partner_id).unwrap_or(UNKNOWN).to_string(),
            site: data.site_name(r.site_id).unwrap_or(UNKNOWN).to_string(),
            work_date: r.work_date,
        })
        .collect();
    list.sort_by(|a, b| b.work_date.cmp(&a.work_date));
    list
}

/// Per-worker attendance roster for one site. `site_id` is required here,
/// unlike the other dashboard queries.
pub fn attendance_workers(
    data: &Dataset,
    site_id: i64,
    partner_id: Option<i64>,
    interval: DateInterval,
) -> AttendanceWorkersResponse {
    let mut workers: Vec<AttendanceWorker> = data
        .attendance
        .iter()
        .filter(|r| r.site_id == site_id && interval.contains(r.work_date))
        .filter(|r| partner_id.is_none_or(|p| r.partner_id == p))
        .map(|r| AttendanceWorker {
            work_date: r.work_date,
            worker_name: r.worker_name.clone(),
            role: r.role,
            partner_name: data.partner_name(r.partner_id).unwrap_or(UNKNOWN).to_string(),
            age: r.age,
            is_senior: r.is_senior,
            check_in: r.check_in.clone(),
            check_out: r.check_out.clone(),
            has_accident: r.has_accident,
        })
        .collect();
    workers.sort_by(|a, b| {
        b.work_date
            .cmp(&a.work_date)
            .then_with(|| a.partner_name.cmp(&b.partner_name))
            .then_with(|| a.worker_name.cmp(&b.worker_name))
    });

    AttendanceWorkersResponse {
        site_id,
        site_name: data.site_name(site_id).unwrap_or(UNKNOWN).to_string(),
        total_count: workers.len() as u32,
        workers,
    }
}

// ---- risk assessment ----

/// A document is in scope iff its management period overlaps the interval,
/// non-strict on both boundaries.
fn in_scope_docs<'a>(
    data: &'a Dataset,
    site_id: Option<i64>,
    interval: DateInterval,
) -> Vec<&'a RiskDoc> {
    data.risk_docs
        .iter()
        .filter(|d| site_id.is_none_or(|site| d.site_id == site))
        .filter(|d| interval.overlaps(d.start_date, d.end_date))
        .collect()
}

/// Entry tallies over one document list, counting only entries dated inside
/// the interval.
fn tally_entries(docs: &[&RiskDoc], interval: DateInterval) -> (u32, u32, u32, u32) {
    let mut risk = 0;
    let mut action = 0;
    let mut measure = 0;
    let mut unclassified = 0;
    for doc in docs {
        for entry in &doc.entries {
            if !interval.contains(entry.date) {
                continue;
            }
            let class = classify(&entry.category);
            if class.risk_factor {
                risk += 1;
            }
            if class.action {
                action += 1;
            }
            if class.is_unclassified() {
                unclassified += 1;
            }
            if entry.measure.as_deref().is_some_and(|m| !m.is_empty()) {
                measure += 1;
            }
        }
    }
    (risk, action, measure, unclassified)
}

fn distinct_attendance_workers(
    data: &Dataset,
    interval: DateInterval,
    matches: impl Fn(&crate::models::AttendanceRecord) -> bool,
) -> u32 {
    let names: BTreeSet<&str> = data
        .attendance
        .iter()
        .filter(|r| interval.contains(r.work_date) && matches(r))
        .map(|r| r.worker_name.as_str())
        .collect();
    names.len() as u32
}

fn risk_chart_data(docs: &[&RiskDoc], interval: DateInterval) -> Vec<RiskChartPoint> {
    interval
        .days()
        .map(|day| {
            let mut risk = 0;
            let mut action = 0;
            for doc in docs {
                for entry in doc.entries.iter().filter(|e| e.date == day) {
                    let class = classify(&entry.category);
                    if class.risk_factor {
                        risk += 1;
                    }
                    if class.action {
                        action += 1;
                    }
                }
            }
            RiskChartPoint {
                date: day,
                risk_count: risk,
                action_count: action,
            }
        })
        .collect()
}

/// Legacy flat shape: one row per site (all-sites) or partner (single site),
/// no doc-type breakdown. Serves the `/dashboard/risk` fallback path.
pub fn risk_summary(
    data: &Dataset,
    site_id: Option<i64>,
    interval: DateInterval,
) -> RiskSummaryResponse {
    let docs = in_scope_docs(data, site_id, interval);

    let mut groups: BTreeMap<i64, Vec<&RiskDoc>> = BTreeMap::new();
    for doc in &docs {
        let key = match site_id {
            Some(_) => doc.partner_id,
            None => doc.site_id,
        };
        groups.entry(key).or_default().push(doc);
    }

    let mut summary = RiskSummary::default();
    let mut rows: Vec<RiskTableRow> = groups
        .into_iter()
        .map(|(group_id, group_docs)| {
            let (risk, action, _, unclassified) = tally_entries(&group_docs, interval);
            let partners: BTreeSet<i64> = group_docs.iter().map(|d| d.partner_id).collect();
            let worker_count = distinct_attendance_workers(data, interval, |r| match site_id {
                Some(site) => r.site_id == site && r.partner_id == group_id,
                None => r.site_id == group_id,
            });

            summary.active_documents += group_docs.len() as u32;
            summary.risk_factors += risk;
            summary.action_results += action;
            summary.unclassified += unclassified;

            let label = match site_id {
                Some(_) => data.partner_name(group_id),
                None => data.site_name(group_id),
            };
            RiskTableRow {
                id: group_id.to_string(),
                label: label.unwrap_or(UNKNOWN).to_string(),
                comp_count: partners.len() as u32,
                doc_count: group_docs.len() as u32,
                risk_count: risk,
                action_count: action,
                worker_count,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));

    let participating: BTreeSet<i64> = docs.iter().map(|d| d.partner_id).collect();
    summary.participating_companies = participating.len() as u32;

    RiskSummaryResponse {
        summary,
        rows,
        chart_data: risk_chart_data(&docs, interval),
    }
}

fn doc_type_stats(
    docs: &[&RiskDoc],
    doc_type: DocType,
    interval: DateInterval,
    today: NaiveDate,
) -> RiskDocTypeStats {
    let typed: Vec<&RiskDoc> = docs
        .iter()
        .copied()
        .filter(|d| d.doc_type == doc_type)
        .collect();
    let (risk, action, measure, _) = tally_entries(&typed, interval);

    // A worker counts once if confirmed at least once inside the interval,
    // and only for documents whose management period has fully elapsed. An
    // ongoing document's confirmations are excluded by intent, so this
    // figure is not comparable to daily attendance headcount.
    let confirmed: BTreeSet<&str> = typed
        .iter()
        .filter(|d| d.end_date < today)
        .flat_map(|d| d.confirmations.iter())
        .filter(|c| interval.contains(c.date))
        .map(|c| c.worker_name.as_str())
        .collect();

    RiskDocTypeStats {
        doc_type: doc_type.as_str().to_string(),
        doc_count: typed.len() as u32,
        risk_count: risk,
        measure_count: measure,
        action_count: action,
        confirm_count: confirmed.len() as u32,
    }
}

fn company_row(
    data: &Dataset,
    partner_id: i64,
    docs: &[&RiskDoc],
    interval: DateInterval,
    today: NaiveDate,
) -> RiskCompanyRow {
    let doc_types: Vec<RiskDocTypeStats> = DocType::ALL
        .iter()
        .map(|&t| doc_type_stats(docs, t, interval, today))
        .collect();

    RiskCompanyRow {
        id: partner_id.to_string(),
        label: data.partner_name(partner_id).unwrap_or(UNKNOWN).to_string(),
        total_doc_count: doc_types.iter().map(|t| t.doc_count).sum(),
        total_risk_count: doc_types.iter().map(|t| t.risk_count).sum(),
        total_measure_count: doc_types.iter().map(|t| t.measure_count).sum(),
        total_action_count: doc_types.iter().map(|t| t.action_count).sum(),
        total_confirm_count: doc_types.iter().map(|t| t.confirm_count).sum(),
        doc_types,
    }
}

/// KPI summary over a doc set. Action and confirm aggregates surface only
/// the 수시 (ad-hoc) doc type; that is the domain rule, not an omission.
fn risk_kpis(docs: &[&RiskDoc], interval: DateInterval, today: NaiveDate) -> RiskSummary {
    let (risk, _, _, unclassified) = tally_entries(docs, interval);
    let adhoc = doc_type_stats(docs, DocType::AdHoc, interval, today);
    let participating: BTreeSet<i64> = docs.iter().map(|d| d.partner_id).collect();

    RiskSummary {
        participating_companies: participating.len() as u32,
        active_documents: docs.len() as u32,
        risk_factors: risk,
        action_results: adhoc.action_count,
        unclassified,
    }
}

/// Single-site partner → doc-type breakdown (2-level table).
pub fn risk_daily(
    data: &Dataset,
    site_id: i64,
    interval: DateInterval,
    today: NaiveDate,
) -> RiskDailyResponse {
    let docs = in_scope_docs(data, Some(site_id), interval);

    let mut by_partner: BTreeMap<i64, Vec<&RiskDoc>> = BTreeMap::new();
    for doc in &docs {
        by_partner.entry(doc.partner_id).or_default().push(doc);
    }

    let mut rows: Vec<RiskCompanyRow> = by_partner
        .into_iter()
        .map(|(partner_id, partner_docs)| {
            company_row(data, partner_id, &partner_docs, interval, today)
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));

    let adhoc_docs: Vec<&RiskDoc> = docs
        .iter()
        .copied()
        .filter(|d| d.doc_type == DocType::AdHoc)
        .collect();

    RiskDailyResponse {
        summary: risk_kpis(&docs, interval, today),
        rows,
        chart_data: risk_chart_data(&adhoc_docs, interval),
    }
}

/// All-sites site → partner → doc-type breakdown (3-level table).
pub fn risk_all_sites(
    data: &Dataset,
    interval: DateInterval,
    today: NaiveDate,
) -> RiskAllSitesResponse {
    let docs = in_scope_docs(data, None, interval);

    let mut by_site: BTreeMap<i64, Vec<&RiskDoc>> = BTreeMap::new();
    for doc in &docs {
        by_site.entry(doc.site_id).or_default().push(doc);
    }

    let mut rows: Vec<RiskSiteRow> = by_site
        .into_iter()
        .map(|(site_id, site_docs)| {
            let mut by_partner: BTreeMap<i64, Vec<&RiskDoc>> = BTreeMap::new();
            for doc in &site_docs {
                by_partner.entry(doc.partner_id).or_default().push(doc);
            }
            let mut companies: Vec<RiskCompanyRow> = by_partner
                .into_iter()
                .map(|(partner_id, partner_docs)| {
                    company_row(data, partner_id, &partner_docs, interval, today)
                })
                .collect();
            companies.sort_by(|a, b| a.label.cmp(&b.label));

            RiskSiteRow {
                id: site_id.to_string(),
                label: data.site_name(site_id).unwrap_or(UNKNOWN).to_string(),
                total_comp_count: companies.len() as u32,
                total_doc_count: companies.iter().map(|c| c.total_doc_count).sum(),
                total_risk_count: companies.iter().map(|c| c.total_risk_count).sum(),
                total_measure_count: companies.iter().map(|c| c.total_measure_count).sum(),
                total_action_count: companies.iter().map(|c| c.total_action_count).sum(),
                total_confirm_count: companies.iter().map(|c| c.total_confirm_count).sum(),
                companies,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));

    let adhoc_docs: Vec<&RiskDoc> = docs
        .iter()
        .copied()
        .filter(|d| d.doc_type == DocType::AdHoc)
        .collect();

    RiskAllSitesResponse {
        summary: risk_kpis(&docs, interval, today),
        rows,
        chart_data: risk_chart_data(&adhoc_docs, interval),
    }
}

pub fn risk_documents(
    data: &Dataset,
    site_id: Option<i64>,
    interval: DateInterval,
) -> Vec<RiskDocument> {
    let mut list: Vec<RiskDocument> = in_scope_docs(data, site_id, interval)
        .into_iter()
        .map(|d| RiskDocument {
            id: d.id,
            site_name: data.site_name(d.site_id).unwrap_or(UNKNOWN).to_string(),
            partner_name: data.partner_name(d.partner_id).unwrap_or(UNKNOWN).to_string(),
            doc_type: d.doc_type,
            start_date: d.start_date,
            end_date: d.end_date,
            filename: d.filename.clone(),
            item_count: d.entries.len() as u32,
        })
        .collect();
    list.sort_by(|a, b| b.start_date.cmp(&a.start_date).then_with(|| a.id.cmp(&b.id)));
    list
}

pub fn risk_items(data: &Dataset, doc_id: i64) -> Option<Vec<RiskItem>> {
    data.risk_docs.iter().find(|d| d.id == doc_id).map(|d| {
        d.entries
            .iter()
            .map(|e| RiskItem {
                date: e.date,
                category: e.category.clone(),
                measure: e.measure.clone(),
            })
            .collect()
    })
}

// ---- TBM ----

pub fn tbm_summary(
    data: &Dataset,
    site_id: Option<i64>,
    interval: DateInterval,
) -> TbmSummaryResponse {
    let logs: Vec<&crate::models::TbmLog> = data
        .tbm_logs
        .iter()
        .filter(|t| interval.contains(t.work_date))
        .filter(|t| site_id.is_none_or(|site| t.site_id == site))
        .collect();

    // Attendance headcount per group for the same scope, the denominator of
    // the participation rate.
    let mut attendance: BTreeMap<i64, u32> = BTreeMap::new();
    for record in &data.attendance {
        if !interval.contains(record.work_date) {
            continue;
        }
        let key = match site_id {
            Some(site) => {
                if record.site_id != site {
                    continue;
                }
                record.partner_id
            }
            None => record.site_id,
        };
        *attendance.entry(key).or_default() += 1;
    }

    #[derive(Default)]
    struct TbmAcc {
        tbm_count: u32,
        attendees: u32,
        partners: BTreeSet<i64>,
    }
    let mut groups: BTreeMap<i64, TbmAcc> = BTreeMap::new();
    for log in &logs {
        let key = match site_id {
            Some(_) => log.partner_id,
            None => log.site_id,
        };
        let acc = groups.entry(key).or_default();
        acc.tbm_count += 1;
        acc.attendees += log.participants.len() as u32;
        acc.partners.insert(log.partner_id);
    }

    let mut summary = TbmSummary::default();
    let mut rows: Vec<TbmTableRow> = groups
        .into_iter()
        .map(|(group_id, acc)| {
            let total_attendance = attendance.get(&group_id).copied().unwrap_or(0);
            summary.written_tbm_docs += acc.tbm_count;
            summary.total_tbm_attendees += acc.attendees;

            let label = match site_id {
                Some(_) => data.partner_name(group_id),
                None => data.site_name(group_id),
            };
            TbmTableRow {
                id: group_id.to_string(),
                label: label.unwrap_or(UNKNOWN).to_string(),
                comp_count: acc.partners.len() as u32,
                tbm_count: acc.tbm_count,
                total_attendance,
                attendees: acc.attendees,
                rate: participation_rate(acc.attendees, total_attendance),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));

    let participating: BTreeSet<i64> = logs.iter().map(|t| t.partner_id).collect();
    summary.participating_companies = participating.len() as u32;
    let total_attendance: u32 = attendance.values().sum();
    summary.participation_rate = participation_rate(summary.total_tbm_attendees, total_attendance);

    TbmSummaryResponse { summary, rows }
}

pub fn tbm_logs(data: &Dataset, site_id: Option<i64>, date: NaiveDate) -> Vec<TbmLogView> {
    let mut list: Vec<TbmLogView> = data
        .tbm_logs
        .iter()
        .filter(|t| t.work_date == date)
        .filter(|t| site_id.is_none_or(|site| t.site_id == site))
        .map(|t| TbmLogView {
            id: t.id,
            work_date: t.work_date,
            site_name: data.site_name(t.site_id).unwrap_or(UNKNOWN).to_string(),
            partner_name: data.partner_name(t.partner_id).unwrap_or(UNKNOWN).to_string(),
            content: t.content.clone(),
            participant_count: t.participants.len() as u32,
        })
        .collect();
    list.sort_by(|a, b| a.partner_name.cmp(&b.partner_name).then_with(|| a.id.cmp(&b.id)));
    list
}

pub fn tbm_participants(data: &Dataset, tbm_id: i64) -> Option<Vec<String>> {
    data.tbm_logs
        .iter()
        .find(|t| t.id == tbm_id)
        .map(|t| t.participants.clone())
}

/// Set difference of attendance minus TBM-confirmed workers, fetched on
/// demand from a secondary user action rather than prefetched.
pub fn tbm_unconfirmed(
    data: &Dataset,
    site_id: i64,
    interval: DateInterval,
    partner_id: Option<i64>,
) -> TbmUnconfirmedResponse {
    let attended: Vec<&crate::models::AttendanceRecord> = data
        .attendance
        .iter()
        .filter(|r| r.site_id == site_id && interval.contains(r.work_date))
        .filter(|r| partner_id.is_none_or(|p| r.partner_id == p))
        .collect();

    let confirmed: BTreeSet<&str> = data
        .tbm_logs
        .iter()
        .filter(|t| t.site_id == site_id && interval.contains(t.work_date))
        .filter(|t| partner_id.is_none_or(|p| t.partner_id == p))
        .flat_map(|t| t.participants.iter())
        .map(String::as_str)
        .collect();

    let mut seen: BTreeSet<(&str, NaiveDate)> = BTreeSet::new();
    let mut unconfirmed = Vec::new();
    for record in &attended {
        if confirmed.contains(record.worker_name.as_str()) {
            continue;
        }
        if !seen.insert((record.worker_name.as_str(), record.work_date)) {
            continue;
        }
        unconfirmed.push(UnconfirmedWorker {
            worker_name: record.worker_name.clone(),
            role: record.role,
            partner_name: data
                .partner_name(record.partner_id)
                .unwrap_or(UNKNOWN)
                .to_string(),
            work_date: record.work_date,
        });
    }

    TbmUnconfirmedResponse {
        site_id,
        site_name: data.site_name(site_id).unwrap_or(UNKNOWN).to_string(),
        total_attendance: attended.len() as u32,
        tbm_confirmed: confirmed.len() as u32,
        unconfirmed_count: unconfirmed.len() as u32,
        unconfirmed_workers: unconfirmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskConfirmation, RiskEntry};
    use crate::period::Period;
    use crate::storage::sample_dataset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn interval(start: NaiveDate, end: NaiveDate) -> DateInterval {
        DateInterval { start, end }
    }

    fn doc(id: i64, doc_type: DocType, start: NaiveDate, end: NaiveDate) -> RiskDoc {
        RiskDoc {
            id,
            site_id: 1,
            partner_id: 10,
            doc_type,
            start_date: start,
            end_date: end,
            filename: None,
            entries: Vec::new(),
            confirmations: Vec::new(),
        }
    }

    #[test]
    fn classification_markers() {
        assert!(classify("추가위험 발굴").risk_factor);
        assert!(classify("조치 완료").action);
        assert!(classify("이행 확인").action);
        let both = classify("추가위험 조치");
        assert!(both.risk_factor && both.action);
        assert!(classify("기타 점검").is_unclassified());
    }

    #[test]
    fn unclassified_entries_surface_in_summary() {
        let mut data = sample_dataset();
        data.risk_docs.clear();
        let mut d = doc(1, DocType::AdHoc, date(2025, 12, 1), date(2025, 12, 31));
        d.entries.push(RiskEntry {
            date: date(2025, 12, 19),
            category: "기타 점검".to_string(),
            measure: None,
        });
        data.risk_docs.push(d);

        let day = interval(date(2025, 12, 19), date(2025, 12, 19));
        let response = risk_summary(&data, Some(1), day);
        assert_eq!(response.summary.unclassified, 1);
        assert_eq!(response.summary.risk_factors, 0);
        assert_eq!(response.summary.action_results, 0);
    }

    #[test]
    fn doc_overlap_boundaries() {
        let mut data = sample_dataset();
        data.risk_docs = vec![doc(
            1,
            DocType::AdHoc,
            date(2025, 12, 15),
            date(2025, 12, 25),
        )];

        let included = [
            interval(date(2025, 12, 1), date(2025, 12, 31)),
            interval(date(2025, 12, 20), date(2025, 12, 22)),
            interval(date(2025, 12, 25), date(2025, 12, 26)),
        ];
        for iv in included {
            let response = risk_summary(&data, Some(1), iv);
            assert_eq!(response.summary.active_documents, 1, "{iv:?}");
        }

        let excluded = interval(date(2025, 12, 26), date(2025, 12, 31));
        let response = risk_summary(&data, Some(1), excluded);
        assert_eq!(response.summary.active_documents, 0);
    }

    #[test]
    fn pie_buckets_sum_to_total_and_clamp() {
        let response = dashboard_summary(
            &sample_dataset(),
            None,
            DateInterval::resolve(date(2025, 12, 19), Period::Daily),
        );
        let total = response.summary.total_workers;
        let view = build_dashboard_view(response);
        assert_eq!(view.pie_data[0].value + view.pie_data[1].value, total);

        // Inconsistent upstream data: senior total above total clamps to
        // zero under-65 rather than going negative.
        let broken = DashboardResponse {
            summary: DashboardSummary {
                total_workers: 3,
                senior_total: 5,
                ..Default::default()
            },
            rows: Vec::new(),
        };
        let view = build_dashboard_view(broken);
        assert_eq!(view.pie_data[0].value, 0);
        assert_eq!(view.pie_data[1].value, 3);
    }

    #[test]
    fn checkout_rate_zero_denominator() {
        let empty = Dataset::default();
        let response = dashboard_summary(&empty, None, interval(date(2025, 1, 1), date(2025, 1, 1)));
        assert_eq!(response.summary.checkout_rate, 0);
        assert!(response.rows.is_empty());
    }

    #[test]
    fn participation_rate_is_clamped() {
        assert_eq!(participation_rate(12, 10), 100.0);
        assert_eq!(participation_rate(8, 10), 80.0);
        assert_eq!(participation_rate(5, 0), 0.0);
    }

    #[test]
    fn adhoc_only_feeds_kpi_action_counts() {
        let mut data = sample_dataset();
        data.risk_docs.clear();
        let mut initial = doc(1, DocType::Initial, date(2025, 12, 1), date(2025, 12, 31));
        initial.entries.push(RiskEntry {
            date: date(2025, 12, 19),
            category: "조치 완료".to_string(),
            measure: None,
        });
        let mut adhoc = doc(2, DocType::AdHoc, date(2025, 12, 1), date(2025, 12, 31));
        adhoc.entries.push(RiskEntry {
            date: date(2025, 12, 19),
            category: "조치 완료".to_string(),
            measure: None,
        });
        data.risk_docs.push(initial);
        data.risk_docs.push(adhoc);

        let day = interval(date(2025, 12, 19), date(2025, 12, 19));
        let response = risk_daily(&data, 1, day, date(2026, 1, 10));
        // Both entries show up in the per-row breakdown, only the ad-hoc one
        // in the KPI aggregate.
        assert_eq!(response.rows[0].total_action_count, 2);
        assert_eq!(response.summary.action_results, 1);
    }

    #[test]
    fn confirmations_require_fully_elapsed_docs() {
        let mut data = sample_dataset();
        data.risk_docs.clear();

        let mut elapsed = doc(1, DocType::AdHoc, date(2025, 12, 1), date(2025, 12, 15));
        elapsed.confirmations.push(RiskConfirmation {
            worker_name: "김철수".to_string(),
            date: date(2025, 12, 10),
        });
        elapsed.confirmations.push(RiskConfirmation {
            worker_name: "김철수".to_string(),
            date: date(2025, 12, 12),
        });
        let mut ongoing = doc(2, DocType::AdHoc, date(2025, 12, 1), date(2025, 12, 31));
        ongoing.confirmations.push(RiskConfirmation {
            worker_name: "박영희".to_string(),
            date: date(2025, 12, 10),
        });
        data.risk_docs.push(elapsed);
        data.risk_docs.push(ongoing);

        let month = interval(date(2025, 12, 1), date(2025, 12, 31));
        let today = date(2025, 12, 20);
        let response = risk_daily(&data, 1, month, today);
        // One distinct worker from the elapsed doc; the ongoing doc's
        // confirmation is intentionally excluded.
        assert_eq!(response.rows[0].total_confirm_count, 1);
    }

    #[test]
    fn all_sites_rollup_sums_children() {
        let data = sample_dataset();
        let month = interval(date(2025, 12, 1), date(2025, 12, 31));
        let response = risk_all_sites(&data, month, date(2026, 1, 10));
        for site_row in &response.rows {
            let doc_sum: u32 = site_row.companies.iter().map(|c| c.total_doc_count).sum();
            assert_eq!(site_row.total_doc_count, doc_sum);
            assert_eq!(site_row.total_comp_count, site_row.companies.len() as u32);
            for company in &site_row.companies {
                let per_type: u32 = company.doc_types.iter().map(|t| t.doc_count).sum();
                assert_eq!(company.total_doc_count, per_type);
            }
        }
    }

    #[test]
    fn sample_scenario_participation_rates() {
        let data = sample_dataset();
        let day = DateInterval::resolve(date(2025, 12, 19), Period::Daily);

        // Per-partner rates within 역삼통사현장.
        let site = data
            .sites
            .iter()
            .find(|s| s.name == "역삼통사현장")
            .expect("sample site");
        let by_partner = tbm_summary(&data, Some(site.id), day);
        let sg = by_partner
            .rows
            .iter()
            .find(|r| r.label == "에스지엔지니어링")
            .expect("sample partner");
        assert_eq!((sg.total_attendance, sg.attendees), (5, 4));
        assert_eq!(sg.rate, 80.0);
        let tong = by_partner
            .rows
            .iter()
            .find(|r| r.label == "(주)통하는사람들")
            .expect("sample partner");
        assert_eq!((tong.total_attendance, tong.attendees), (10, 8));
        assert_eq!(tong.rate, 80.0);

        // Site-level aggregate in the all-sites view.
        let all = tbm_summary(&data, None, day);
        let row = all
            .rows
            .iter()
            .find(|r| r.label == "역삼통사현장")
            .expect("site row");
        assert_eq!((row.total_attendance, row.attendees), (15, 12));
        assert_eq!(row.rate, 80.0);
    }

    #[test]
    fn unconfirmed_is_attendance_minus_participants() {
        let data = sample_dataset();
        let site = data
            .sites
            .iter()
            .find(|s| s.name == "역삼통사현장")
            .unwrap();
        let day = DateInterval::resolve(date(2025, 12, 19), Period::Daily);
        let response = tbm_unconfirmed(&data, site.id, day, None);
        assert_eq!(response.total_attendance, 15);
        assert_eq!(
            response.unconfirmed_count,
            response.unconfirmed_workers.len() as u32
        );
        assert_eq!(response.unconfirmed_count, 3);
        for worker in &response.unconfirmed_workers {
            assert!(!worker.worker_name.is_empty());
        }
    }

    #[test]
    fn single_site_scope_groups_by_partner() {
        let data = sample_dataset();
        let site = data
            .sites
            .iter()
            .find(|s| s.name == "역삼통사현장")
            .unwrap();
        let day = DateInterval::resolve(date(2025, 12, 19), Period::Daily);
        let response = dashboard_summary(&data, Some(site.id), day);
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.summary.total_workers, 15);
        let row_total: u32 = response.rows.iter().map(|r| r.total_count).sum();
        assert_eq!(row_total, 15);
    }
}
