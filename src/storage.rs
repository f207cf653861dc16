use crate::models::{
    AttendanceRecord, Dataset, DocType, Partner, RiskConfirmation, RiskDoc, RiskEntry, Role, Site,
    TbmLog,
};
use chrono::NaiveDate;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("SAFETY_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/dataset.json"))
}

/// Loads the ETL-produced dataset. A missing or unreadable file falls back
/// to the built-in sample so the dashboard still renders something.
pub async fn load_data(path: &Path) -> Dataset {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse dataset file: {err}");
                sample_dataset()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no dataset at {}, serving sample data", path.display());
            sample_dataset()
        }
        Err(err) => {
            error!("failed to read dataset file: {err}");
            sample_dataset()
        }
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid sample date")
}

/// Built-in sample: two sites, three partners, one work week around
/// 2025-12-19. Shapes match the ETL output exactly, so the aggregation
/// layer cannot tell sample and real data apart.
pub fn sample_dataset() -> Dataset {
    const SITE_YEOKSAM: i64 = 1;
    const SITE_PANGYO: i64 = 2;
    const SG_ENG: i64 = 1;
    const TONG: i64 = 2;
    const DAEHAN: i64 = 3;

    let sites = vec![
        Site {
            id: SITE_YEOKSAM,
            name: "역삼통사현장".to_string(),
        },
        Site {
            id: SITE_PANGYO,
            name: "판교신축현장".to_string(),
        },
    ];
    let partners = vec![
        Partner {
            id: SG_ENG,
            name: "에스지엔지니어링".to_string(),
        },
        Partner {
            id: TONG,
            name: "(주)통하는사람들".to_string(),
        },
        Partner {
            id: DAEHAN,
            name: "대한건설".to_string(),
        },
    ];

    let sg_crew = ["김철수", "이영호", "박민수", "정우성", "최강타"];
    let tong_crew = [
        "강감찬", "이순신", "홍길동", "신사임당", "유관순", "장보고", "김유신", "안중근", "윤봉길",
        "오세온",
    ];
    let daehan_crew = ["노범수", "한지민", "배수지", "문지원", "송강호", "전도윤"];

    let mut attendance = Vec::new();
    let mut push_crew = |date: NaiveDate, site_id: i64, partner_id: i64, crew: &[&str]| {
        for (index, name) in crew.iter().enumerate() {
            let is_senior = index == crew.len() - 1;
            attendance.push(AttendanceRecord {
                work_date: date,
                site_id,
                partner_id,
                worker_name: (*name).to_string(),
                role: if index == 0 {
                    Role::Manager
                } else {
                    Role::Worker
                },
                age: Some(if is_senior { 67 } else { 38 + index as u32 }),
                is_senior,
                check_in: Some("07:00".to_string()),
                // The last two of each crew have no recorded checkout.
                check_out: if index + 2 >= crew.len() {
                    None
                } else {
                    Some("17:30".to_string())
                },
                has_accident: false,
            });
        }
    };

    let friday = day(2025, 12, 19);
    let thursday = day(2025, 12, 18);
    push_crew(friday, SITE_YEOKSAM, SG_ENG, &sg_crew);
    push_crew(friday, SITE_YEOKSAM, TONG, &tong_crew);
    push_crew(friday, SITE_PANGYO, DAEHAN, &daehan_crew);
    push_crew(thursday, SITE_YEOKSAM, SG_ENG, &sg_crew);
    push_crew(thursday, SITE_PANGYO, DAEHAN, &daehan_crew);
    // One recorded accident on Thursday at 판교.
    if let Some(record) = attendance
        .iter_mut()
        .find(|r| r.work_date == thursday && r.site_id == SITE_PANGYO && r.worker_name == "한지민")
    {
        record.has_accident = true;
    }

    let risk_docs = vec![
        RiskDoc {
            id: 1,
            site_id: SITE_YEOKSAM,
            partner_id: SG_ENG,
            doc_type: DocType::AdHoc,
            start_date: day(2025, 12, 15),
            end_date: day(2025, 12, 25),
            filename: Some("역삼_에스지_수시_1215.xlsx".to_string()),
            entries: vec![
                RiskEntry {
                    date: day(2025, 12, 16),
                    category: "추가위험요인 발굴".to_string(),
                    measure: Some("개구부 덮개 고정".to_string()),
                },
                RiskEntry {
                    date: day(2025, 12, 18),
                    category: "조치이행 확인".to_string(),
                    measure: None,
                },
                RiskEntry {
                    date: day(2025, 12, 19),
                    category: "추가위험요인 발굴".to_string(),
                    measure: Some("비계 작업발판 보수".to_string()),
                },
                RiskEntry {
                    date: day(2025, 12, 19),
                    category: "조치 완료".to_string(),
                    measure: None,
                },
            ],
            confirmations: vec![
                RiskConfirmation {
                    worker_name: "이영호".to_string(),
                    date: day(2025, 12, 16),
                },
                RiskConfirmation {
                    worker_name: "박민수".to_string(),
                    date: day(2025, 12, 16),
                },
            ],
        },
        RiskDoc {
            id: 2,
            site_id: SITE_YEOKSAM,
            partner_id: SG_ENG,
            doc_type: DocType::AdHoc,
            start_date: day(2025, 12, 1),
            end_date: day(2025, 12, 10),
            filename: Some("역삼_에스지_수시_1201.xlsx".to_string()),
            entries: vec![RiskEntry {
                date: day(2025, 12, 3),
                category: "추가위험요인 발굴 및 조치".to_string(),
                measure: Some("양중기 신호수 배치".to_string()),
            }],
            confirmations: vec![
                RiskConfirmation {
                    worker_name: "김철수".to_string(),
                    date: day(2025, 12, 5),
                },
                RiskConfirmation {
                    worker_name: "이영호".to_string(),
                    date: day(2025, 12, 5),
                },
            ],
        },
        RiskDoc {
            id: 3,
            site_id: SITE_YEOKSAM,
            partner_id: TONG,
            doc_type: DocType::Initial,
            start_date: day(2025, 12, 1),
            end_date: day(2025, 12, 31),
            filename: Some("역삼_통하는_최초_1201.xlsx".to_string()),
            entries: vec![
                RiskEntry {
                    date: day(2025, 12, 2),
                    category: "추가위험요인 발굴".to_string(),
                    measure: Some("가설전선 정리".to_string()),
                },
                RiskEntry {
                    date: day(2025, 12, 19),
                    category: "추가위험요인 발굴".to_string(),
                    measure: Some("용접 불티 방지포 설치".to_string()),
                },
            ],
            confirmations: Vec::new(),
        },
        RiskDoc {
            id: 4,
            site_id: SITE_PANGYO,
            partner_id: DAEHAN,
            doc_type: DocType::Periodic,
            start_date: day(2025, 12, 1),
            end_date: day(2025, 12, 31),
            filename: Some("판교_대한_정기_1201.xlsx".to_string()),
            entries: vec![RiskEntry {
                date: day(2025, 12, 18),
                category: "조치이행 결과 등록".to_string(),
                measure: None,
            }],
            confirmations: Vec::new(),
        },
    ];

    let tbm_logs = vec![
        TbmLog {
            id: 1,
            work_date: friday,
            site_id: SITE_YEOKSAM,
            partner_id: SG_ENG,
            content: Some("고소작업 안전수칙 공유".to_string()),
            participants: sg_crew[..4].iter().map(|n| n.to_string()).collect(),
        },
        TbmLog {
            id: 2,
            work_date: friday,
            site_id: SITE_YEOKSAM,
            partner_id: TONG,
            content: Some("동절기 미끄럼 주의".to_string()),
            participants: tong_crew[..8].iter().map(|n| n.to_string()).collect(),
        },
        TbmLog {
            id: 3,
            work_date: friday,
            site_id: SITE_PANGYO,
            partner_id: DAEHAN,
            content: Some("타워크레인 인양 구역 통제".to_string()),
            participants: daehan_crew[..5].iter().map(|n| n.to_string()).collect(),
        },
        TbmLog {
            id: 4,
            work_date: thursday,
            site_id: SITE_YEOKSAM,
            partner_id: SG_ENG,
            content: Some("밀폐공간 작업 전 산소농도 측정".to_string()),
            participants: sg_crew.iter().map(|n| n.to_string()).collect(),
        },
    ];

    Dataset {
        sites,
        partners,
        attendance,
        risk_docs,
        tbm_logs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_round_trips_through_json() {
        let data = sample_dataset();
        let bytes = serde_json::to_vec(&data).unwrap();
        let parsed: Dataset = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.sites.len(), data.sites.len());
        assert_eq!(parsed.attendance.len(), data.attendance.len());
        assert_eq!(parsed.risk_docs.len(), data.risk_docs.len());
        assert_eq!(parsed.tbm_logs.len(), data.tbm_logs.len());
    }

    #[test]
    fn sample_ids_resolve() {
        let data = sample_dataset();
        for record in &data.attendance {
            assert!(data.site_name(record.site_id).is_some());
            assert!(data.partner_name(record.partner_id).is_some());
        }
        for doc in &data.risk_docs {
            assert!(doc.start_date <= doc.end_date);
        }
    }
}
