use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::Client;
use safety_dash::{ApiClient, FetchError, Period};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "safety_dash_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path.to_string_lossy().to_string()
}

fn friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 19).unwrap()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/sites")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    // Point at a path with no file so the server serves its built-in sample.
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_safety_dash"))
        .env("PORT", port.to_string())
        .env("SAFETY_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_sites_and_partners_resolve() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let sites = api.sites().await.unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].name, "역삼통사현장");

    let site = api.site(sites[0].id).await.unwrap();
    assert_eq!(site.id, sites[0].id);

    let partners = api.partners().await.unwrap();
    assert_eq!(partners.len(), 3);
}

#[tokio::test]
async fn http_unknown_site_is_an_api_error() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let err = api.site(9999).await.unwrap_err();
    match err {
        FetchError::Api { status, .. } => assert_eq!(status, 404),
        FetchError::Network(err) => panic!("expected API error, got network error: {err}"),
    }
    assert!(!api.site(9999).await.unwrap_err().is_retryable());
}

#[tokio::test]
async fn http_dashboard_summary_covers_all_sites() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let response = api
        .dashboard_summary(None, friday(), Period::Daily)
        .await
        .unwrap();

    // Sample Friday: three crews of 5 + 10 + 6, one manager and one
    // senior in each.
    assert_eq!(response.summary.total_workers, 21);
    assert_eq!(response.summary.manager_count, 3);
    assert_eq!(response.summary.field_worker_count, 18);
    assert_eq!(response.summary.senior_total, 3);
    assert_eq!(response.rows.len(), 2);
    assert_eq!(
        response.summary.total_workers,
        response.rows.iter().map(|r| r.total_count).sum::<u32>()
    );
}

#[tokio::test]
async fn http_dashboard_summary_scoped_to_site_groups_by_partner() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let response = api
        .dashboard_summary(Some(1), friday(), Period::Daily)
        .await
        .unwrap();

    assert_eq!(response.summary.total_workers, 15);
    assert_eq!(response.rows.len(), 2);
    assert!(response.rows.iter().any(|r| r.label == "에스지엔지니어링"));
}

#[tokio::test]
async fn http_tbm_summary_rates_match_sample() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let response = api
        .tbm_summary(Some(1), friday(), Period::Daily)
        .await
        .unwrap();

    // 12 attendees against 15 attendance records on the sample Friday.
    assert_eq!(response.summary.total_tbm_attendees, 12);
    assert_eq!(response.summary.participation_rate, 80.0);

    let sg = response
        .rows
        .iter()
        .find(|r| r.label == "에스지엔지니어링")
        .expect("sg row present");
    assert_eq!(sg.attendees, 4);
    assert_eq!(sg.total_attendance, 5);
    assert_eq!(sg.rate, 80.0);
}

#[tokio::test]
async fn http_tbm_unconfirmed_lists_the_absent_workers() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let response = api
        .tbm_unconfirmed(1, friday(), Period::Daily, None)
        .await
        .unwrap();

    assert_eq!(response.total_attendance, 15);
    assert_eq!(response.tbm_confirmed, 12);
    assert_eq!(response.unconfirmed_count, 3);
    let names: Vec<&str> = response
        .unconfirmed_workers
        .iter()
        .map(|w| w.worker_name.as_str())
        .collect();
    assert!(names.contains(&"최강타"));
    assert!(names.contains(&"오세온"));
}

#[tokio::test]
async fn http_risk_all_sites_rolls_up_per_site() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let response = api.risk_all_sites(friday(), Period::Weekly).await.unwrap();

    assert_eq!(response.rows.len(), 2);
    let yeoksam = response
        .rows
        .iter()
        .find(|r| r.label == "역삼통사현장")
        .expect("site row present");
    // Docs 1 and 3 overlap the week of the 19th; doc 2 ended on the 10th.
    assert_eq!(yeoksam.total_doc_count, 2);
    assert!(yeoksam.companies.iter().all(|c| !c.doc_types.is_empty()));
}

#[tokio::test]
async fn http_risk_items_returns_document_entries() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let api = ApiClient::new(&server.base_url);

    let items = api.risk_items(1).await.unwrap();
    assert_eq!(items.len(), 4);

    let err = api.risk_items(9999).await.unwrap_err();
    assert!(matches!(err, FetchError::Api { status: 404, .. }));
}
