use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Progress {
    consumed_ml: u64,
    goal_ml: u64,
    percent: f64,
    label: String,
}

#[derive(Debug, Deserialize)]
struct Settings {
    daily_goal: u64,
    interval: f64,
}

#[derive(Debug, Deserialize)]
struct Reminder {
    next_label: String,
    scheduled_count: usize,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    date: String,
    progress: Progress,
    settings: Settings,
    reminder: Reminder,
}

#[derive(Debug, Deserialize)]
struct LogResponse {
    #[serde(flatten)]
    state: StateResponse,
    shortcut_url: String,
}

#[derive(Debug, Deserialize)]
struct EnableResponse {
    #[serde(flatten)]
    state: StateResponse,
    scheduled: usize,
    message: Option<String>,
}

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
    use std::sync::Once;
    use std::sync::atomic::{AtomicI32, Ordering};

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
    path.push(format!("hydration_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
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
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_hydration_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("REMINDER_MODE", "enumerate")
        .env("REMINDER_INTERVAL_UNIT", "minutes")
        .env("SHORTCUT_NAME", "LogWater")
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

async fn post<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: String,
    body: serde_json::Value,
) -> T {
    let response = client.post(url).json(&body).send().await.unwrap();
    assert!(response.status().is_success(), "status {}", response.status());
    response.json().await.unwrap()
}

#[tokio::test]
async fn http_logging_three_glasses_fills_bar() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let _: StateResponse = post(
        &client,
        format!("{}/api/settings", server.base_url),
        json!({ "daily_goal": "2000", "interval": "" }),
    )
    .await;
    let reset: StateResponse = post(&client, format!("{}/api/reset", server.base_url), json!({})).await;
    assert_eq!(reset.progress.consumed_ml, 0);

    let mut last = None;
    for _ in 0..3 {
        let logged: LogResponse = post(
            &client,
            format!("{}/api/log", server.base_url),
            json!({ "amount": 250 }),
        )
        .await;
        assert_eq!(logged.shortcut_url, "shortcuts://run-shortcut?name=LogWater&input=250");
        last = Some(logged);
    }

    let state = last.unwrap().state;
    assert_eq!(state.progress.consumed_ml, 750);
    assert_eq!(state.progress.goal_ml, 2000);
    assert_eq!(state.progress.label, "750 ml / 2000 ml");
    assert_eq!(state.progress.percent, 37.5);
    assert!(!state.date.is_empty());
}

#[tokio::test]
async fn http_rejects_non_positive_amounts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for amount in [0, -250] {
        let response = client
            .post(format!("{}/api/log", server.base_url))
            .json(&json!({ "amount": amount }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn http_invalid_settings_keep_previous_values() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let saved: StateResponse = post(
        &client,
        format!("{}/api/settings", server.base_url),
        json!({ "daily_goal": "1800", "interval": "45" }),
    )
    .await;
    assert_eq!(saved.settings.daily_goal, 1800);
    assert_eq!(saved.settings.interval, 45.0);

    let kept: StateResponse = post(
        &client,
        format!("{}/api/settings", server.base_url),
        json!({ "daily_goal": "-3", "interval": "soon" }),
    )
    .await;
    assert_eq!(kept.settings.daily_goal, 1800);
    assert_eq!(kept.settings.interval, 45.0);
}

#[tokio::test]
async fn http_enabling_hourly_reminders_arms_twelve() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let _: StateResponse = post(
        &client,
        format!("{}/api/settings", server.base_url),
        json!({ "daily_goal": "2000", "interval": "60", "start_window_enabled": false }),
    )
    .await;

    let enabled: EnableResponse = post(
        &client,
        format!("{}/api/reminders/enable", server.base_url),
        json!({ "permission": "granted" }),
    )
    .await;
    assert_eq!(enabled.scheduled, 12);
    assert_eq!(enabled.state.reminder.scheduled_count, 12);
    assert_ne!(enabled.state.reminder.next_label, "—");
    assert_eq!(enabled.message.as_deref(), Some("Today's reminders scheduled."));

    let again: EnableResponse = post(
        &client,
        format!("{}/api/reminders/enable", server.base_url),
        json!({ "permission": "denied" }),
    )
    .await;
    assert_eq!(again.state.reminder.scheduled_count, 12);
    assert_eq!(
        again.message.as_deref(),
        Some("Please allow notifications to get reminders!")
    );
}

#[tokio::test]
async fn http_serves_page_and_worker() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client.get(&server.base_url).send().await.unwrap();
    assert!(page.status().is_success());
    let html = page.text().await.unwrap();
    assert!(html.contains("id=\"progress-bar\""));
    assert!(!html.contains("{{"));

    let worker = client
        .get(format!("{}/service-worker.js", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(worker.status().is_success());

    let feed: serde_json::Value = client
        .get(format!("{}/api/notifications?after=0", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(feed["notifications"].is_array());
}
