use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::{json, Value};
use survey_core::{
    MemoryStore, NewSurveyResponse, SinkError, SpreadsheetSink, SqliteStore, StorageError,
    SubmissionHandler, SurveyResponse, SurveyStore,
};
use survey_server::{build_router, AppState};
use test_case::test_case;

fn valid_payload() -> Value {
    json!({
        "trainingSchedule": "manha",
        "experienceLevel": "iniciante",
        "academyTime": "menos-1-mes",
        "receptionService": "excelente",
        "instructorSupport": "sempre",
        "trainingGuidance": "sim-sempre",
        "equipmentAvailability": "sempre",
        "overallSatisfaction": "muito-satisfeito",
    })
}

struct UnreachableStore;

#[async_trait]
impl SurveyStore for UnreachableStore {
    fn backend_tag(&self) -> &'static str {
        "unreachable"
    }

    async fn insert(&self, _: NewSurveyResponse) -> Result<SurveyResponse, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<SurveyResponse>, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

/// Reads work, writes are refused.
struct ReadOnlyStore(MemoryStore);

#[async_trait]
impl SurveyStore for ReadOnlyStore {
    fn backend_tag(&self) -> &'static str {
        "read-only"
    }

    async fn insert(&self, _: NewSurveyResponse) -> Result<SurveyResponse, StorageError> {
        Err(StorageError::Query("cannot execute INSERT in a read-only transaction".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<SurveyResponse>, StorageError> {
        self.0.list_all().await
    }
}

struct UnauthorisedSheet;

#[async_trait]
impl SpreadsheetSink for UnauthorisedSheet {
    async fn append_row(&self, _: Vec<String>) -> Result<(), SinkError> {
        Err(SinkError::Auth("invalid_grant: account not shared".to_string()))
    }
}

async fn spawn(handler: SubmissionHandler) -> SocketAddr {
    let app = build_router(AppState::new(handler));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

async fn spawn_memory() -> (SocketAddr, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let addr = spawn(SubmissionHandler::new(store.clone())).await;
    (addr, store)
}

async fn post(addr: SocketAddr, path: &str, body: &Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .json(body)
        .send()
        .await
        .expect("send request");
    let status = response.status().as_u16();
    (status, response.json().await.expect("json body"))
}

async fn get(addr: SocketAddr, path: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{addr}{path}"))
        .await
        .expect("send request");
    let status = response.status().as_u16();
    (status, response.json().await.expect("json body"))
}

#[test_case("/surveys"; "root")]
#[test_case("/api/surveys"; "api prefix")]
#[tokio::test]
async fn valid_submission_returns_the_stored_record(path: &str) {
    let (addr, store) = spawn_memory().await;

    let (status, body) = post(addr, path, &valid_payload()).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["submittedAt"].is_string());
    assert!(body["data"]["name"].is_null());
    assert_eq!(body["data"]["overallSatisfaction"], "muito-satisfeito");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn unknown_option_is_rejected_with_the_field_name() {
    let (addr, store) = spawn_memory().await;
    let mut payload = valid_payload();
    payload["overallSatisfaction"] = json!("nao-existe");

    let (status, body) = post(addr, "/surveys", &payload).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "invalid data");
    assert_eq!(body["details"], json!(["overallSatisfaction"]));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn every_missing_field_is_reported() {
    let (addr, _store) = spawn_memory().await;

    let (status, body) = post(addr, "/surveys", &json!({"name": "Ana"})).await;

    assert_eq!(status, 400);
    assert_eq!(body["details"].as_array().map(Vec::len), Some(8));
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let (addr, _store) = spawn_memory().await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/surveys"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["details"], json!([]));
}

#[tokio::test]
async fn store_outage_is_a_server_error_without_detail() {
    let addr = spawn(SubmissionHandler::new(Arc::new(UnreachableStore))).await;

    let (status, body) = post(addr, "/surveys", &valid_payload()).await;
    assert_eq!(status, 500);
    assert!(body["error"].is_string());
    assert!(!body.to_string().contains("connection refused"));

    let (status, _) = get(addr, "/surveys").await;
    assert_eq!(status, 500);
}

#[tokio::test]
async fn failed_insert_leaves_nothing_to_list() {
    let addr = spawn(SubmissionHandler::new(Arc::new(ReadOnlyStore(MemoryStore::new())))).await;

    let (status, body) = post(addr, "/surveys", &valid_payload()).await;
    assert_eq!(status, 500);
    assert!(!body.to_string().contains("read-only"));

    let (status, listed) = get(addr, "/surveys").await;
    assert_eq!(status, 200);
    assert_eq!(listed["surveys"], json!([]));
}

#[tokio::test]
async fn sheet_auth_failure_still_succeeds() {
    let store = Arc::new(MemoryStore::new());
    let handler = SubmissionHandler::new(store.clone())
        .with_mirror(Arc::new(UnauthorisedSheet), Duration::from_secs(2));
    let addr = spawn(handler).await;

    let (status, body) = post(addr, "/surveys", &valid_payload()).await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn listing_is_newest_first() {
    let (addr, _store) = spawn_memory().await;
    let mut ids = Vec::new();
    for satisfaction in ["satisfeito", "indiferente", "insatisfeito"] {
        let mut payload = valid_payload();
        payload["overallSatisfaction"] = json!(satisfaction);
        let (_, body) = post(addr, "/surveys", &payload).await;
        ids.push(body["data"]["id"].clone());
    }
    ids.reverse();

    let (status, body) = get(addr, "/api/surveys").await;

    assert_eq!(status, 200);
    let listed: Vec<_> = body["surveys"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].clone())
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn identical_submissions_are_two_records() {
    let (addr, _store) = spawn_memory().await;

    let (_, first) = post(addr, "/surveys", &valid_payload()).await;
    let (_, second) = post(addr, "/surveys", &valid_payload()).await;

    assert_ne!(first["data"]["id"], second["data"]["id"]);
    let (_, body) = get(addr, "/surveys").await;
    assert_eq!(body["surveys"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn sqlite_backed_server_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(tmp.path().join("surveys.sqlite3")).unwrap();
    let addr = spawn(SubmissionHandler::new(Arc::new(store))).await;
    let mut payload = valid_payload();
    payload["name"] = json!("Rafael");
    payload["suggestions"] = json!("Mais esteiras");

    let (_, created) = post(addr, "/surveys", &payload).await;
    let (_, listed) = get(addr, "/surveys").await;

    assert_eq!(listed["surveys"], json!([created["data"].clone()]));
    assert_eq!(listed["surveys"][0]["name"], "Rafael");
}

#[test_case("/health"; "root")]
#[test_case("/api/health"; "api prefix")]
#[tokio::test]
async fn health_reports_the_backend(path: &str) {
    let (addr, _store) = spawn_memory().await;

    let (status, body) = get(addr, path).await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok", "store": "memory"}));
}
