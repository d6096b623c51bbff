//! Integration tests for the OoX server

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use oox_domain::{CategoryCode, FinalOrder, OrderElement};
use oox_narrator::{Narrator, NarratorConfig};
use oox_server::{
    config::{JobsConfig, LlmConfig, ProviderKind, ServerConfig},
    dto::{AcceptedResponse, CalculateResponse, OrderElementDto},
    handlers::{create_router, AppState},
    jobs::{JobRecord, JobStatus},
    provider::ConfiguredProvider,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt; // for oneshot

/// Helper to create an app backed by the mock provider
fn create_test_app(mock_response: &str) -> Router {
    let llm = LlmConfig {
        provider: ProviderKind::Mock,
        mock_response: mock_response.to_string(),
        ..Default::default()
    };
    let provider = ConfiguredProvider::from_config(&llm).unwrap();
    let narrator = Narrator::new(provider, NarratorConfig::default());
    create_router(AppState::new(narrator, &JobsConfig::default(), "mock"))
}

fn seed_matches() -> Value {
    let pairs = [
        ("Ni", "Ti"),
        ("Ni", "Ne"),
        ("Ti", "Fe"),
        ("Ti", "Fi"),
        ("Fe", "Fi"),
        ("Fi", "Te"),
        ("Te", "Fe"),
        ("Fe", "Se"),
        ("Ne", "Se"),
        ("Se", "Si"),
        ("Ti", "Si"),
        ("Ni", "Si"),
    ];
    let matches: Vec<Value> = pairs
        .iter()
        .enumerate()
        .map(|(i, (w, l))| json!({"winner": w, "loser": l, "id": format!("q{}", i)}))
        .collect();
    json!({ "matches": matches })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn poll_until_terminal(app: &Router, job_id: &str) -> JobRecord {
    for _ in 0..100 {
        let (status, body) = send(app, get(&format!("/api/describe/status/{}", job_id))).await;
        assert_eq!(status, StatusCode::OK);
        let record: JobRecord = serde_json::from_slice(&body).unwrap();
        if record.status.is_terminal() {
            return record;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never finished", job_id);
}

#[tokio::test]
async fn test_calculate_seed_scenario() {
    let app = create_test_app("unused");

    let (status, body) = send(&app, post("/api/calculate", &seed_matches())).await;
    assert_eq!(status, StatusCode::OK);

    let response: CalculateResponse = serde_json::from_slice(&body).unwrap();
    let order = &response.order;
    assert_eq!(order.len(), 6);
    assert_eq!(order[0], OrderElementDto::Single("Ni".to_string()));
    assert_eq!(order[1], OrderElementDto::Single("Ne".to_string()));
    assert_eq!(order[2], OrderElementDto::Single("Ti".to_string()));
    match &order[3] {
        OrderElementDto::Block(codes) => {
            let mut codes = codes.clone();
            codes.sort();
            assert_eq!(codes, vec!["Fe", "Fi", "Te"]);
        }
        other => panic!("expected a block, got {:?}", other),
    }
    assert_eq!(order[4], OrderElementDto::Single("Se".to_string()));
    assert_eq!(order[5], OrderElementDto::Single("Si".to_string()));
    assert_eq!(response.health.len(), 8);
}

#[tokio::test]
async fn test_duplicate_matches_do_not_change_order() {
    let app = create_test_app("unused");
    let once = json!({"matches": [{"winner": "A", "loser": "B"}]});
    let twice = json!({"matches": [
        {"winner": "A", "loser": "B"},
        {"winner": "A", "loser": "B"}
    ]});

    let (_, first) = send(&app, post("/api/calculate", &once)).await;
    let (_, second) = send(&app, post("/api/calculate", &twice)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resolve_then_describe_flow() {
    let app = create_test_app("# Title\nThe Seer\n\n# Description\nYou see far ahead.");

    // 1. Rank
    let (_, body) = send(&app, post("/api/calculate", &seed_matches())).await;
    let response: CalculateResponse = serde_json::from_slice(&body).unwrap();

    // 2. Resolve the block client-side, alphabetically
    let elements: Vec<OrderElement> = response
        .order
        .into_iter()
        .map(|e| e.into_element().unwrap())
        .collect();
    let ranking = FinalOrder::new(elements)
        .resolve_with(|block| {
            let mut ranked = block.to_vec();
            ranked.sort();
            Ok::<_, oox_domain::ResolutionError>(ranked)
        })
        .unwrap();
    let names: Vec<&str> = ranking.iter().map(CategoryCode::as_str).collect();
    assert_eq!(names, vec!["Ni", "Ne", "Ti", "Fe", "Fi", "Te", "Se", "Si"]);

    // 3. Describe
    let body = json!({
        "finalOrder": names,
        "healthStatus": response.health,
        "tierMap": {"Ni": "Dominant", "Ne": "Dominant", "Ti": "High", "Si": "Low"}
    });
    let (status, body) = send(&app, post("/api/describe", &body)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let accepted: AcceptedResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(accepted.message, "Accepted");

    // 4. Poll
    let record = poll_until_terminal(&app, &accepted.job_id).await;
    assert_eq!(record.status, JobStatus::Completed);
    let narrative = record.data.unwrap();
    assert_eq!(narrative.title, "The Seer");
    assert_eq!(narrative.description, "You see far ahead.");
}

#[tokio::test]
async fn test_describe_with_unstructured_reply_uses_fallback() {
    let app = create_test_app("Just a headline\nAnd a body.");
    let body = json!({"finalOrder": ["Ni"], "healthStatus": {}, "tierMap": {}});

    let (_, body) = send(&app, post("/api/describe", &body)).await;
    let accepted: AcceptedResponse = serde_json::from_slice(&body).unwrap();

    let record = poll_until_terminal(&app, &accepted.job_id).await;
    let narrative = record.data.unwrap();
    assert_eq!(narrative.title, "Just a headline");
    assert_eq!(narrative.description, "And a body.");
}

#[tokio::test]
async fn test_describe_missing_fields_rejected() {
    let app = create_test_app("unused");
    let (status, _) = send(&app, post("/api/describe", &json!({"finalOrder": ["Ni"]}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_job_not_found() {
    let app = create_test_app("unused");
    let (status, body) = send(
        &app,
        get("/api/describe/status/01890a5d-ac96-774b-bcce-b302099a8057"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "not_found");
}

#[test]
fn test_server_config_from_toml() {
    let toml = r#"
        bind_address = "0.0.0.0"
        bind_port = 9000

        [llm]
        provider = "mock"

        [jobs]
        result_ttl_secs = 120
    "#;

    let config = ServerConfig::from_toml(toml).unwrap();
    assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    assert_eq!(config.llm.provider, ProviderKind::Mock);
    assert_eq!(config.jobs.timeout_secs, 600); // Default
    assert_eq!(config.jobs.result_ttl_secs, 120);
}
