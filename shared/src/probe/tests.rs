use super::*;
use crate::config::ApiConfig;
use crate::request::{HttpError, MockHttpClient};
use serde_json::{Value, json};

// =========================================================
// 辅助函数
// =========================================================

const BASE_URL: &str = "http://api.keeply.test";
const STATUS_URL: &str = "http://api.keeply.test/api/agent/status";
const METRICS_URL: &str = "http://api.keeply.test/api/metrics/frontend";

fn create_api(client: &MockHttpClient) -> KeeplyApi<&MockHttpClient> {
    KeeplyApi::new(ApiConfig::new(BASE_URL), client)
}

/// 运行探测并收集所有发布的状态
async fn run_probe(client: &MockHttpClient, token: Option<&str>) -> Vec<ProbeResult> {
    let api = create_api(client);
    let mut published = Vec::new();
    let last = AgentProbe::new(&api)
        .run(token, |result| published.push(result))
        .await;
    assert_eq!(published.last(), Some(&last));
    published
}

fn terminal(published: &[ProbeResult]) -> &ProbeResult {
    published.last().unwrap()
}

// =========================================================
// 初始状态
// =========================================================

#[test]
fn test_initial_state_is_idle() {
    let result = ProbeResult::default();
    assert_eq!(result.state, ProbeState::Idle);
    assert_eq!(result.checked_at, None);
    assert!(!result.state.is_terminal());
}

// =========================================================
// 会话缺失
// =========================================================

#[tokio::test]
async fn test_missing_token_errors_without_request() {
    let client = MockHttpClient::new();
    let published = run_probe(&client, None).await;

    assert_eq!(published.len(), 1);
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Error);
    assert_eq!(result.title, "Sessão não encontrada");
    assert!(result.checked_at.is_some());
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_empty_token_counts_as_missing() {
    let client = MockHttpClient::new();
    let published = run_probe(&client, Some("")).await;

    assert_eq!(terminal(&published).title, "Sessão não encontrada");
    assert_eq!(client.request_count(), 0);
}

// =========================================================
// 主请求
// =========================================================

#[tokio::test]
async fn test_loading_precedes_terminal_state() {
    let client = MockHttpClient::new();
    client.mock_json(STATUS_URL, 200, json!({ "ok": true }));

    let published = run_probe(&client, Some("token")).await;
    let states: Vec<ProbeState> = published.iter().map(|r| r.state).collect();
    assert_eq!(states, vec![ProbeState::Loading, ProbeState::Online]);
    assert!(published[0].checked_at.is_some());
}

#[tokio::test]
async fn test_request_carries_bearer_token() {
    let client = MockHttpClient::new();
    client.mock_json(STATUS_URL, 200, json!({ "ok": true }));

    run_probe(&client, Some("abc.def.ghi")).await;

    let req = client.request(0);
    assert_eq!(req.url, STATUS_URL);
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(
        req.headers.get("Authorization").map(String::as_str),
        Some("Bearer abc.def.ghi")
    );
    assert_eq!(
        req.headers.get("Accept").map(String::as_str),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_success_is_online_with_preview() {
    let client = MockHttpClient::new();
    client.mock_response(STATUS_URL, 200, r#"{"ok":true}"#);

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Online);
    assert_eq!(result.status_code, Some(200));
    assert_eq!(result.payload_preview.as_deref(), Some("{\n  \"ok\": true\n}"));
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn test_success_with_empty_body_has_no_preview() {
    let client = MockHttpClient::new();
    client.mock_response(STATUS_URL, 204, "");

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Online);
    assert_eq!(result.status_code, Some(204));
    assert_eq!(result.payload_preview, None);
}

#[tokio::test]
async fn test_large_body_preview_is_truncated() {
    let client = MockHttpClient::new();
    let agents: Vec<Value> = (0..50)
        .map(|i| json!({ "id": i, "name": format!("agent-{}", i) }))
        .collect();
    client.mock_json(STATUS_URL, 200, json!({ "agents": agents }));

    let published = run_probe(&client, Some("token")).await;
    let preview = terminal(&published).payload_preview.clone().unwrap();
    assert!(preview.ends_with("..."));
    assert_eq!(preview.chars().count(), 323);
}

#[tokio::test]
async fn test_rejected_token() {
    for status in [401, 403] {
        let client = MockHttpClient::new();
        client.mock_json(STATUS_URL, status, json!({ "message": "invalid token" }));

        let published = run_probe(&client, Some("token")).await;
        let result = terminal(&published);
        assert_eq!(result.state, ProbeState::Error);
        assert_eq!(result.title, "Token rejeitado");
        assert_eq!(result.status_code, Some(status));
        assert!(result.payload_preview.as_deref().unwrap().contains("invalid token"));
    }
}

#[tokio::test]
async fn test_unexpected_status() {
    let client = MockHttpClient::new();
    client.mock_response(STATUS_URL, 500, "Internal Server Error");

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Error);
    assert_eq!(result.title, "Resposta inesperada do backend");
    assert_eq!(result.status_code, Some(500));
    assert_eq!(
        result.payload_preview.as_deref(),
        Some("{\n  \"message\": \"Internal Server Error\"\n}")
    );
}

// =========================================================
// 连接失败
// =========================================================

#[tokio::test]
async fn test_network_failure_points_at_base_url() {
    let client = MockHttpClient::new();
    client.mock_error(STATUS_URL, HttpError::Network("Failed to fetch".to_string()));

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Error);
    assert_eq!(result.title, "Falha de conexão");
    assert!(result.message.contains(BASE_URL));
    assert_eq!(result.status_code, None);
}

#[tokio::test]
async fn test_other_failure_uses_error_message() {
    let client = MockHttpClient::new();
    client.mock_error(STATUS_URL, HttpError::Response("body stream already read".to_string()));

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.title, "Falha de conexão");
    assert_eq!(result.message, "body stream already read");
}

// =========================================================
// 404 与二次可达性检查
// =========================================================

#[tokio::test]
async fn test_not_found_with_reachable_backend_is_pending() {
    let client = MockHttpClient::new();
    client.mock_json(STATUS_URL, 404, json!({ "error": "Not Found" }));
    client.mock_json(METRICS_URL, 202, json!({ "ok": true }));

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Pending);
    assert_eq!(result.title, "Backend online, endpoint pendente");
    assert_eq!(result.status_code, Some(404));
    assert!(result.payload_preview.as_deref().unwrap().contains("Not Found"));

    // 二次检查发送合成指标事件，不带令牌
    assert_eq!(client.request_count(), 2);
    let check = client.request(1);
    assert_eq!(check.url, METRICS_URL);
    assert_eq!(check.method, HttpMethod::Post);
    assert!(!check.headers.contains_key("Authorization"));
    let body: Value = serde_json::from_str(check.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["metric"], json!("dashboard_probe"));
    assert_eq!(body["tags"]["source"], json!("web-dashboard"));
}

#[tokio::test]
async fn test_not_found_with_failing_check_is_error() {
    let client = MockHttpClient::new();
    client.mock_response(STATUS_URL, 404, "");
    client.mock_response(METRICS_URL, 500, "");

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Error);
    assert_eq!(result.title, "Endpoint do agente não encontrado");
    assert_eq!(result.status_code, Some(404));
    assert_eq!(result.payload_preview, None);
}

#[tokio::test]
async fn test_not_found_with_unreachable_check_is_error() {
    let client = MockHttpClient::new();
    client.mock_response(STATUS_URL, 404, "");
    client.mock_error(METRICS_URL, HttpError::Network("Failed to fetch".to_string()));

    let published = run_probe(&client, Some("token")).await;
    let result = terminal(&published);
    assert_eq!(result.state, ProbeState::Error);
    assert!(result.message.contains(BASE_URL));
    assert_eq!(result.status_code, Some(404));
}

// =========================================================
// 重入
// =========================================================

#[tokio::test]
async fn test_each_run_overwrites_previous_result() {
    let client = MockHttpClient::new();
    client.mock_json(STATUS_URL, 200, json!({ "ok": true }));
    let api = create_api(&client);
    let probe = AgentProbe::new(&api);

    let mut current = ProbeResult::idle();
    probe.run(Some("token"), |r| current = r).await;
    assert_eq!(current.state, ProbeState::Online);

    client.mock_json(STATUS_URL, 401, json!({}));
    probe.run(Some("token"), |r| current = r).await;
    assert_eq!(current.state, ProbeState::Error);
    assert_eq!(current.status_code, Some(401));
    assert_eq!(client.request_count(), 2);
}

#[test]
fn test_checked_at_display() {
    assert_eq!(ProbeResult::idle().checked_at_display(), "-");
    assert_ne!(ProbeResult::loading().checked_at_display(), "-");
}
