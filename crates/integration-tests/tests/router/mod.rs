//! JSON-RPC envelope behavior: codes, id echo, deadline handling.

use axum::{Json, Router, routing::get};
use integration_tests::{StubUpstream, TestServer};
use serde_json::{Value, json};

#[tokio::test]
async fn malformed_json_returns_parse_error() {
    let server = TestServer::spawn("").await;

    let (status, body) = server.client.rpc_raw("{definitely not json".to_string()).await;

    assert_eq!(status, 200);
    assert_eq!(body["error"]["code"], -32700);
    assert!(body["id"].is_null());
}

#[tokio::test]
async fn non_tools_call_methods_are_method_not_found() {
    let server = TestServer::spawn("").await;

    let (status, body) = server
        .client
        .rpc(json!({"jsonrpc": "2.0", "id": 42, "method": "initialize", "params": {}}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["error"]["message"], "Method not found");
    assert_eq!(body["id"], 42);
}

#[tokio::test]
async fn unknown_tools_name_the_offender() {
    let server = TestServer::spawn("").await;

    let (status, body) = server
        .client
        .rpc(json!({
            "jsonrpc": "2.0",
            "id": "req-9",
            "method": "tools/call",
            "params": {"name": "doesNotExist", "arguments": {}},
        }))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["error"]["message"], "Unknown tool: doesNotExist");
    assert_eq!(body["id"], "req-9");
}

#[tokio::test]
async fn ids_echo_byte_for_byte() {
    let server = TestServer::spawn("").await;

    for id in [json!(null), json!(0), json!("x"), json!([1, "two"])] {
        let (_, body) = server
            .client
            .rpc(json!({"jsonrpc": "2.0", "id": id, "method": "nope"}))
            .await;

        assert_eq!(body["id"], id);
    }
}

#[tokio::test]
async fn deadline_expiry_is_a_top_level_timeout() {
    // A schedule endpoint that never answers in time.
    let slow = StubUpstream::serve(Router::new().route(
        "/schedule",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            Json(json!({"dates": []}))
        }),
    ))
    .await;

    let config = format!(
        r#"
        [limits]
        request_deadline = "1s"
        request_timeout = "4s"

        [upstreams.mlb]
        base_url = "{}"
        "#,
        slow.url
    );

    let server = TestServer::spawn(&config).await;

    let result = server
        .client
        .tool_result("getMLBScheduleET", json!({"date": "2025-08-13"}))
        .await;

    assert_eq!(result["ok"], false);
    assert_eq!(result["error"], "request deadline exceeded after 1s");
    assert!(result.get("data").is_none());
}

#[tokio::test]
async fn tool_results_are_wrapped_verbatim() {
    let server = TestServer::spawn("").await;

    let body = server.client.call_tool("getCustomChronulusHealth", json!({})).await;

    assert_eq!(body["jsonrpc"], "2.0");

    let result = &body["result"];
    assert_eq!(result["ok"], true);
    assert_eq!(result["data"]["service"], "custom-chronulus");
    assert!(result["meta"]["timestamp"].as_str().unwrap().ends_with('Z'));
    assert_eq!(result.get("error"), None::<&Value>.as_deref());
}
