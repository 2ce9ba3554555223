//! Expert-consensus flows against a stubbed chat-completions endpoint.

use axum::{Json, Router, routing::post};
use integration_tests::{StubUpstream, TestServer};
use serde_json::{Value, json};

fn experts_config(base_url: &str) -> String {
    format!(
        r#"
        [experts]
        base_url = "{base_url}"
        api_key = "llm-test-key"
        model = "test/model"
        "#
    )
}

fn chat_reply(content: &str) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

/// Replies with a persona-dependent probability so the panel is
/// deterministic regardless of request ordering.
fn persona_router() -> Router {
    Router::new().route(
        "/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();

            let content = if prompt.contains("statistical expert") {
                "Home rates hold up.\nPROBABILITY: 0.58"
            } else if prompt.contains("situational expert") {
                "Bullpen rest favors the hosts.\nPROBABILITY: 0.55"
            } else {
                "Public is on the right side for once.\nPROBABILITY: 0.57"
            };

            Json(chat_reply(content))
        }),
    )
}

#[tokio::test]
async fn three_experts_against_a_soft_market_bet_home() {
    let stub = StubUpstream::serve(persona_router()).await;
    let server = TestServer::spawn(&experts_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getCustomChronulusAnalysis",
            json!({
                "game_data": {"home_team": "Mets", "away_team": "Braves"},
                "expert_count": 3,
                "market_prob": 0.408,
            }),
        )
        .await;

    assert_eq!(result["ok"], true);

    let consensus = &result["data"]["consensus"];
    let mean = consensus["mean"].as_f64().unwrap();
    let edge = consensus["edge"].as_f64().unwrap();

    assert!((mean - 0.5667).abs() < 1e-3, "mean {mean}");
    assert!((edge - 0.1587).abs() < 1e-3, "edge {edge}");
    assert_eq!(consensus["recommendation"], "BET HOME");
    assert!(consensus["alpha"].as_f64().unwrap() > 0.0);
    assert!(consensus["beta"].as_f64().unwrap() > 0.0);

    let experts = result["data"]["experts"].as_array().unwrap();
    assert_eq!(experts.len(), 3);
    assert_eq!(experts[0]["persona"], "statistical");
    assert_eq!(experts[0]["probability"], 0.58);
    assert_eq!(experts[0]["reasoning"], "Home rates hold up.");
}

#[tokio::test]
async fn market_prob_falls_back_to_game_data() {
    let stub = StubUpstream::serve(persona_router()).await;
    let server = TestServer::spawn(&experts_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getCustomChronulusAnalysis",
            json!({
                "game_data": {"home_team": "Mets", "market_implied_prob": 0.57},
                "expert_count": 2,
            }),
        )
        .await;

    let consensus = &result["data"]["consensus"];
    // Mean 0.565 against 0.57: well inside the pass band.
    assert_eq!(consensus["recommendation"], "PASS");
}

#[tokio::test]
async fn panel_without_market_input_is_info_only() {
    let stub = StubUpstream::serve(persona_router()).await;
    let server = TestServer::spawn(&experts_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getCustomChronulusAnalysis",
            json!({"game_data": {"home_team": "Mets"}, "expert_count": 1}),
        )
        .await;

    let consensus = &result["data"]["consensus"];
    assert_eq!(consensus["recommendation"], "INFO ONLY");
    assert!(consensus.get("edge").is_none());
    // Single expert runs on the fixed prior variance.
    assert_eq!(consensus["variance"], 0.01);
}

#[tokio::test]
async fn unparseable_experts_are_skipped_and_noted() {
    let stub = StubUpstream::serve(Router::new().route(
        "/chat/completions",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();

            // The situational expert never names a probability.
            let content = if prompt.contains("situational expert") {
                "Too many unknowns to quantify."
            } else {
                "Clear home lean.\nPROBABILITY: 0.60"
            };

            Json(chat_reply(content))
        }),
    ))
    .await;

    let server = TestServer::spawn(&experts_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getCustomChronulusAnalysis",
            json!({"game_data": {"home_team": "Mets"}, "expert_count": 2}),
        )
        .await;

    assert_eq!(result["ok"], true);
    assert_eq!(result["data"]["expert_count_requested"], 2);
    assert_eq!(result["data"]["expert_count_effective"], 1);
    assert_eq!(
        result["data"]["errors"]["expert_2"],
        "no probability found in reply"
    );
    assert_eq!(
        result["meta"]["note"],
        "Only 1 of 2 experts responded."
    );
}

#[tokio::test]
async fn all_experts_failing_is_a_consensus_error() {
    let stub = StubUpstream::serve(Router::new().route(
        "/chat/completions",
        post(|| async { Json(chat_reply("No numbers here.")) }),
    ))
    .await;

    let server = TestServer::spawn(&experts_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getCustomChronulusAnalysis",
            json!({"game_data": {"home_team": "Mets"}, "expert_count": 2}),
        )
        .await;

    assert_eq!(result["ok"], false);
    assert_eq!(result["error"], "expert consensus unavailable: all 2 expert calls failed");
}

#[tokio::test]
async fn expert_count_is_bounded() {
    let server = TestServer::spawn("").await;

    let result = server
        .client
        .tool_result(
            "getCustomChronulusAnalysis",
            json!({"game_data": {}, "expert_count": 6}),
        )
        .await;

    assert_eq!(result["ok"], false);
    assert_eq!(result["error"], "invalid `expert_count`: must be between 1 and 5");
}

#[tokio::test]
async fn self_test_runs_the_sample_matchup() {
    let stub = StubUpstream::serve(persona_router()).await;
    let server = TestServer::spawn(&experts_config(&stub.url)).await;

    let result = server.client.tool_result("testCustomChronulus", json!({})).await;

    assert_eq!(result["ok"], true);
    assert_eq!(result["data"]["expert_count_requested"], 2);
    assert_eq!(result["data"]["depth"], "brief");
    // The built-in sample carries a market-implied probability.
    assert!(result["data"]["consensus"].get("edge").is_some());
    assert!(
        result["meta"]["note"]
            .as_str()
            .unwrap()
            .contains("built-in sample data")
    );
}

#[tokio::test]
async fn health_reports_configuration() {
    let server = TestServer::spawn("[experts]\napi_key = \"k\"\nmodel = \"test/model\"").await;

    let result = server.client.tool_result("getCustomChronulusHealth", json!({})).await;

    assert_eq!(result["ok"], true);
    assert_eq!(result["data"]["service"], "custom-chronulus");
    assert_eq!(result["data"]["model"], "test/model");
    assert_eq!(result["data"]["personas"], 5);
    assert_eq!(result["data"]["endpoint_configured"], true);
}
