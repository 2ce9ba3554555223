//! Odds tool flows against a stubbed Odds API.

use std::collections::HashMap;

use axum::{Json, Router, extract::Query, routing::get};
use integration_tests::{StubUpstream, TestServer};
use serde_json::json;

fn odds_config(base_url: &str) -> String {
    format!(
        r#"
        [upstreams.odds]
        base_url = "{base_url}"
        api_key = "odds-test-key"
        "#
    )
}

#[tokio::test]
async fn sport_odds_pass_through_with_utc_commence_times() {
    let stub = StubUpstream::serve(Router::new().route(
        "/sports/{sport}/odds",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            // The key rides the query string, never a header.
            assert_eq!(params["apiKey"], "odds-test-key");
            assert_eq!(params["markets"], "h2h,spreads,totals");

            Json(json!([
                {
                    "id": "0e5a8a0e6b9df11bf6acd8c2b23d13b0",
                    "sport_key": "baseball_mlb",
                    "commence_time": "2025-08-13T23:05:00Z",
                    "home_team": "New York Mets",
                    "away_team": "Atlanta Braves",
                    "bookmakers": [{
                        "key": "draftkings",
                        "title": "DraftKings",
                        "markets": [
                            {"key": "h2h", "outcomes": [
                                {"name": "New York Mets", "price": 1.72},
                                {"name": "Atlanta Braves", "price": 2.18}
                            ]},
                            {"key": "totals", "outcomes": [
                                {"name": "Over", "price": 1.91, "point": 8.5},
                                {"name": "Under", "price": 1.91, "point": 8.5}
                            ]}
                        ]
                    }]
                }
            ]))
        }),
    ))
    .await;

    let server = TestServer::spawn(&odds_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getOdds",
            json!({"sport": "baseball_mlb", "markets": "h2h,spreads,totals"}),
        )
        .await;

    assert_eq!(result["ok"], true);

    let events = result["data"]["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["home_team"], "New York Mets");
    assert_eq!(event["away_team"], "Atlanta Braves");
    assert!(event["commence_time"].as_str().unwrap().ends_with('Z'));

    let requested = ["h2h", "spreads", "totals"];
    for bookmaker in event["bookmakers"].as_array().unwrap() {
        for market in bookmaker["markets"].as_array().unwrap() {
            assert!(requested.contains(&market["key"].as_str().unwrap()));
        }
    }
}

#[tokio::test]
async fn event_odds_pair_props_and_drop_orphans() {
    let stub = StubUpstream::serve(Router::new().route(
        "/sports/{sport}/events/{event_id}/odds",
        get(|| async {
            Json(json!({
                "id": "evt-1",
                "sport_key": "baseball_mlb",
                "commence_time": "2025-08-13T23:05:00Z",
                "home_team": "New York Mets",
                "away_team": "Atlanta Braves",
                "bookmakers": [{
                    "key": "draftkings",
                    "title": "DraftKings",
                    "markets": [{
                        "key": "batter_hits",
                        "outcomes": [
                            {"name": "Over", "price": 1.87, "point": 1.5, "description": "Juan Soto"},
                            {"name": "Under", "price": 1.87, "point": 1.5, "description": "Juan Soto"},
                            {"name": "Over", "price": 2.10, "point": 0.5, "description": "Pete Alonso"}
                        ]
                    }]
                }]
            }))
        }),
    ))
    .await;

    let server = TestServer::spawn(&odds_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getEventOdds",
            json!({"sport": "baseball_mlb", "event_id": "evt-1", "markets": "batter_hits"}),
        )
        .await;

    assert_eq!(result["ok"], true);

    let lines = result["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["player"], "Juan Soto");
    assert_eq!(lines[0]["over_point"], 1.5);
    assert_eq!(lines[0]["under_price"], 1.87);
    assert_eq!(lines[0]["bookmaker"], "draftkings");
}

#[tokio::test]
async fn terminal_upstream_statuses_do_not_retry() {
    let stub = StubUpstream::serve(Router::new().route(
        "/sports/{sport}/odds",
        get(|| async { (axum::http::StatusCode::UNAUTHORIZED, r#"{"message":"bad key"}"#) }),
    ))
    .await;

    let server = TestServer::spawn(&odds_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getOdds", json!({"sport": "baseball_mlb"}))
        .await;

    assert_eq!(result["ok"], false);
    let message = result["error"].as_str().unwrap();
    assert!(message.starts_with("401"), "{message}");
    // Error bodies are bounded and single-line; the token never appears.
    assert!(!message.contains("odds-test-key"));
}
