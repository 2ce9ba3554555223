//! MLB tool flows against a stubbed statsapi.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use integration_tests::{StubUpstream, TestServer};
use serde_json::{Value, json};

fn mlb_config(base_url: &str) -> String {
    format!(
        r#"
        [upstreams.mlb]
        base_url = "{base_url}"
        "#
    )
}

#[tokio::test]
async fn empty_schedule_day_yields_zero_games() {
    let stub = StubUpstream::serve(Router::new().route(
        "/schedule",
        get(|| async { Json(json!({"dates": []})) }),
    ))
    .await;

    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getMLBScheduleET", json!({"date": "2025-12-25"}))
        .await;

    assert_eq!(result["ok"], true);
    assert_eq!(result["data"]["date_et"], "2025-12-25");
    assert_eq!(result["data"]["count"], 0);
    assert_eq!(result["data"]["games"], json!([]));
    assert!(result.get("error").is_none());
}

#[tokio::test]
async fn schedule_games_sort_by_et_start() {
    let stub = StubUpstream::serve(Router::new().route(
        "/schedule",
        get(|| async {
            Json(json!({
                "dates": [{
                    "date": "2025-08-13",
                    "games": [
                        {
                            "gamePk": 2,
                            "gameDate": "2025-08-13T23:10:00Z",
                            "officialDate": "2025-08-13",
                            "status": {"abstractGameState": "Preview", "detailedState": "Scheduled"},
                            "teams": {
                                "home": {"team": {"id": 1, "name": "Late Home"}},
                                "away": {"team": {"id": 2, "name": "Late Away"}}
                            }
                        },
                        {
                            "gamePk": 1,
                            "gameDate": "2025-08-13T17:05:00Z",
                            "officialDate": "2025-08-13",
                            "status": {"abstractGameState": "Preview", "detailedState": "Scheduled"},
                            "teams": {
                                "home": {"team": {"id": 3, "name": "Early Home"}},
                                "away": {"team": {"id": 4, "name": "Early Away"}}
                            }
                        }
                    ]
                }]
            }))
        }),
    ))
    .await;

    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getMLBScheduleET", json!({"date": "2025-08-13"}))
        .await;

    let games = result["data"]["games"].as_array().unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0]["id"], "1");
    assert_eq!(games[0]["start_et"], "2025-08-13T13:05:00-04:00");
    assert_eq!(games[1]["id"], "2");
    assert_eq!(games[1]["start_et"], "2025-08-13T19:10:00-04:00");
}

fn game_log_body() -> Value {
    json!({
        "stats": [{
            "splits": [
                {"date": "2025-08-01", "stat": {"hits": 1, "homeRuns": 0}},
                {"date": "2025-08-09", "stat": {"hits": "2", "homeRuns": 1}},
                {"date": "2025-08-11", "stat": {"hits": 0, "homeRuns": 0}},
                {"date": "2025-08-12", "stat": {"hits": 3, "homeRuns": null}},
                {"date": "2025-08-13", "stat": {"hits": 1, "homeRuns": 1}},
                // After the cutoff used below; must be discarded.
                {"date": "2025-08-14", "stat": {"hits": 4, "homeRuns": 2}}
            ]
        }]
    })
}

#[tokio::test]
async fn last_n_respects_cutoff_ordering_and_aggregates() {
    let stub = StubUpstream::serve(Router::new().route(
        "/people/{id}/stats",
        get(|| async { Json(game_log_body()) }),
    ))
    .await;

    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getMLBPlayerLastN",
            json!({
                "player_ids": [592450],
                "group": "hitting",
                "stats": ["hits", "homeRuns"],
                "count": 5,
                "cutoff_iso_et": "2025-08-13T23:59:59-04:00",
            }),
        )
        .await;

    assert_eq!(result["ok"], true);

    let player = &result["data"]["results"]["592450"];
    let games = player["games"].as_array().unwrap();

    assert!(games.len() <= 5);
    let dates: Vec<&str> = games.iter().map(|g| g["date_et"].as_str().unwrap()).collect();
    assert_eq!(dates, vec!["2025-08-13", "2025-08-12", "2025-08-11", "2025-08-09", "2025-08-01"]);

    // The string-shaped "2" was coerced upstream, so every hit sample counts.
    assert_eq!(player["aggregates"]["hits_sum"], 7);
    assert_eq!(player["aggregates"]["homeRuns_sum"], 2);

    assert_eq!(result["data"]["errors"], json!({}));
}

#[tokio::test]
async fn last_n_demotes_a_failing_player_after_retries() {
    let attempts = Arc::new(AtomicU32::new(0));
    let seen = attempts.clone();

    let stub = StubUpstream::serve(Router::new().route(
        "/people/{id}/stats",
        get(move |Path(id): Path<i64>| {
            let seen = seen.clone();
            async move {
                if id == 2 {
                    seen.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
                } else {
                    Json(game_log_body()).into_response()
                }
            }
        }),
    ))
    .await;

    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result(
            "getMLBPlayerLastN",
            json!({"player_ids": [1, 2, 3], "stats": ["hits"], "cutoff_iso_et": "2025-08-13"}),
        )
        .await;

    assert_eq!(result["ok"], true);

    let results = result["data"]["results"].as_object().unwrap();
    let errors = result["data"]["errors"].as_object().unwrap();

    let mut result_keys: Vec<_> = results.keys().cloned().collect();
    result_keys.sort();
    assert_eq!(result_keys, vec!["1", "3"]);

    assert_eq!(errors.len(), 1);
    assert!(errors["2"].as_str().unwrap().starts_with("500"), "{:?}", errors["2"]);

    // The full backoff schedule ran: four attempts for the failing id.
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn team_form_surfaces_streak_from_standings() {
    let stub = StubUpstream::serve(Router::new().route(
        "/standings",
        get(|| async {
            Json(json!({
                "records": [{
                    "teamRecords": [{
                        "team": {"id": 121, "name": "New York Mets"},
                        "wins": 68,
                        "losses": 52,
                        "winningPercentage": ".567",
                        "divisionRank": "2",
                        "streak": {"streakCode": "W4"},
                        "runDifferential": 62,
                        "records": {"splitRecords": [{"type": "lastTen", "wins": 7, "losses": 3}]}
                    }]
                }]
            }))
        }),
    ))
    .await;

    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getMLBTeamForm", json!({"team_id": 121, "season": 2025}))
        .await;

    assert_eq!(result["ok"], true);
    let form = &result["data"]["form"];
    assert_eq!(form["streak"], "W4");
    assert_eq!(form["last_ten"], "7-3");
    assert_eq!(form["wins"], 68);
}

#[tokio::test]
async fn unknown_team_in_standings_is_a_validation_error() {
    let stub = StubUpstream::serve(Router::new().route(
        "/standings",
        get(|| async { Json(json!({"records": []})) }),
    ))
    .await;

    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getMLBTeamForm", json!({"team_id": 999, "season": 2025}))
        .await;

    assert_eq!(result["ok"], false);
    assert_eq!(result["error"], "invalid `team_id`: team 999 not found in 2025 standings");
}

#[tokio::test]
async fn pitcher_matchup_derives_rates_in_thirds() {
    let app = Router::new()
        .route(
            "/people/{id}",
            get(|| async {
                Json(json!({
                    "people": [{
                        "id": 594798,
                        "fullName": "Jacob deGrom",
                        "primaryPosition": {"abbreviation": "P"}
                    }]
                }))
            }),
        )
        .route(
            "/people/{id}/stats",
            get(|| async {
                Json(json!({
                    "stats": [{
                        "splits": [
                            {
                                "date": "2025-08-13",
                                "stat": {"inningsPitched": "6.1", "earnedRuns": 2, "strikeOuts": 7, "baseOnBalls": 1, "hits": 5}
                            },
                            {
                                "date": "2025-08-07",
                                "stat": {"inningsPitched": "5.2", "earnedRuns": 3, "strikeOuts": 6, "baseOnBalls": 2, "hits": 6}
                            }
                        ]
                    }]
                }))
            }),
        );

    let stub = StubUpstream::serve(app).await;
    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getMLBPitcherMatchup", json!({"pitcher_id": 594798}))
        .await;

    assert_eq!(result["ok"], true);
    let rates = &result["data"]["rates"];
    assert_eq!(rates["innings_pitched"], 12.0);
    assert_eq!(rates["era"], 3.8);
    assert_eq!(rates["whip"], 1.2);
    assert_eq!(rates["k_per_9"], 9.8);
}

#[tokio::test]
async fn roster_preserves_upstream_order() {
    let stub = StubUpstream::serve(Router::new().route(
        "/teams/{id}/roster",
        get(|| async {
            Json(json!({
                "roster": [
                    {"person": {"id": 2, "fullName": "Second Listed"}, "jerseyNumber": "48"},
                    {"person": {"id": 1, "fullName": "First Listed"}, "jerseyNumber": "20"}
                ]
            }))
        }),
    ))
    .await;

    let server = TestServer::spawn(&mlb_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getMLBTeamRoster", json!({"team_id": 121}))
        .await;

    let roster = result["data"]["roster"].as_array().unwrap();
    assert_eq!(roster[0]["id"], 2);
    assert_eq!(roster[1]["id"], 1);
}
