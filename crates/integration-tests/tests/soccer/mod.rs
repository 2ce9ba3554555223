//! Soccer tool flows: Football-Data stubs with header auth, SoccerDataAPI
//! stub with query-token auth.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use integration_tests::{StubUpstream, TestServer};
use serde_json::json;

fn football_config(base_url: &str) -> String {
    format!(
        r#"
        [upstreams.football_data]
        base_url = "{base_url}"
        api_key = "fd-test-key"
        "#
    )
}

fn require_auth_header(headers: &HeaderMap) -> Option<StatusCode> {
    match headers.get("X-Auth-Token") {
        Some(value) if value == "fd-test-key" => None,
        _ => Some(StatusCode::FORBIDDEN),
    }
}

#[tokio::test]
async fn competition_matches_sort_ascending_with_et_views() {
    let stub = StubUpstream::serve(Router::new().route(
        "/competitions/{id}/matches",
        get(|headers: HeaderMap| async move {
            if let Some(code) = require_auth_header(&headers) {
                return code.into_response();
            }

            Json(json!({
                "matches": [
                    {
                        "id": 2,
                        "utcDate": "2025-01-20T20:00:00Z",
                        "status": "TIMED",
                        "matchday": 22,
                        "homeTeam": {"id": 57, "name": "Arsenal FC", "tla": "ARS"},
                        "awayTeam": {"id": 58, "name": "Aston Villa FC", "tla": "AVL"}
                    },
                    {
                        "id": 1,
                        "utcDate": "2025-01-20T15:00:00Z",
                        "status": "TIMED",
                        "matchday": 22,
                        "homeTeam": {"id": 61, "name": "Chelsea FC", "tla": "CHE"},
                        "awayTeam": {"id": 64, "name": "Liverpool FC", "tla": "LIV"}
                    }
                ]
            }))
            .into_response()
        }),
    ))
    .await;

    let server = TestServer::spawn(&football_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getCompetitionMatches", json!({"competition_id": 2021}))
        .await;

    assert_eq!(result["ok"], true);

    let matches = result["data"]["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["id"], 1);
    assert_eq!(matches[0]["et_datetime"], "2025-01-20T10:00:00-05:00");
    assert_eq!(matches[0]["date_et"], "2025-01-20");
    assert_eq!(matches[1]["id"], 2);
    assert_eq!(matches[1]["utc_kickoff"], "2025-01-20T20:00:00Z");
}

#[tokio::test]
async fn missing_credential_is_a_top_level_error() {
    // No api_key in the config at all.
    let stub = StubUpstream::serve(Router::new()).await;
    let config = format!(
        r#"
        [upstreams.football_data]
        base_url = "{}"
        "#,
        stub.url
    );

    let server = TestServer::spawn(&config).await;

    let result = server.client.tool_result("getCompetitions", json!({})).await;

    assert_eq!(result["ok"], false);
    assert_eq!(result["error"], "no credential configured for football-data");
}

#[tokio::test]
async fn standings_preserve_provider_positions() {
    let stub = StubUpstream::serve(Router::new().route(
        "/competitions/{id}/standings",
        get(|| async {
            Json(json!({
                "standings": [
                    {"type": "HOME", "table": []},
                    {
                        "type": "TOTAL",
                        "table": [
                            {
                                "position": 1,
                                "team": {"id": 64, "name": "Liverpool FC", "tla": "LIV"},
                                "playedGames": 22, "won": 16, "draw": 5, "lost": 1,
                                "points": 53, "goalsFor": 54, "goalsAgainst": 21, "goalDifference": 33
                            },
                            {
                                "position": 2,
                                "team": {"id": 57, "name": "Arsenal FC", "tla": "ARS"},
                                "playedGames": 22, "won": 13, "draw": 8, "lost": 1,
                                "points": 47, "goalsFor": 45, "goalsAgainst": 20, "goalDifference": 25
                            }
                        ]
                    }
                ]
            }))
        }),
    ))
    .await;

    let server = TestServer::spawn(&football_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getCompetitionStandings", json!({"competition_id": 2021}))
        .await;

    let standings = result["data"]["standings"].as_array().unwrap();
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0]["position"], 1);
    assert_eq!(standings[0]["team"]["tla"], "LIV");
    assert_eq!(standings[1]["position"], 2);
}

#[tokio::test]
async fn top_scorers_honor_limit_and_zero_missing_counts() {
    let stub = StubUpstream::serve(Router::new().route(
        "/competitions/{id}/scorers",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            // The limit travels upstream too.
            assert_eq!(params["limit"], "2");

            Json(json!({
                "scorers": [
                    {"player": {"id": 44, "name": "Erling Haaland"}, "team": {"name": "Manchester City FC"}, "goals": 27, "assists": 5, "penalties": 7},
                    {"player": {"id": 129, "name": "Mohamed Salah"}, "team": {"name": "Liverpool FC"}, "goals": 22}
                ]
            }))
        }),
    ))
    .await;

    let server = TestServer::spawn(&football_config(&stub.url)).await;

    let result = server
        .client
        .tool_result("getTopScorers", json!({"competition_id": 2021, "limit": 2}))
        .await;

    let scorers = result["data"]["scorers"].as_array().unwrap();
    assert_eq!(scorers.len(), 2);
    assert_eq!(scorers[0]["player"], "Erling Haaland");
    assert_eq!(scorers[1]["assists"], 0);
    assert_eq!(scorers[1]["penalties"], 0);
}

#[tokio::test]
async fn match_details_require_the_query_token() {
    let stub = StubUpstream::serve(Router::new().route(
        "/match/",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            if params["auth_token"] != "sd-test-token" {
                return StatusCode::FORBIDDEN.into_response();
            }

            assert_eq!(params["match_id"], "592134");

            Json(json!({
                "id": 592134,
                "date": "17/08/2024",
                "time": "14:30",
                "status": "finished",
                "teams": {
                    "home": {"id": 4137, "name": "Brighton & Hove Albion"},
                    "away": {"id": 2909, "name": "Everton"}
                },
                "goals": {"home_ft_goals": 3, "away_ft_goals": 0},
                "events": [
                    {"event_type": "goal", "event_minute": 25, "team": "home", "player": {"name": "Kaoru Mitoma"}}
                ]
            }))
            .into_response()
        }),
    ))
    .await;

    let config = format!(
        r#"
        [upstreams.soccerdata]
        base_url = "{}"
        auth_token = "sd-test-token"
        "#,
        stub.url
    );

    let server = TestServer::spawn(&config).await;

    let result = server
        .client
        .tool_result("getMatchDetails", json!({"match_id": 592134}))
        .await;

    assert_eq!(result["ok"], true);
    let m = &result["data"]["match"];
    assert_eq!(m["date_et"], "2024-08-17");
    assert_eq!(m["et_datetime"], "2024-08-17T10:30:00-04:00");
    assert_eq!(m["score_full"]["home"], 3);
    assert_eq!(m["events"][0]["player"], "Kaoru Mitoma");
}
