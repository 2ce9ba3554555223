//! SoccerDataAPI client and normalizer. Query-token auth.

mod input;

use config::SoccerDataConfig;
use reqwest::Url;
use secrecy::SecretString;
use serde_json::Value;

use self::input::RawMatchDetails;
use crate::{
    error::{Result, UpstreamError},
    et,
    http::{Auth, FetchClient, decode},
    model::{EtDateTime, MatchDetails, MatchEvent, MatchSummary, ScorePair, SoccerSide},
};

/// Client for api.soccerdataapi.com.
#[derive(Clone)]
pub struct SoccerDataClient {
    fetch: FetchClient,
    base_url: String,
    auth_token: Option<SecretString>,
}

impl SoccerDataClient {
    pub(crate) fn new(fetch: FetchClient, config: &SoccerDataConfig) -> Self {
        Self {
            fetch,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// Details for one match.
    pub async fn match_details(&self, match_id: i64) -> Result<MatchDetails> {
        let token = self
            .auth_token
            .as_ref()
            .ok_or(UpstreamError::Credential { provider: "soccerdata" })?;

        let mut url = Url::parse(&format!("{}/match/", self.base_url)).map_err(|_| UpstreamError::Transient {
            reason: "invalid upstream URL for /match/".to_string(),
        })?;
        url.query_pairs_mut().append_pair("match_id", &match_id.to_string());

        let value = self.fetch.get_json(url, Auth::Query("auth_token", token)).await?;
        let raw: RawMatchDetails = decode(value)?;

        normalize_details(raw)
    }
}

fn normalize_details(raw: RawMatchDetails) -> Result<MatchDetails> {
    let date = raw.date.as_deref().ok_or(UpstreamError::Normalize { field: "date" })?;
    let date_et;
    let et_datetime;

    match raw.time.as_deref().filter(|time| !time.is_empty()) {
        // Date plus kickoff time: zoneless, assumed UTC, rendered ET.
        Some(time) => {
            let day = et::parse_date(date, "date")?;
            let zoned = et::parse_instant(&format!("{day}T{time}:00"), "time")?;
            date_et = zoned.date();
            et_datetime = Some(EtDateTime(zoned));
        }
        None => {
            date_et = et::parse_date(date, "date")?;
            et_datetime = None;
        }
    }

    let score_full = raw.goals.as_ref().and_then(|goals| {
        (goals.home_ft_goals.is_some() || goals.away_ft_goals.is_some()).then(|| ScorePair {
            home: goals.home_ft_goals,
            away: goals.away_ft_goals,
        })
    });
    let score_half = raw.goals.as_ref().and_then(|goals| {
        (goals.home_ht_goals.is_some() || goals.away_ht_goals.is_some()).then(|| ScorePair {
            home: goals.home_ht_goals,
            away: goals.away_ht_goals,
        })
    });

    let events = raw
        .events
        .into_iter()
        .map(|event| MatchEvent {
            kind: event.event_type.unwrap_or_else(|| "unknown".to_string()),
            minute: event.event_minute.as_ref().map(render_minute),
            team: event.team,
            player: event.player.and_then(|p| p.name),
        })
        .collect();

    Ok(MatchDetails {
        summary: MatchSummary {
            id: raw.id,
            date_et,
            et_datetime,
            status: raw.status.unwrap_or_else(|| "unknown".to_string()),
            home: SoccerSide {
                id: raw.teams.home.id,
                name: raw.teams.home.name,
                tla: None,
            },
            away: SoccerSide {
                id: raw.teams.away.id,
                name: raw.teams.away.name,
                tla: None,
            },
            score_full,
            score_half,
        },
        events,
    })
}

fn render_minute(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
