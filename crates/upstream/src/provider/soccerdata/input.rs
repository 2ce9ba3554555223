//! Wire shapes of SoccerDataAPI match details.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(super) struct RawMatchDetails {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub teams: RawTeams,
    #[serde(default)]
    pub goals: Option<RawGoals>,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawTeams {
    pub home: RawTeam,
    pub away: RawTeam,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawTeam {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawGoals {
    #[serde(default)]
    pub home_ft_goals: Option<i64>,
    #[serde(default)]
    pub away_ft_goals: Option<i64>,
    #[serde(default)]
    pub home_ht_goals: Option<i64>,
    #[serde(default)]
    pub away_ht_goals: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawEvent {
    #[serde(default)]
    pub event_type: Option<String>,
    /// Minutes arrive as numbers or stoppage strings (`"45+2"`).
    #[serde(default)]
    pub event_minute: Option<Value>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub player: Option<RawPlayer>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPlayer {
    #[serde(default)]
    pub name: Option<String>,
}
