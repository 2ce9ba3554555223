//! Wire shapes of The Odds API v4.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct RawEvent {
    pub id: String,
    #[serde(default)]
    pub sport_key: Option<String>,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<RawBookmaker>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawBookmaker {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawOutcome {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub point: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}
