//! Wire shapes of the MLB Stats API. Confined to the MLB normalizer.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(super) struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ScheduleDate {
    #[serde(default)]
    pub games: Vec<RawGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawGame {
    pub game_pk: i64,
    #[serde(default)]
    pub game_date: Option<String>,
    #[serde(default)]
    pub official_date: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
    pub teams: RawSides,
    #[serde(default)]
    pub venue: Option<Named>,
    #[serde(default)]
    pub double_header: Option<String>,
    #[serde(default)]
    pub game_number: Option<i64>,
    #[serde(default)]
    pub start_time_tbd: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawStatus {
    #[serde(default)]
    pub abstract_game_state: Option<String>,
    #[serde(default)]
    pub detailed_state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSides {
    pub home: RawSide,
    pub away: RawSide,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSide {
    pub team: IdNamed,
    #[serde(default)]
    pub score: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct IdNamed {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<RawTeam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawTeam {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub league: Option<Named>,
    #[serde(default)]
    pub division: Option<Named>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RosterResponse {
    #[serde(default)]
    pub roster: Vec<RawRosterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawRosterEntry {
    pub person: RawPerson,
    #[serde(default)]
    pub jersey_number: Option<String>,
    #[serde(default)]
    pub position: Option<RawPosition>,
    #[serde(default)]
    pub status: Option<Described>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawPerson {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub primary_position: Option<RawPosition>,
    #[serde(default)]
    pub current_team: Option<IdNamed>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPosition {
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Described {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PeopleResponse {
    #[serde(default)]
    pub people: Vec<RawPerson>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatsResponse {
    #[serde(default)]
    pub stats: Vec<RawStatGroup>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawStatGroup {
    #[serde(default)]
    pub splits: Vec<RawSplit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawSplit {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub is_home: Option<bool>,
    #[serde(default)]
    pub opponent: Option<Named>,
    #[serde(default)]
    pub game: Option<RawSplitGame>,
    #[serde(default)]
    pub stat: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawSplitGame {
    #[serde(default)]
    pub game_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StandingsResponse {
    #[serde(default)]
    pub records: Vec<RawStandingsRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawStandingsRecord {
    #[serde(default)]
    pub team_records: Vec<RawTeamRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawTeamRecord {
    pub team: IdNamed,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
    #[serde(default)]
    pub winning_percentage: Option<String>,
    #[serde(default)]
    pub games_back: Option<String>,
    #[serde(default)]
    pub division_rank: Option<String>,
    #[serde(default)]
    pub streak: Option<RawStreak>,
    #[serde(default)]
    pub run_differential: Option<i64>,
    #[serde(default)]
    pub records: Option<RawSplitRecords>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawStreak {
    #[serde(default)]
    pub streak_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawSplitRecords {
    #[serde(default)]
    pub split_records: Vec<RawSplitRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawSplitRecord {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub wins: Option<i64>,
    #[serde(default)]
    pub losses: Option<i64>,
}
