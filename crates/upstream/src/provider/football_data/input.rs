//! Wire shapes of the Football-Data.org v4 API.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CompetitionsResponse {
    #[serde(default)]
    pub competitions: Vec<RawCompetition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawCompetition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub area: Option<Named>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct MatchesResponse {
    #[serde(default)]
    pub matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawMatch {
    pub id: i64,
    pub utc_date: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub matchday: Option<i64>,
    #[serde(default)]
    pub stage: Option<String>,
    pub home_team: RawTeamSide,
    pub away_team: RawTeamSide,
    #[serde(default)]
    pub score: Option<RawScore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawTeamSide {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub tla: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawScore {
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub full_time: Option<RawScorePair>,
    #[serde(default)]
    pub half_time: Option<RawScorePair>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawScorePair {
    #[serde(default)]
    pub home: Option<i64>,
    #[serde(default)]
    pub away: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StandingsResponse {
    #[serde(default)]
    pub standings: Vec<RawStandingTable>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawStandingTable {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub table: Vec<RawTableRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawTableRow {
    pub position: i64,
    pub team: RawTeamSide,
    #[serde(default)]
    pub played_games: i64,
    #[serde(default)]
    pub won: i64,
    #[serde(default)]
    pub draw: i64,
    #[serde(default)]
    pub lost: i64,
    #[serde(default)]
    pub points: i64,
    #[serde(default)]
    pub goals_for: i64,
    #[serde(default)]
    pub goals_against: i64,
    #[serde(default)]
    pub goal_difference: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<RawDetailedTeam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawDetailedTeam {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub tla: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ScorersResponse {
    #[serde(default)]
    pub scorers: Vec<RawScorer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawScorer {
    pub player: RawScorerPlayer,
    #[serde(default)]
    pub team: Option<Named>,
    #[serde(default)]
    pub goals: Option<i64>,
    #[serde(default)]
    pub assists: Option<i64>,
    #[serde(default)]
    pub penalties: Option<i64>,
    #[serde(default)]
    pub played_matches: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawScorerPlayer {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}
