//! Football-Data.org v4 client and normalizer. Header-token auth.

mod input;

use config::FootballDataConfig;
use jiff::Timestamp;
use reqwest::Url;
use secrecy::SecretString;

use self::input::{
    CompetitionsResponse, MatchesResponse, RawMatch, RawScorer, ScorersResponse, StandingsResponse,
    TeamsResponse,
};
use crate::{
    error::{Result, UpstreamError},
    et,
    http::{Auth, FetchClient, decode},
    model::{
        Competition, EtDateTime, Scorer, ScorePair, SoccerMatch, SoccerSide, SoccerTeam, StandingRow,
    },
};

const AUTH_HEADER: &str = "X-Auth-Token";

/// Optional filters accepted by the match listing endpoints.
#[derive(Debug, Default, Clone)]
pub struct MatchFilters {
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub date_to: Option<String>,
    /// Competition matchday.
    pub matchday: Option<i64>,
    /// Provider status filter (`SCHEDULED`, `FINISHED`, ...).
    pub status: Option<String>,
    /// Season start year.
    pub season: Option<i64>,
    /// Maximum number of matches.
    pub limit: Option<i64>,
}

impl MatchFilters {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(date_from) = &self.date_from {
            pairs.push(("dateFrom", date_from.clone()));
        }
        if let Some(date_to) = &self.date_to {
            pairs.push(("dateTo", date_to.clone()));
        }
        if let Some(matchday) = self.matchday {
            pairs.push(("matchday", matchday.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(season) = self.season {
            pairs.push(("season", season.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }

        pairs
    }
}

/// Client for api.football-data.org.
#[derive(Clone)]
pub struct FootballDataClient {
    fetch: FetchClient,
    base_url: String,
    api_key: Option<SecretString>,
}

impl FootballDataClient {
    pub(crate) fn new(fetch: FetchClient, config: &FootballDataConfig) -> Self {
        Self {
            fetch,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let key = self
            .api_key
            .as_ref()
            .ok_or(UpstreamError::Credential { provider: "football-data" })?;

        let mut url = Url::parse(&format!("{}{path}", self.base_url)).map_err(|_| UpstreamError::Transient {
            reason: format!("invalid upstream URL for {path}"),
        })?;
        url.query_pairs_mut().extend_pairs(query);

        let value = self.fetch.get_json(url, Auth::Header(AUTH_HEADER, key)).await?;

        decode(value)
    }

    /// All competitions visible to the configured tier.
    pub async fn competitions(&self) -> Result<Vec<Competition>> {
        let response: CompetitionsResponse = self.get("/competitions", &[]).await?;

        Ok(response
            .competitions
            .into_iter()
            .map(|raw| Competition {
                id: raw.id,
                name: raw.name,
                code: raw.code,
                area: raw.area.map(|a| a.name),
                kind: raw.kind,
            })
            .collect())
    }

    /// Matches of a competition under the supplied filters.
    pub async fn competition_matches(&self, competition_id: i64, filters: &MatchFilters) -> Result<Vec<SoccerMatch>> {
        let response: MatchesResponse = self
            .get(&format!("/competitions/{competition_id}/matches"), &filters.query())
            .await?;

        Ok(normalize_matches(response))
    }

    /// Matches of a single team under the supplied filters.
    pub async fn team_matches(&self, team_id: i64, filters: &MatchFilters) -> Result<Vec<SoccerMatch>> {
        let response: MatchesResponse = self
            .get(&format!("/teams/{team_id}/matches"), &filters.query())
            .await?;

        Ok(normalize_matches(response))
    }

    /// The TOTAL league table, provider position order preserved.
    pub async fn standings(&self, competition_id: i64, season: Option<i64>) -> Result<Vec<StandingRow>> {
        let query: Vec<(&str, String)> = season.map(|s| ("season", s.to_string())).into_iter().collect();

        let response: StandingsResponse = self
            .get(&format!("/competitions/{competition_id}/standings"), &query)
            .await?;

        let table = response
            .standings
            .into_iter()
            .find(|table| table.kind.as_deref() == Some("TOTAL"))
            .map(|table| table.table)
            .unwrap_or_default();

        Ok(table
            .into_iter()
            .map(|row| StandingRow {
                position: row.position,
                team: SoccerSide {
                    id: row.team.id,
                    name: side_name(&row.team.name, &row.team.short_name),
                    tla: row.team.tla,
                },
                played: row.played_games,
                won: row.won,
                draw: row.draw,
                lost: row.lost,
                points: row.points,
                goals_for: row.goals_for,
                goals_against: row.goals_against,
                goal_difference: row.goal_difference,
            })
            .collect())
    }

    /// Teams of a competition.
    pub async fn competition_teams(&self, competition_id: i64, season: Option<i64>) -> Result<Vec<SoccerTeam>> {
        let query: Vec<(&str, String)> = season.map(|s| ("season", s.to_string())).into_iter().collect();

        let response: TeamsResponse = self
            .get(&format!("/competitions/{competition_id}/teams"), &query)
            .await?;

        Ok(response
            .teams
            .into_iter()
            .map(|raw| SoccerTeam {
                id: raw.id,
                name: raw.name,
                short_name: raw.short_name,
                tla: raw.tla,
                venue: raw.venue,
            })
            .collect())
    }

    /// Top scorers of a competition, provider order, honoring `limit`.
    pub async fn top_scorers(&self, competition_id: i64, limit: i64, season: Option<i64>) -> Result<Vec<Scorer>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(season) = season {
            query.push(("season", season.to_string()));
        }

        let response: ScorersResponse = self
            .get(&format!("/competitions/{competition_id}/scorers"), &query)
            .await?;

        Ok(response.scorers.into_iter().map(normalize_scorer).collect())
    }
}

fn side_name(name: &Option<String>, short_name: &Option<String>) -> String {
    name.clone()
        .or_else(|| short_name.clone())
        .unwrap_or_else(|| "TBD".to_string())
}

fn normalize_matches(response: MatchesResponse) -> Vec<SoccerMatch> {
    response
        .matches
        .into_iter()
        .filter_map(|raw| match normalize_match(raw) {
            Ok(m) => Some(m),
            Err(err) => {
                log::warn!("skipping unparseable football-data match: {err}");
                None
            }
        })
        .collect()
}

fn normalize_match(raw: RawMatch) -> Result<SoccerMatch> {
    let utc_kickoff: Timestamp = raw
        .utc_date
        .parse()
        .map_err(|_| UpstreamError::Normalize { field: "utcDate" })?;

    let zoned = utc_kickoff.to_zoned(et::eastern());

    let score_full = raw
        .score
        .as_ref()
        .and_then(|score| score.full_time.as_ref())
        .map(|pair| ScorePair {
            home: pair.home,
            away: pair.away,
        });
    let score_half = raw
        .score
        .as_ref()
        .and_then(|score| score.half_time.as_ref())
        .map(|pair| ScorePair {
            home: pair.home,
            away: pair.away,
        });

    Ok(SoccerMatch {
        id: raw.id,
        utc_kickoff,
        date_et: zoned.date(),
        et_datetime: EtDateTime(zoned),
        status: raw.status.unwrap_or_else(|| "UNKNOWN".to_string()),
        matchday: raw.matchday,
        stage: raw.stage,
        home: SoccerSide {
            id: raw.home_team.id,
            name: side_name(&raw.home_team.name, &raw.home_team.short_name),
            tla: raw.home_team.tla,
        },
        away: SoccerSide {
            id: raw.away_team.id,
            name: side_name(&raw.away_team.name, &raw.away_team.short_name),
            tla: raw.away_team.tla,
        },
        score_full,
        score_half,
        winner: raw.score.and_then(|score| score.winner),
    })
}

fn normalize_scorer(raw: RawScorer) -> Scorer {
    Scorer {
        player: raw.player.name,
        player_id: raw.player.id,
        team: raw.team.map(|t| t.name),
        goals: raw.goals.unwrap_or(0),
        assists: raw.assists.unwrap_or(0),
        penalties: raw.penalties.unwrap_or(0),
        matches: raw.played_matches,
    }
}
