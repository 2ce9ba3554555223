//! MLB Stats API client and normalizer. The one provider with no auth.

mod input;

use config::MlbConfig;
use jiff::civil;
use reqwest::Url;
use serde::Deserialize;

use self::input::{
    PeopleResponse, RawGame, RawSplit, RawTeamRecord, RosterResponse, ScheduleResponse,
    StandingsResponse, StatsResponse, TeamsResponse,
};
use crate::{
    coerce,
    error::{Result, UpstreamError},
    et,
    http::{Auth, FetchClient, decode},
    model::{EtDateTime, Game, GameStatus, Player, PlayerGameStat, RosterEntry, Team, TeamForm, TeamRef},
};

/// Stat group of an MLB game log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatGroup {
    /// Batting lines.
    Hitting,
    /// Pitching lines.
    Pitching,
}

impl StatGroup {
    /// Query value for the stats endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hitting => "hitting",
            Self::Pitching => "pitching",
        }
    }
}

/// Client for statsapi.mlb.com.
#[derive(Clone)]
pub struct MlbClient {
    fetch: FetchClient,
    base_url: String,
}

impl MlbClient {
    pub(crate) fn new(fetch: FetchClient, config: &MlbConfig) -> Self {
        Self {
            fetch,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url)).map_err(|_| UpstreamError::Transient {
            reason: format!("invalid upstream URL for {path}"),
        })?;

        url.query_pairs_mut().extend_pairs(query);

        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let value = self.fetch.get_json(self.url(path, query)?, Auth::None).await?;

        decode(value)
    }

    /// All games on one ET calendar day.
    pub async fn schedule(&self, date: civil::Date) -> Result<Vec<Game>> {
        let response: ScheduleResponse = self
            .get("/schedule", &[("sportId", "1".to_string()), ("date", date.to_string())])
            .await?;

        Ok(normalize_schedule(response))
    }

    /// One team's games over a date window, oldest day first as shipped.
    pub async fn schedule_window(&self, team_id: i64, start: civil::Date, end: civil::Date) -> Result<Vec<Game>> {
        let response: ScheduleResponse = self
            .get(
                "/schedule",
                &[
                    ("sportId", "1".to_string()),
                    ("teamId", team_id.to_string()),
                    ("startDate", start.to_string()),
                    ("endDate", end.to_string()),
                ],
            )
            .await?;

        Ok(normalize_schedule(response))
    }

    /// All teams for a season.
    pub async fn teams(&self, season: i16) -> Result<Vec<Team>> {
        let response: TeamsResponse = self
            .get("/teams", &[("sportId", "1".to_string()), ("season", season.to_string())])
            .await?;

        Ok(response
            .teams
            .into_iter()
            .map(|raw| Team {
                id: raw.id,
                name: raw.name,
                abbreviation: raw.abbreviation,
                league: raw.league.map(|l| l.name),
                division: raw.division.map(|d| d.name),
            })
            .collect())
    }

    /// Active roster for a team, upstream order preserved.
    pub async fn roster(&self, team_id: i64) -> Result<Vec<RosterEntry>> {
        let response: RosterResponse = self
            .get(&format!("/teams/{team_id}/roster"), &[("rosterType", "active".to_string())])
            .await?;

        Ok(response
            .roster
            .into_iter()
            .map(|raw| RosterEntry {
                player: Player {
                    id: raw.person.id,
                    full_name: raw.person.full_name,
                    position: raw.position.and_then(|p| p.abbreviation),
                    team: None,
                },
                jersey_number: raw.jersey_number,
                status: raw.status.and_then(|s| s.description),
            })
            .collect())
    }

    /// One player's bio record.
    pub async fn person(&self, person_id: i64) -> Result<Player> {
        let response: PeopleResponse = self.get(&format!("/people/{person_id}"), &[]).await?;

        let raw = response.people.into_iter().next().ok_or(UpstreamError::Normalize { field: "people" })?;

        Ok(Player {
            id: raw.id,
            full_name: raw.full_name,
            position: raw.primary_position.and_then(|p| p.abbreviation),
            team: raw.current_team.map(|team| TeamRef {
                id: team.id,
                name: team.name,
                score: None,
            }),
        })
    }

    /// A player's per-game log for a season and stat group, shaped to the
    /// requested stat keys. Unparseable splits are skipped.
    pub async fn game_log(
        &self,
        person_id: i64,
        season: i16,
        group: StatGroup,
        keys: &[String],
    ) -> Result<Vec<PlayerGameStat>> {
        let response: StatsResponse = self
            .get(
                &format!("/people/{person_id}/stats"),
                &[
                    ("stats", "gameLog".to_string()),
                    ("season", season.to_string()),
                    ("group", group.as_str().to_string()),
                ],
            )
            .await?;

        Ok(response
            .stats
            .into_iter()
            .flat_map(|entry| entry.splits)
            .filter_map(|split| normalize_split(split, keys))
            .collect())
    }

    /// Season standings across both leagues, flattened.
    pub async fn standings(&self, season: i16) -> Result<Vec<TeamForm>> {
        let response: StandingsResponse = self
            .get(
                "/standings",
                &[("leagueId", "103,104".to_string()), ("season", season.to_string())],
            )
            .await?;

        Ok(response
            .records
            .into_iter()
            .flat_map(|record| record.team_records)
            .map(normalize_team_record)
            .collect())
    }
}

fn normalize_schedule(response: ScheduleResponse) -> Vec<Game> {
    response
        .dates
        .into_iter()
        .flat_map(|date| date.games)
        .filter_map(|raw| match normalize_game(raw) {
            Ok(game) => Some(game),
            Err(err) => {
                log::warn!("skipping unparseable MLB schedule entry: {err}");
                None
            }
        })
        .collect()
}

fn normalize_game(raw: RawGame) -> Result<Game> {
    let start = raw
        .game_date
        .as_deref()
        .map(|date| et::parse_instant(date, "gameDate"))
        .transpose()?;

    let date_et = match raw.official_date.as_deref() {
        Some(official) => et::parse_date(official, "officialDate")?,
        None => start
            .as_ref()
            .map(|zoned| zoned.date())
            .ok_or(UpstreamError::Normalize { field: "officialDate" })?,
    };

    // TBD starts come through as literal midnights; keep the day, drop the
    // fabricated instant.
    let tbd = raw.start_time_tbd.unwrap_or(false);
    let start_et = start
        .filter(|zoned| !tbd && !et::is_midnight(zoned))
        .map(EtDateTime);

    let (abstract_state, detailed) = raw
        .status
        .as_ref()
        .map(|s| (s.abstract_game_state.as_deref(), s.detailed_state.as_deref()))
        .unwrap_or((None, None));

    let is_doubleheader = matches!(raw.double_header.as_deref(), Some("Y") | Some("S"));

    Ok(Game {
        id: raw.game_pk.to_string(),
        date_et,
        start_et,
        status: GameStatus::from_mlb(abstract_state, detailed),
        status_detail: detailed.map(str::to_string),
        home: TeamRef {
            id: raw.teams.home.team.id,
            name: raw.teams.home.team.name,
            score: raw.teams.home.score,
        },
        away: TeamRef {
            id: raw.teams.away.team.id,
            name: raw.teams.away.team.name,
            score: raw.teams.away.score,
        },
        venue: raw.venue.map(|v| v.name),
        game_number: is_doubleheader.then_some(raw.game_number.unwrap_or(1)),
    })
}

fn normalize_split(split: RawSplit, keys: &[String]) -> Option<PlayerGameStat> {
    let date_et = split.date.as_deref()?.parse::<civil::Date>().ok()?;

    let et_datetime = split
        .game
        .as_ref()
        .and_then(|game| game.game_date.as_deref())
        .and_then(|raw| et::parse_instant(raw, "gameDate").ok())
        .filter(|zoned| !et::is_midnight(zoned))
        .map(EtDateTime);

    let stats = keys
        .iter()
        .map(|key| (key.clone(), coerce::coerce_int(split.stat.get(key))))
        .collect();

    Some(PlayerGameStat {
        date_et,
        et_datetime,
        opponent: split.opponent.map(|o| o.name),
        is_home: split.is_home,
        stats,
    })
}

fn normalize_team_record(raw: RawTeamRecord) -> TeamForm {
    let last_ten = raw.records.as_ref().and_then(|records| {
        records
            .split_records
            .iter()
            .find(|split| split.kind.as_deref() == Some("lastTen"))
            .and_then(|split| Some(format!("{}-{}", split.wins?, split.losses?)))
    });

    TeamForm {
        team: TeamRef {
            id: raw.team.id,
            name: raw.team.name,
            score: None,
        },
        wins: raw.wins,
        losses: raw.losses,
        winning_percentage: raw.winning_percentage,
        games_back: raw.games_back,
        division_rank: raw.division_rank,
        streak: raw.streak.and_then(|s| s.streak_code),
        run_differential: raw.run_differential,
        last_ten,
    }
}
