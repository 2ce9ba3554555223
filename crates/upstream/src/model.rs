//! The upstream-independent data model.
//!
//! Provider-shaped JSON never escapes its normalizer; everything downstream
//! of this crate sees these entities. All temporal fields are ET: `date_et`
//! for calendar days, `et_datetime` for instants.

use jiff::{Timestamp, Zoned, civil};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::et;

/// An ET instant that serializes with its offset, e.g.
/// `2025-08-13T19:05:00-04:00`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EtDateTime(pub Zoned);

impl Serialize for EtDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&et::render(&self.0))
    }
}

/// Lifecycle of a scheduled game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    /// Not yet started.
    Scheduled,
    /// In progress.
    Live,
    /// Completed.
    Final,
    /// Postponed; the game keeps its scheduled slot.
    Postponed,
    /// Anything else, carrying the provider's wording.
    Other(String),
}

impl GameStatus {
    /// Provider-independent classification from MLB's abstract/detailed pair.
    pub fn from_mlb(abstract_state: Option<&str>, detailed: Option<&str>) -> Self {
        if let Some(detailed) = detailed
            && detailed.eq_ignore_ascii_case("postponed")
        {
            return Self::Postponed;
        }

        match abstract_state {
            Some("Preview") => Self::Scheduled,
            Some("Live") => Self::Live,
            Some("Final") => Self::Final,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other("unknown".to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Final => "final",
            Self::Postponed => "postponed",
            Self::Other(raw) => raw,
        }
    }
}

impl Serialize for GameStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A team as referenced from a game.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRef {
    /// Provider-stable team id.
    pub id: i64,
    /// Display name.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Score in the referencing game, when available.
    pub score: Option<i64>,
}

/// A normalized game, shared by the MLB schedule tools.
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    /// Stable game id.
    pub id: String,
    /// ET calendar day the game belongs to.
    pub date_et: civil::Date,
    /// ET first pitch, absent when the provider only knows the day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_et: Option<EtDateTime>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Provider's detailed status wording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<String>,
    /// Home side.
    pub home: TeamRef,
    /// Away side.
    pub away: TeamRef,
    /// Venue name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Game number within a doubleheader day (1 or 2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_number: Option<i64>,
}

/// A team in a league listing.
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    /// Provider-stable id.
    pub id: i64,
    /// Full display name.
    pub name: String,
    /// Short code used for deterministic ordering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    /// League affiliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    /// Division affiliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
}

/// A player on a roster.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Provider-stable id.
    pub id: i64,
    /// Display name.
    pub full_name: String,
    /// Primary position abbreviation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Current team, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamRef>,
}

/// One roster slot, upstream order preserved.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    /// The player.
    #[serde(flatten)]
    pub player: Player,
    /// Jersey number as printed (providers ship it as a string).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<String>,
    /// Roster status description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One player-game statistical record. Requested stat keys flatten into the
/// object; unavailable stats are null, never zero.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerGameStat {
    /// ET calendar day of the game.
    pub date_et: civil::Date,
    /// ET instant of first pitch; null when the provider only knows the day.
    pub et_datetime: Option<EtDateTime>,
    /// Opponent display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    /// Whether the player's team was at home.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_home: Option<bool>,
    /// Requested stat keys, integer-coerced.
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

impl PlayerGameStat {
    /// Descending by day, then by instant with unknown instants last. The
    /// deterministic order every last-N window relies on.
    pub fn cmp_desc(&self, other: &Self) -> std::cmp::Ordering {
        other
            .date_et
            .cmp(&self.date_et)
            .then_with(|| match (&other.et_datetime, &self.et_datetime) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => std::cmp::Ordering::Greater,
                (None, Some(_)) => std::cmp::Ordering::Less,
                (None, None) => std::cmp::Ordering::Equal,
            })
    }
}

/// A soccer competition.
#[derive(Debug, Clone, Serialize)]
pub struct Competition {
    /// Provider-stable id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Short code (`PL`, `CL`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Governing area name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// League or cup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// One side of a soccer match.
#[derive(Debug, Clone, Serialize)]
pub struct SoccerSide {
    /// Provider-stable id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Three-letter abbreviation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tla: Option<String>,
}

/// A full-time or half-time score pair.
#[derive(Debug, Clone, Serialize)]
pub struct ScorePair {
    /// Home goals.
    pub home: Option<i64>,
    /// Away goals.
    pub away: Option<i64>,
}

/// A normalized soccer match.
#[derive(Debug, Clone, Serialize)]
pub struct SoccerMatch {
    /// Provider-stable id.
    pub id: i64,
    /// Kickoff as the provider's UTC instant; kept for ordering and for
    /// callers that correlate with odds feeds.
    pub utc_kickoff: Timestamp,
    /// ET calendar day of kickoff.
    pub date_et: civil::Date,
    /// ET kickoff instant.
    pub et_datetime: EtDateTime,
    /// Provider status string (`SCHEDULED`, `FINISHED`, ...).
    pub status: String,
    /// Matchday within the competition, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matchday: Option<i64>,
    /// Stage (`REGULAR_SEASON`, `FINAL`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    /// Home side.
    pub home: SoccerSide,
    /// Away side.
    pub away: SoccerSide,
    /// Full-time score, when played.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_full: Option<ScorePair>,
    /// Half-time score, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_half: Option<ScorePair>,
    /// Winner marker (`HOME_TEAM`, `AWAY_TEAM`, `DRAW`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

/// One row of a league table, provider position preserved.
#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    /// Table position.
    pub position: i64,
    /// The team.
    pub team: SoccerSide,
    /// Games played.
    pub played: i64,
    /// Wins.
    pub won: i64,
    /// Draws.
    pub draw: i64,
    /// Losses.
    pub lost: i64,
    /// Points.
    pub points: i64,
    /// Goals scored.
    pub goals_for: i64,
    /// Goals conceded.
    pub goals_against: i64,
    /// Goal difference.
    pub goal_difference: i64,
}

/// One entry in a top-scorers list. Missing counting stats are zero.
#[derive(Debug, Clone, Serialize)]
pub struct Scorer {
    /// Player display name.
    pub player: String,
    /// Player id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
    /// Team display name, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Goals scored.
    pub goals: i64,
    /// Assists.
    pub assists: i64,
    /// Penalty goals.
    pub penalties: i64,
    /// Matches played, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<i64>,
}

/// A club in a competition's team listing.
#[derive(Debug, Clone, Serialize)]
pub struct SoccerTeam {
    /// Provider-stable id.
    pub id: i64,
    /// Full display name.
    pub name: String,
    /// Short display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Three-letter abbreviation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tla: Option<String>,
    /// Home venue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

/// A timeline event inside a match-details payload.
#[derive(Debug, Clone, Serialize)]
pub struct MatchEvent {
    /// Event kind as reported (`goal`, `yellow_card`, ...).
    pub kind: String,
    /// Match minute as printed, including stoppage (`45+2`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<String>,
    /// Which side (`home`/`away`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Player involved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

/// A single-match detail payload.
#[derive(Debug, Clone, Serialize)]
pub struct MatchDetails {
    /// The match itself.
    #[serde(flatten)]
    pub summary: MatchSummary,
    /// Timeline events, provider order.
    pub events: Vec<MatchEvent>,
}

/// Match summary used inside [`MatchDetails`], where the provider may not
/// report a kickoff instant at all.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    /// Provider-stable id.
    pub id: i64,
    /// ET calendar day.
    pub date_et: civil::Date,
    /// ET kickoff instant, when the provider reports a time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub et_datetime: Option<EtDateTime>,
    /// Provider status string.
    pub status: String,
    /// Home side.
    pub home: SoccerSide,
    /// Away side.
    pub away: SoccerSide,
    /// Full-time score, when played.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_full: Option<ScorePair>,
    /// Half-time score, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_half: Option<ScorePair>,
}

/// Event-level betting data, shaped but not aggregated. `commence_time`
/// deliberately stays in the provider's UTC rendering.
#[derive(Debug, Clone, Serialize)]
pub struct OddsEvent {
    /// Provider event id.
    pub event_id: String,
    /// Sport key (`baseball_mlb`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_key: Option<String>,
    /// UTC kickoff/first-pitch as shipped by the provider.
    pub commence_time: String,
    /// Home team display name.
    pub home_team: String,
    /// Away team display name.
    pub away_team: String,
    /// Bookmakers quoting this event.
    pub bookmakers: Vec<Bookmaker>,
}

/// A bookmaker and its quoted markets.
#[derive(Debug, Clone, Serialize)]
pub struct Bookmaker {
    /// Provider bookmaker key.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Last quote refresh, provider UTC rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    /// Quoted markets.
    pub markets: Vec<Market>,
}

/// One market quoted by a bookmaker.
#[derive(Debug, Clone, Serialize)]
pub struct Market {
    /// Market key (`h2h`, `spreads`, `totals`, or a player-prop key).
    pub key: String,
    /// Outcomes in this market.
    pub outcomes: Vec<Outcome>,
}

/// One outcome inside a market.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Team name, or `Over`/`Under` for totals and props.
    pub name: String,
    /// Quoted price.
    pub price: f64,
    /// Line for non-moneyline markets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
    /// Player name for prop outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An Over/Under pair for one `(player, market)` group at one bookmaker.
#[derive(Debug, Clone, Serialize)]
pub struct PropLine {
    /// Player the prop is written on.
    pub player: String,
    /// Market key.
    pub market: String,
    /// Bookmaker key.
    pub bookmaker: String,
    /// Price on the over.
    pub over_price: f64,
    /// Line on the over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_point: Option<f64>,
    /// Price on the under.
    pub under_price: f64,
    /// Line on the under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub under_point: Option<f64>,
}

/// A team's standings snapshot used by the form tool.
#[derive(Debug, Clone, Serialize)]
pub struct TeamForm {
    /// The team.
    pub team: TeamRef,
    /// Wins on the season.
    pub wins: i64,
    /// Losses on the season.
    pub losses: i64,
    /// Winning percentage as printed by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_percentage: Option<String>,
    /// Games back in the division as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games_back: Option<String>,
    /// Division rank as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub division_rank: Option<String>,
    /// Current streak (`W3` / `L2`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<String>,
    /// Season run differential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_differential: Option<i64>,
    /// Record over the last ten games (`7-3`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ten: Option<String>,
}
