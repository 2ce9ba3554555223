//! Soccer tool handlers: Football-Data.org listings plus SoccerDataAPI
//! match details.

use serde::Deserialize;
use serde_json::{Value, json};
use upstream::{model::SoccerMatch, provider::football_data::MatchFilters};

use crate::{
    ToolContext,
    error::{Result, ToolError, decode_args},
    result::ToolResult,
};

const DEFAULT_SCORERS_LIMIT: i64 = 10;

fn validate_iso_date(raw: &Option<String>, field: &str) -> Result<()> {
    if let Some(raw) = raw
        && raw.parse::<jiff::civil::Date>().is_err()
    {
        return Err(ToolError::validation(field, "expected an ISO date (YYYY-MM-DD)"));
    }

    Ok(())
}

/// Ascending by UTC kickoff, id as tiebreak.
fn sort_matches(matches: &mut [SoccerMatch]) {
    matches.sort_by(|a, b| a.utc_kickoff.cmp(&b.utc_kickoff).then_with(|| a.id.cmp(&b.id)));
}

/// `getCompetitions`
pub(crate) async fn competitions(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let _: EmptyArgs = decode_args(arguments)?;

    let competitions = ctx.upstreams.football.competitions().await?;

    let count = competitions.len();
    let data = json!({
        "count": count,
        "competitions": competitions,
    });

    Ok(ToolResult::success(format!("**Competitions**: {count} available"), data))
}

#[derive(Deserialize)]
struct EmptyArgs {}

#[derive(Deserialize)]
struct CompetitionMatchesArgs {
    competition_id: i64,
    date_from: Option<String>,
    date_to: Option<String>,
    matchday: Option<i64>,
    status: Option<String>,
    season: Option<i64>,
    limit: Option<i64>,
}

/// `getCompetitionMatches`
pub(crate) async fn competition_matches(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: CompetitionMatchesArgs = decode_args(arguments)?;

    validate_iso_date(&args.date_from, "date_from")?;
    validate_iso_date(&args.date_to, "date_to")?;

    if let Some(limit) = args.limit
        && limit < 1
    {
        return Err(ToolError::validation("limit", "must be at least 1"));
    }

    let filters = MatchFilters {
        date_from: args.date_from,
        date_to: args.date_to,
        matchday: args.matchday,
        status: args.status,
        season: args.season,
        limit: None,
    };

    let mut matches = ctx
        .upstreams
        .football
        .competition_matches(args.competition_id, &filters)
        .await?;

    sort_matches(&mut matches);
    if let Some(limit) = args.limit {
        matches.truncate(limit as usize);
    }

    let count = matches.len();
    let data = json!({
        "competition_id": args.competition_id,
        "count": count,
        "matches": matches,
    });

    Ok(ToolResult::success(
        format!("**Matches for competition {}**: {count} matches", args.competition_id),
        data,
    )
    .with_note("Matches are ordered by UTC kickoff; ET views are included per match."))
}

#[derive(Deserialize)]
struct StandingsArgs {
    competition_id: i64,
    season: Option<i64>,
}

/// `getCompetitionStandings`
pub(crate) async fn competition_standings(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: StandingsArgs = decode_args(arguments)?;

    let standings = ctx
        .upstreams
        .football
        .standings(args.competition_id, args.season)
        .await?;

    let count = standings.len();
    let data = json!({
        "competition_id": args.competition_id,
        "count": count,
        "standings": standings,
    });

    Ok(ToolResult::success(
        format!("**Standings for competition {}**: {count} teams", args.competition_id),
        data,
    ))
}

#[derive(Deserialize)]
struct CompetitionTeamsArgs {
    competition_id: i64,
    season: Option<i64>,
}

/// `getCompetitionTeams`
pub(crate) async fn competition_teams(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: CompetitionTeamsArgs = decode_args(arguments)?;

    let mut teams = ctx
        .upstreams
        .football
        .competition_teams(args.competition_id, args.season)
        .await?;

    teams.sort_by(|a, b| a.tla.cmp(&b.tla).then_with(|| a.name.cmp(&b.name)));

    let count = teams.len();
    let data = json!({
        "competition_id": args.competition_id,
        "count": count,
        "teams": teams,
    });

    Ok(ToolResult::success(
        format!("**Teams in competition {}**: {count} teams", args.competition_id),
        data,
    ))
}

#[derive(Deserialize)]
struct TeamMatchesArgs {
    team_id: i64,
    status: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    season: Option<i64>,
    limit: Option<i64>,
}

/// `getTeamMatches`
pub(crate) async fn team_matches(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: TeamMatchesArgs = decode_args(arguments)?;

    validate_iso_date(&args.date_from, "date_from")?;
    validate_iso_date(&args.date_to, "date_to")?;

    if let Some(limit) = args.limit
        && limit < 1
    {
        return Err(ToolError::validation("limit", "must be at least 1"));
    }

    let filters = MatchFilters {
        date_from: args.date_from,
        date_to: args.date_to,
        matchday: None,
        status: args.status,
        season: args.season,
        limit: args.limit,
    };

    let mut matches = ctx.upstreams.football.team_matches(args.team_id, &filters).await?;

    sort_matches(&mut matches);
    if let Some(limit) = args.limit {
        matches.truncate(limit as usize);
    }

    let count = matches.len();
    let data = json!({
        "team_id": args.team_id,
        "count": count,
        "matches": matches,
    });

    Ok(ToolResult::success(
        format!("**Matches for team {}**: {count} matches", args.team_id),
        data,
    ))
}

#[derive(Deserialize)]
struct MatchDetailsArgs {
    match_id: i64,
}

/// `getMatchDetails`
pub(crate) async fn match_details(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: MatchDetailsArgs = decode_args(arguments)?;

    let details = ctx.upstreams.soccerdata.match_details(args.match_id).await?;

    let content = format!(
        "**{} vs {}**: {}",
        details.summary.home.name, details.summary.away.name, details.summary.status
    );

    let data = json!({
        "match_id": args.match_id,
        "match": details,
    });

    Ok(ToolResult::success(content, data))
}

#[derive(Deserialize)]
struct TopScorersArgs {
    competition_id: i64,
    limit: Option<i64>,
    season: Option<i64>,
}

/// `getTopScorers`
pub(crate) async fn top_scorers(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: TopScorersArgs = decode_args(arguments)?;

    let limit = args.limit.unwrap_or(DEFAULT_SCORERS_LIMIT);
    if limit < 1 {
        return Err(ToolError::validation("limit", "must be at least 1"));
    }

    let mut scorers = ctx
        .upstreams
        .football
        .top_scorers(args.competition_id, limit, args.season)
        .await?;

    scorers.truncate(limit as usize);

    let count = scorers.len();
    let data = json!({
        "competition_id": args.competition_id,
        "limit": limit,
        "count": count,
        "scorers": scorers,
    });

    Ok(ToolResult::success(
        format!("**Top scorers for competition {}**: {count} players", args.competition_id),
        data,
    ))
}
