//! MLB tool handlers.

use jiff::{ToSpan, civil};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use upstream::{
    coerce, et,
    model::{Game, GameStatus, PlayerGameStat},
    provider::mlb::StatGroup,
};

use crate::{
    ToolContext,
    error::{Result, ToolError, decode_args},
    fanout::fan_out,
    result::ToolResult,
};

const ET_NOTE: &str = "All dates and times are US Eastern (America/New_York).";

const DEFAULT_HITTING_KEYS: &[&str] = &[
    "hits",
    "homeRuns",
    "rbi",
    "runs",
    "baseOnBalls",
    "strikeOuts",
    "atBats",
];

const DEFAULT_PITCHING_KEYS: &[&str] = &[
    "inningsPitched",
    "earnedRuns",
    "strikeOuts",
    "baseOnBalls",
    "hits",
];

/// How far back the scoring-trends window scans for completed games.
const TRENDS_LOOKBACK_DAYS: i64 = 45;

fn current_season() -> i16 {
    et::today().year()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn parse_date_arg(raw: Option<&str>, field: &str) -> Result<civil::Date> {
    match raw {
        None => Ok(et::today()),
        Some(raw) => raw
            .parse()
            .map_err(|_| ToolError::validation(field, "expected an ISO date (YYYY-MM-DD)")),
    }
}

/// Ascending by start instant, games without a start last, id as tiebreak.
fn sort_schedule(games: &mut [Game]) {
    games.sort_by(|a, b| match (&a.start_et, &b.start_et) {
        (Some(a_start), Some(b_start)) => a_start.cmp(b_start).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });
}

#[derive(Deserialize)]
struct ScheduleArgs {
    date: Option<String>,
}

/// `getMLBScheduleET`
pub(crate) async fn schedule(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: ScheduleArgs = decode_args(arguments)?;
    let date = parse_date_arg(args.date.as_deref(), "date")?;

    let mut games = ctx.upstreams.mlb.schedule(date).await?;
    sort_schedule(&mut games);

    let count = games.len();
    let data = json!({
        "date_et": date,
        "count": count,
        "games": games,
    });

    Ok(
        ToolResult::success(format!("**MLB schedule for {date} (ET)**: {count} games"), data)
            .with_note(ET_NOTE),
    )
}

#[derive(Deserialize)]
struct TeamsArgs {
    season: Option<i16>,
}

/// `getMLBTeams`
pub(crate) async fn teams(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: TeamsArgs = decode_args(arguments)?;
    let season = args.season.unwrap_or_else(current_season);

    let mut teams = ctx.upstreams.mlb.teams(season).await?;
    teams.sort_by(|a, b| a.abbreviation.cmp(&b.abbreviation).then_with(|| a.name.cmp(&b.name)));

    let count = teams.len();
    let data = json!({
        "season": season,
        "count": count,
        "teams": teams,
    });

    Ok(ToolResult::success(format!("**MLB teams ({season})**: {count} teams"), data))
}

#[derive(Deserialize)]
struct RosterArgs {
    team_id: i64,
}

/// `getMLBTeamRoster`
pub(crate) async fn roster(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: RosterArgs = decode_args(arguments)?;

    let roster = ctx.upstreams.mlb.roster(args.team_id).await?;

    let count = roster.len();
    let data = json!({
        "team_id": args.team_id,
        "count": count,
        "roster": roster,
    });

    Ok(ToolResult::success(
        format!("**MLB roster for team {}**: {count} players", args.team_id),
        data,
    ))
}

#[derive(Deserialize)]
struct LastNArgs {
    player_ids: Vec<i64>,
    season: Option<i16>,
    group: Option<String>,
    stats: Option<Vec<String>>,
    count: Option<i64>,
    cutoff_iso_et: Option<String>,
}

struct LastNWindow {
    season: i16,
    group: StatGroup,
    keys: Vec<String>,
    count: usize,
    cutoff_date: civil::Date,
}

fn parse_last_n(args: &LastNArgs) -> Result<LastNWindow> {
    if args.player_ids.is_empty() {
        return Err(ToolError::validation("player_ids", "must not be empty"));
    }

    let count = args.count.unwrap_or(5);
    if count < 1 {
        return Err(ToolError::validation("count", "must be at least 1"));
    }

    let group = match args.group.as_deref() {
        None | Some("hitting") => StatGroup::Hitting,
        Some("pitching") => StatGroup::Pitching,
        Some(other) => {
            return Err(ToolError::validation(
                "group",
                format!("`{other}` is not one of `hitting`, `pitching`"),
            ));
        }
    };

    let keys = match &args.stats {
        Some(keys) if !keys.is_empty() => keys.clone(),
        _ => default_keys(group),
    };

    let cutoff_date = match args.cutoff_iso_et.as_deref() {
        Some(raw) => et::parse_instant(raw, "cutoff_iso_et")
            .map_err(|_| ToolError::validation("cutoff_iso_et", "expected an ISO-8601 instant or date"))?
            .date(),
        None => et::today(),
    };

    Ok(LastNWindow {
        season: args.season.unwrap_or_else(current_season),
        group,
        keys,
        count: count as usize,
        cutoff_date,
    })
}

fn default_keys(group: StatGroup) -> Vec<String> {
    let keys = match group {
        StatGroup::Hitting => DEFAULT_HITTING_KEYS,
        StatGroup::Pitching => DEFAULT_PITCHING_KEYS,
    };

    keys.iter().map(|key| key.to_string()).collect()
}

/// Completed games on or before the cutoff, newest first, at most `count`.
fn clip_window(mut games: Vec<PlayerGameStat>, cutoff_date: civil::Date, count: usize) -> Vec<PlayerGameStat> {
    games.retain(|game| game.date_et <= cutoff_date);
    games.sort_by(PlayerGameStat::cmp_desc);
    games.truncate(count);
    games
}

/// `<key>_sum` and `<key>_avg` over the integer-typed samples of a window.
fn aggregates(games: &[PlayerGameStat], keys: &[String]) -> Map<String, Value> {
    let mut out = Map::new();

    for key in keys {
        let samples = coerce::int_samples(games.iter().filter_map(|game| game.stats.get(key)));
        let sum: i64 = samples.iter().sum();
        let avg = if samples.is_empty() {
            0.0
        } else {
            sum as f64 / samples.len() as f64
        };

        out.insert(format!("{key}_sum"), json!(sum));
        out.insert(format!("{key}_avg"), json!(avg));
    }

    out
}

/// `getMLBPlayerLastN`
pub(crate) async fn player_last_n(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: LastNArgs = decode_args(arguments)?;
    let window = parse_last_n(&args)?;

    let (results, errors) = fan_out(&args.player_ids, |player_id| {
        let window = &window;
        async move {
            let games = ctx
                .upstreams
                .mlb
                .game_log(player_id, window.season, window.group, &window.keys)
                .await?;

            let games = clip_window(games, window.cutoff_date, window.count);
            let aggregates = aggregates(&games, &window.keys);

            Ok(json!({
                "games": games,
                "aggregates": aggregates,
            }))
        }
    })
    .await;

    if results.is_empty()
        && let Some(first) = errors.values().next()
    {
        return Ok(ToolResult::failure_message(format!(
            "all {} requested players failed: {first}",
            args.player_ids.len()
        )));
    }

    let content = format!(
        "**MLB last-{} {} games**: {} of {} players",
        window.count,
        window.group.as_str(),
        results.len(),
        args.player_ids.len(),
    );

    let data = json!({
        "season": window.season,
        "group": window.group.as_str(),
        "count": window.count,
        "cutoff_date_et": window.cutoff_date,
        "results": results,
        "errors": errors,
    });

    Ok(ToolResult::success(content, data)
        .with_note("Windows cover completed games on or before the ET cutoff, newest first."))
}

#[derive(Deserialize)]
struct MatchupArgs {
    pitcher_id: i64,
    season: Option<i16>,
    count: Option<i64>,
    opponent: Option<String>,
}

/// `getMLBPitcherMatchup`
pub(crate) async fn pitcher_matchup(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: MatchupArgs = decode_args(arguments)?;

    let count = args.count.unwrap_or(5);
    if count < 1 {
        return Err(ToolError::validation("count", "must be at least 1"));
    }

    let season = args.season.unwrap_or_else(current_season);
    let keys = default_keys(StatGroup::Pitching);

    let pitcher = ctx.upstreams.mlb.person(args.pitcher_id).await?;
    let games = ctx
        .upstreams
        .mlb
        .game_log(args.pitcher_id, season, StatGroup::Pitching, &keys)
        .await?;

    let mut games = clip_window(games, et::today(), count as usize + 32);

    if let Some(opponent) = &args.opponent {
        let needle = opponent.to_lowercase();
        games.retain(|game| {
            game.opponent
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        });
    }

    games.truncate(count as usize);

    let (rates, note) = pitching_rates(&games);

    let content = match &pitcher.full_name {
        name if rates["era"].is_null() => format!("**{name}**: no innings pitched in window"),
        name => format!(
            "**{name}**: ERA {} / WHIP {} over last {} starts",
            rates["era"], rates["whip"], games.len()
        ),
    };

    let data = json!({
        "pitcher": pitcher,
        "season": season,
        "opponent_filter": args.opponent,
        "count": games.len(),
        "games": games,
        "rates": rates,
    });

    let result = ToolResult::success(content, data);
    Ok(match note {
        Some(note) => result.with_note(note),
        None => result.with_note(ET_NOTE),
    })
}

/// ERA / WHIP / K-9 from a pitching window, one decimal, null (plus a note)
/// when no innings were recorded.
fn pitching_rates(games: &[PlayerGameStat]) -> (Value, Option<String>) {
    let outs: i64 = games
        .iter()
        .filter_map(|game| game.stats.get("inningsPitched"))
        .filter_map(coerce::innings_to_outs)
        .sum();

    let sum = |key: &str| -> i64 {
        coerce::int_samples(games.iter().filter_map(|game| game.stats.get(key)))
            .iter()
            .sum()
    };

    let earned_runs = sum("earnedRuns");
    let strikeouts = sum("strikeOuts");
    let walks = sum("baseOnBalls");
    let hits_allowed = sum("hits");

    if outs == 0 {
        let rates = json!({
            "innings_pitched": 0.0,
            "earned_runs": earned_runs,
            "strikeouts": strikeouts,
            "walks": walks,
            "hits_allowed": hits_allowed,
            "era": null,
            "whip": null,
            "k_per_9": null,
        });

        return (rates, Some("No innings pitched in the window; rate stats are null.".to_string()));
    }

    let innings = outs as f64 / 3.0;

    let rates = json!({
        "innings_pitched": round1(innings),
        "earned_runs": earned_runs,
        "strikeouts": strikeouts,
        "walks": walks,
        "hits_allowed": hits_allowed,
        "era": round1(9.0 * earned_runs as f64 / innings),
        "whip": round1((walks + hits_allowed) as f64 / innings),
        "k_per_9": round1(9.0 * strikeouts as f64 / innings),
    });

    (rates, None)
}

#[derive(Deserialize)]
struct TeamFormArgs {
    team_id: i64,
    season: Option<i16>,
}

/// `getMLBTeamForm`
pub(crate) async fn team_form(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: TeamFormArgs = decode_args(arguments)?;
    let season = args.season.unwrap_or_else(current_season);

    let standings = ctx.upstreams.mlb.standings(season).await?;

    let form = standings
        .into_iter()
        .find(|form| form.team.id == args.team_id)
        .ok_or_else(|| ToolError::validation("team_id", format!("team {} not found in {season} standings", args.team_id)))?;

    let streak = form.streak.clone().unwrap_or_else(|| "none".to_string());
    let content = format!(
        "**{}**: {}-{}, streak {streak}",
        form.team.name, form.wins, form.losses
    );

    let data = json!({
        "season": season,
        "form": form,
    });

    Ok(ToolResult::success(content, data))
}

#[derive(Deserialize)]
struct StreaksArgs {
    player_ids: Vec<i64>,
    season: Option<i16>,
    count: Option<i64>,
}

/// `getMLBPlayerStreaks`
pub(crate) async fn player_streaks(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: StreaksArgs = decode_args(arguments)?;

    if args.player_ids.is_empty() {
        return Err(ToolError::validation("player_ids", "must not be empty"));
    }

    let count = args.count.unwrap_or(10);
    if count < 1 {
        return Err(ToolError::validation("count", "must be at least 1"));
    }

    let season = args.season.unwrap_or_else(current_season);
    let keys: Vec<String> = ["hits", "baseOnBalls", "hitByPitch"]
        .iter()
        .map(|key| key.to_string())
        .collect();

    let (results, errors) = fan_out(&args.player_ids, |player_id| {
        let keys = &keys;
        async move {
            let games = ctx
                .upstreams
                .mlb
                .game_log(player_id, season, StatGroup::Hitting, keys)
                .await?;

            let games = clip_window(games, et::today(), count as usize);

            Ok(streak_summary(&games))
        }
    })
    .await;

    if results.is_empty()
        && let Some(first) = errors.values().next()
    {
        return Ok(ToolResult::failure_message(format!(
            "all {} requested players failed: {first}",
            args.player_ids.len()
        )));
    }

    let content = format!(
        "**MLB streaks over last {count} games**: {} of {} players",
        results.len(),
        args.player_ids.len(),
    );

    let data = json!({
        "season": season,
        "window": count,
        "results": results,
        "errors": errors,
    });

    Ok(ToolResult::success(content, data).with_note(ET_NOTE))
}

/// Current streaks scanning back from the most recent game.
fn streak_summary(games: &[PlayerGameStat]) -> Value {
    let stat = |game: &PlayerGameStat, key: &str| -> i64 {
        game.stats.get(key).and_then(Value::as_i64).unwrap_or(0)
    };

    let mut hitting_streak = 0;
    for game in games {
        if stat(game, "hits") >= 1 {
            hitting_streak += 1;
        } else {
            break;
        }
    }

    let mut on_base_streak = 0;
    for game in games {
        if stat(game, "hits") + stat(game, "baseOnBalls") + stat(game, "hitByPitch") >= 1 {
            on_base_streak += 1;
        } else {
            break;
        }
    }

    let multi_hit_games = games.iter().filter(|game| stat(game, "hits") >= 2).count();

    json!({
        "games_sampled": games.len(),
        "hitting_streak": hitting_streak,
        "on_base_streak": on_base_streak,
        "multi_hit_games": multi_hit_games,
    })
}

#[derive(Deserialize)]
struct TrendsArgs {
    team_id: i64,
    count: Option<i64>,
}

/// `getMLBTeamScoringTrends`
pub(crate) async fn team_scoring_trends(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: TrendsArgs = decode_args(arguments)?;

    let count = args.count.unwrap_or(10);
    if count < 1 {
        return Err(ToolError::validation("count", "must be at least 1"));
    }

    let today = et::today();
    let start = today
        .checked_sub(TRENDS_LOOKBACK_DAYS.days())
        .map_err(|_| ToolError::Internal)?;

    let games = ctx.upstreams.mlb.schedule_window(args.team_id, start, today).await?;

    let mut finals: Vec<&Game> = games
        .iter()
        .filter(|game| game.status == GameStatus::Final)
        .collect();
    finals.sort_by(|a, b| b.date_et.cmp(&a.date_et).then_with(|| b.id.cmp(&a.id)));
    finals.truncate(count as usize);

    let lines: Vec<Value> = finals.iter().filter_map(|game| scoring_line(game, args.team_id)).collect();

    let (averages, note) = scoring_averages(&lines);

    let content = format!(
        "**MLB scoring trends for team {}**: last {} completed games",
        args.team_id,
        lines.len()
    );

    let data = json!({
        "team_id": args.team_id,
        "window_start_et": start,
        "count": lines.len(),
        "games": lines,
        "averages": averages,
    });

    let result = ToolResult::success(content, data);
    Ok(match note {
        Some(note) => result.with_note(note),
        None => result.with_note(ET_NOTE),
    })
}

fn scoring_line(game: &Game, team_id: i64) -> Option<Value> {
    let (own, opp, is_home) = if game.home.id == team_id {
        (&game.home, &game.away, true)
    } else if game.away.id == team_id {
        (&game.away, &game.home, false)
    } else {
        return None;
    };

    let scored = own.score?;
    let allowed = opp.score?;

    let result = match scored.cmp(&allowed) {
        std::cmp::Ordering::Greater => "W",
        std::cmp::Ordering::Less => "L",
        std::cmp::Ordering::Equal => "T",
    };

    Some(json!({
        "date_et": game.date_et,
        "opponent": opp.name,
        "is_home": is_home,
        "runs_scored": scored,
        "runs_allowed": allowed,
        "result": result,
    }))
}

fn scoring_averages(lines: &[Value]) -> (Value, Option<String>) {
    if lines.is_empty() {
        return (
            json!({"runs_scored": null, "runs_allowed": null, "wins": 0}),
            Some("No completed games in the window; averages are null.".to_string()),
        );
    }

    let n = lines.len() as f64;
    let sum = |key: &str| -> i64 { lines.iter().filter_map(|line| line[key].as_i64()).sum() };
    let wins = lines.iter().filter(|line| line["result"] == "W").count();

    (
        json!({
            "runs_scored": round1(sum("runs_scored") as f64 / n),
            "runs_allowed": round1(sum("runs_allowed") as f64 / n),
            "wins": wins,
        }),
        None,
    )
}
