//! Odds tool handlers: sport-wide odds pass-through and per-event player
//! props with Over/Under pairing.

use serde::Deserialize;
use serde_json::{Value, json};
use upstream::provider::odds::pair_prop_lines;

use crate::{
    ToolContext,
    error::{Result, ToolError, decode_args},
    result::ToolResult,
};

const DEFAULT_MARKETS: &str = "h2h,spreads,totals";
const DEFAULT_REGIONS: &str = "us";

fn validate_odds_format(raw: &Option<String>) -> Result<String> {
    match raw.as_deref() {
        None => Ok("decimal".to_string()),
        Some(format @ ("decimal" | "american")) => Ok(format.to_string()),
        Some(other) => Err(ToolError::validation(
            "odds_format",
            format!("`{other}` is not one of `decimal`, `american`"),
        )),
    }
}

#[derive(Deserialize)]
struct OddsArgs {
    sport: String,
    markets: Option<String>,
    regions: Option<String>,
    odds_format: Option<String>,
}

/// `getOdds`
pub(crate) async fn odds(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: OddsArgs = decode_args(arguments)?;

    if args.sport.trim().is_empty() {
        return Err(ToolError::validation("sport", "must not be empty"));
    }

    let markets = args.markets.unwrap_or_else(|| DEFAULT_MARKETS.to_string());
    let regions = args.regions.unwrap_or_else(|| DEFAULT_REGIONS.to_string());
    let odds_format = validate_odds_format(&args.odds_format)?;

    let events = ctx
        .upstreams
        .odds
        .sport_odds(&args.sport, &regions, &markets, &odds_format)
        .await?;

    let count = events.len();
    let data = json!({
        "sport": args.sport,
        "markets": markets,
        "regions": regions,
        "odds_format": odds_format,
        "count": count,
        "events": events,
    });

    Ok(ToolResult::success(
        format!("**Odds for {}**: {count} events", args.sport),
        data,
    )
    .with_note("commence_time is the provider's UTC instant."))
}

#[derive(Deserialize)]
struct EventOddsArgs {
    sport: String,
    event_id: String,
    markets: String,
    regions: Option<String>,
    odds_format: Option<String>,
}

/// `getEventOdds`
pub(crate) async fn event_odds(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: EventOddsArgs = decode_args(arguments)?;

    if args.sport.trim().is_empty() {
        return Err(ToolError::validation("sport", "must not be empty"));
    }
    if args.event_id.trim().is_empty() {
        return Err(ToolError::validation("event_id", "must not be empty"));
    }
    if args.markets.trim().is_empty() {
        return Err(ToolError::validation("markets", "must not be empty"));
    }

    let regions = args.regions.unwrap_or_else(|| DEFAULT_REGIONS.to_string());
    let odds_format = validate_odds_format(&args.odds_format)?;

    let event = ctx
        .upstreams
        .odds
        .event_odds(&args.sport, &args.event_id, &regions, &args.markets, &odds_format)
        .await?;

    let lines = pair_prop_lines(&event);

    let count = lines.len();
    let content = format!(
        "**{} @ {}**: {count} paired prop lines",
        event.away_team, event.home_team
    );

    let data = json!({
        "event_id": event.event_id,
        "commence_time": event.commence_time,
        "home_team": event.home_team,
        "away_team": event.away_team,
        "markets": args.markets,
        "count": count,
        "lines": lines,
    });

    Ok(ToolResult::success(content, data)
        .with_note("Outcomes without an Over/Under counterpart are dropped."))
}
