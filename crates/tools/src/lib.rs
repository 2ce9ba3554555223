//! Tool handlers and the JSON-RPC dispatch layer.
//!
//! Every public tool is a named handler over a shared [`ToolContext`]. The
//! router decodes `tools/call` requests, dispatches by tool name and wraps
//! each handler outcome in the [`result::ToolResult`] envelope. Handlers
//! share no mutable state; everything they need rides in the context built
//! once at startup.

mod analysis;
pub mod error;
mod fanout;
mod mlb;
mod odds;
pub mod result;
pub mod rpc;
mod soccer;

use std::time::Duration;

use config::{Config, ProbabilityPattern};
use serde_json::Value;
use upstream::Upstreams;

pub use error::ToolError;
pub use result::ToolResult;
pub use rpc::router;

/// Shared, immutable state for every tool handler.
pub struct ToolContext {
    /// Provider clients over the process-wide fetch layer.
    pub upstreams: Upstreams,
    /// Overall deadline for one tool call.
    pub deadline: Duration,
    /// Pattern used to pull probabilities out of expert replies.
    pub probability_pattern: ProbabilityPattern,
}

impl ToolContext {
    /// Wire the context from configuration. Called once at startup.
    pub fn new(config: &Config) -> Self {
        Self {
            upstreams: Upstreams::new(config),
            deadline: config.limits.request_deadline,
            probability_pattern: config.experts.probability_pattern.clone(),
        }
    }
}

/// The stable public tool registry.
pub const TOOL_NAMES: [&str; 20] = [
    "getMLBScheduleET",
    "getMLBTeams",
    "getMLBTeamRoster",
    "getMLBPlayerLastN",
    "getMLBPitcherMatchup",
    "getMLBTeamForm",
    "getMLBPlayerStreaks",
    "getMLBTeamScoringTrends",
    "getCompetitions",
    "getCompetitionMatches",
    "getCompetitionStandings",
    "getCompetitionTeams",
    "getTeamMatches",
    "getMatchDetails",
    "getTopScorers",
    "getOdds",
    "getEventOdds",
    "getCustomChronulusAnalysis",
    "getCustomChronulusHealth",
    "testCustomChronulus",
];

/// Whether `name` is a registered tool.
pub fn is_known_tool(name: &str) -> bool {
    TOOL_NAMES.contains(&name)
}

/// Run one tool under the per-request deadline and collapse every
/// handler-level failure into an `ok=false` result.
pub async fn run_tool(ctx: &ToolContext, name: &str, arguments: Value) -> ToolResult {
    let deadline = ctx.deadline;

    match tokio::time::timeout(deadline, dispatch(ctx, name, arguments)).await {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            if matches!(err, ToolError::Internal) {
                log::error!("tool `{name}` hit an internal error");
            }

            ToolResult::failure(&err)
        }
        // Partial fan-out results die with the future; the caller gets a
        // clean top-level timeout instead.
        Err(_) => ToolResult::failure(&ToolError::Timeout {
            seconds: deadline.as_secs(),
        }),
    }
}

async fn dispatch(ctx: &ToolContext, name: &str, arguments: Value) -> error::Result<ToolResult> {
    match name {
        "getMLBScheduleET" => mlb::schedule(ctx, arguments).await,
        "getMLBTeams" => mlb::teams(ctx, arguments).await,
        "getMLBTeamRoster" => mlb::roster(ctx, arguments).await,
        "getMLBPlayerLastN" => mlb::player_last_n(ctx, arguments).await,
        "getMLBPitcherMatchup" => mlb::pitcher_matchup(ctx, arguments).await,
        "getMLBTeamForm" => mlb::team_form(ctx, arguments).await,
        "getMLBPlayerStreaks" => mlb::player_streaks(ctx, arguments).await,
        "getMLBTeamScoringTrends" => mlb::team_scoring_trends(ctx, arguments).await,
        "getCompetitions" => soccer::competitions(ctx, arguments).await,
        "getCompetitionMatches" => soccer::competition_matches(ctx, arguments).await,
        "getCompetitionStandings" => soccer::competition_standings(ctx, arguments).await,
        "getCompetitionTeams" => soccer::competition_teams(ctx, arguments).await,
        "getTeamMatches" => soccer::team_matches(ctx, arguments).await,
        "getMatchDetails" => soccer::match_details(ctx, arguments).await,
        "getTopScorers" => soccer::top_scorers(ctx, arguments).await,
        "getOdds" => odds::odds(ctx, arguments).await,
        "getEventOdds" => odds::event_odds(ctx, arguments).await,
        "getCustomChronulusAnalysis" => analysis::chronulus_analysis(ctx, arguments).await,
        "getCustomChronulusHealth" => analysis::chronulus_health(ctx, arguments).await,
        "testCustomChronulus" => analysis::chronulus_test(ctx, arguments).await,
        _ => Err(ToolError::Internal),
    }
}
