//! Expert-panel analysis tools (the custom Chronulus engine).
//!
//! Each configured persona gets one chat-completion request embedding the
//! caller's `game_data`; a probability is pulled out of every reply and the
//! surviving opinions collapse into a Beta consensus.

use std::collections::BTreeMap;

use consensus::{BetaConsensus, ExpertOpinion};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    ToolContext,
    error::{Result, ToolError, decode_args},
    result::ToolResult,
};

const SERVICE_NAME: &str = "custom-chronulus";

const MIN_EXPERTS: i64 = 1;
const MAX_EXPERTS: i64 = 5;
const DEFAULT_EXPERTS: i64 = 2;

/// Persona order is part of the tool contract: the first `expert_count`
/// entries are consulted.
const PERSONAS: &[(&str, &str)] = &[
    (
        "statistical",
        "a quantitative analyst who trusts season-long rates, park effects and regression to the mean over narratives",
    ),
    (
        "situational",
        "a scout focused on matchups, rest, travel, lineup news and bullpen availability for this specific game",
    ),
    (
        "contrarian",
        "a skeptic who hunts for reasons the public side is overvalued and fades consensus narratives",
    ),
    (
        "sharp",
        "a professional bettor who thinks in closing-line value, market efficiency and bankroll discipline",
    ),
    (
        "market",
        "a market analyst who reads line movement, liquidity and where informed money has been landing",
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Depth {
    Brief,
    Standard,
    Comprehensive,
}

impl Depth {
    fn parse(raw: Option<&str>) -> Result<Self> {
        match raw {
            None | Some("standard") => Ok(Self::Standard),
            Some("brief") => Ok(Self::Brief),
            Some("comprehensive") => Ok(Self::Comprehensive),
            Some(other) => Err(ToolError::validation(
                "depth",
                format!("`{other}` is not one of `brief`, `standard`, `comprehensive`"),
            )),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Standard => "standard",
            Self::Comprehensive => "comprehensive",
        }
    }

    fn length_hint(self) -> &'static str {
        match self {
            Self::Brief => "at most 80 words",
            Self::Standard => "at most 150 words",
            Self::Comprehensive => "at most 300 words",
        }
    }

    fn max_tokens(self) -> u32 {
        match self {
            Self::Brief => 300,
            Self::Standard => 600,
            Self::Comprehensive => 1200,
        }
    }
}

fn build_prompt(persona: &str, preamble: &str, game_data: &Value, depth: Depth) -> String {
    let rendered = serde_json::to_string_pretty(game_data).unwrap_or_else(|_| game_data.to_string());

    format!(
        "You are {preamble}. Your persona: {persona} expert.\n\n\
         Assess the probability that the HOME side wins the matchup below.\n\n\
         Game data:\n{rendered}\n\n\
         Reply in {hint}, then end with a final line of exactly this form:\n\
         PROBABILITY: 0.XX",
        hint = depth.length_hint(),
    )
}

/// Pull the first probability token out of a reply; the rest is reasoning.
fn extract_opinion(pattern: &Regex, text: &str) -> Option<(f64, String)> {
    let captures = pattern.captures(text)?;
    let token = captures.get(1)?;
    let probability: f64 = token.as_str().parse().ok()?;

    if !(0.0..=1.0).contains(&probability) {
        return None;
    }

    let full = captures.get(0)?;
    let reasoning = format!("{}{}", &text[..full.start()], &text[full.end()..])
        .trim()
        .to_string();

    Some((probability.clamp(0.01, 0.99), reasoning))
}

async fn run_panel(
    ctx: &ToolContext,
    game_data: &Value,
    expert_count: usize,
    depth: Depth,
) -> (Vec<ExpertOpinion>, BTreeMap<String, String>) {
    let pattern = ctx.probability_pattern.regex();

    let tasks = PERSONAS.iter().take(expert_count).enumerate().map(|(index, (persona, preamble))| {
        let expert_id = format!("expert_{}", index + 1);
        let prompt = build_prompt(persona, preamble, game_data, depth);

        async move {
            match ctx.upstreams.experts.complete(&prompt, depth.max_tokens()).await {
                Ok(text) => match extract_opinion(pattern, &text) {
                    Some((probability, reasoning)) => Ok(ExpertOpinion {
                        expert_id,
                        persona: persona.to_string(),
                        probability,
                        reasoning,
                    }),
                    None => Err((expert_id, "no probability found in reply".to_string())),
                },
                Err(err) => Err((expert_id, err.to_string())),
            }
        }
    });

    let mut opinions = Vec::new();
    let mut errors = BTreeMap::new();

    for outcome in futures::future::join_all(tasks).await {
        match outcome {
            Ok(opinion) => opinions.push(opinion),
            Err((expert_id, message)) => {
                errors.insert(expert_id, message);
            }
        }
    }

    (opinions, errors)
}

fn summarize(consensus: &BetaConsensus) -> String {
    match consensus.edge {
        Some(edge) => format!(
            "**Expert consensus**: mean {:.1}%, edge {:+.1}%, {}",
            consensus.mean * 100.0,
            edge * 100.0,
            consensus.recommendation.as_str(),
        ),
        None => format!(
            "**Expert consensus**: mean {:.1}%, {}",
            consensus.mean * 100.0,
            consensus.recommendation.as_str(),
        ),
    }
}

#[derive(Deserialize)]
struct AnalysisArgs {
    game_data: Value,
    expert_count: Option<i64>,
    depth: Option<String>,
    market_prob: Option<f64>,
}

async fn analyze(ctx: &ToolContext, args: AnalysisArgs) -> Result<ToolResult> {
    if !args.game_data.is_object() {
        return Err(ToolError::validation("game_data", "must be an object"));
    }

    let requested = args.expert_count.unwrap_or(DEFAULT_EXPERTS);
    if !(MIN_EXPERTS..=MAX_EXPERTS).contains(&requested) {
        return Err(ToolError::validation(
            "expert_count",
            format!("must be between {MIN_EXPERTS} and {MAX_EXPERTS}"),
        ));
    }

    let depth = Depth::parse(args.depth.as_deref())?;

    if let Some(market_prob) = args.market_prob
        && (market_prob <= 0.0 || market_prob >= 1.0)
    {
        return Err(ToolError::validation("market_prob", "must be within (0, 1)"));
    }

    let market_prob = args
        .market_prob
        .or_else(|| args.game_data.get("market_implied_prob").and_then(Value::as_f64))
        .filter(|p| *p > 0.0 && *p < 1.0);

    let (opinions, errors) = run_panel(ctx, &args.game_data, requested as usize, depth).await;

    if opinions.is_empty() {
        return Err(ToolError::Consensus(format!("all {requested} expert calls failed")));
    }

    let consensus = consensus::consensus(&opinions, market_prob);
    let content = summarize(&consensus);
    let effective = opinions.len();

    let data = json!({
        "consensus": consensus,
        "experts": opinions,
        "errors": errors,
        "market_prob": market_prob,
        "model": ctx.upstreams.experts.model(),
        "depth": depth.as_str(),
        "expert_count_requested": requested,
        "expert_count_effective": effective,
    });

    let result = ToolResult::success(content, data);
    Ok(if effective < requested as usize {
        result.with_note(format!("Only {effective} of {requested} experts responded."))
    } else {
        result
    })
}

/// `getCustomChronulusAnalysis`
pub(crate) async fn chronulus_analysis(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let args: AnalysisArgs = decode_args(arguments)?;

    analyze(ctx, args).await
}

#[derive(Deserialize)]
struct EmptyArgs {}

/// `getCustomChronulusHealth`
pub(crate) async fn chronulus_health(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let _: EmptyArgs = decode_args(arguments)?;

    let configured = ctx.upstreams.experts.is_configured();

    let content = if configured {
        format!("**{SERVICE_NAME}**: ready")
    } else {
        format!("**{SERVICE_NAME}**: no LLM key configured")
    };

    let data = json!({
        "service": SERVICE_NAME,
        "model": ctx.upstreams.experts.model(),
        "personas": PERSONAS.len(),
        "endpoint_configured": configured,
        "probability_pattern": ctx.probability_pattern.pattern(),
    });

    Ok(ToolResult::success(content, data))
}

/// `testCustomChronulus`
pub(crate) async fn chronulus_test(ctx: &ToolContext, arguments: Value) -> Result<ToolResult> {
    let _: EmptyArgs = decode_args(arguments)?;

    let args = AnalysisArgs {
        game_data: sample_game_data(),
        expert_count: Some(2),
        depth: Some("brief".to_string()),
        market_prob: None,
    };

    let result = analyze(ctx, args).await?;

    Ok(result.with_note("Self-test: exercised live expert calls with built-in sample data."))
}

fn sample_game_data() -> Value {
    json!({
        "sport": "baseball_mlb",
        "home_team": "New York Mets",
        "away_team": "Atlanta Braves",
        "home_record": "68-52",
        "away_record": "64-56",
        "home_starter": {"name": "RHP, ERA 3.12 over last 5 starts"},
        "away_starter": {"name": "LHP, ERA 4.05 over last 5 starts"},
        "market_implied_prob": 0.55,
    })
}
