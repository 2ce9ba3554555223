//! Beta-distribution consensus over a panel of expert probability estimates.
//!
//! The engine is pure: it takes the opinions that survived expert calls and
//! an optional market-implied probability, fits a Beta distribution by the
//! method of moments and derives a betting recommendation from the edge
//! between the consensus mean and the market. No I/O, no clocks.

#![deny(missing_docs)]

use serde::Serialize;

/// Variance floor keeping the Beta fit numerically sane.
const VARIANCE_FLOOR: f64 = 1e-6;

/// Fixed prior variance used when only a single expert responded.
const SINGLE_EXPERT_VARIANCE: f64 = 0.01;

/// Edge below which no position is worth taking.
const PASS_THRESHOLD: f64 = 0.03;

/// Edge at which a lean becomes a bet.
const BET_THRESHOLD: f64 = 0.06;

/// One expert's probability estimate with its reasoning.
#[derive(Debug, Clone, Serialize)]
pub struct ExpertOpinion {
    /// Stable identifier within one analysis (`expert_1`, ...).
    pub expert_id: String,
    /// Persona that produced the estimate.
    pub persona: String,
    /// Probability of the home outcome, already clamped to `[0.01, 0.99]`.
    pub probability: f64,
    /// Free-text justification returned by the expert.
    pub reasoning: String,
}

/// Betting recommendation derived from the consensus-vs-market edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    /// Edge too small to act on.
    #[serde(rename = "PASS")]
    Pass,
    /// Modest positive edge on the home side.
    #[serde(rename = "LEAN HOME")]
    LeanHome,
    /// Modest negative edge, the away side is the value.
    #[serde(rename = "LEAN AWAY")]
    LeanAway,
    /// Strong positive edge on the home side.
    #[serde(rename = "BET HOME")]
    BetHome,
    /// Strong negative edge, bet the away side.
    #[serde(rename = "BET AWAY")]
    BetAway,
    /// No market probability supplied; the mean is informational only.
    #[serde(rename = "INFO ONLY")]
    InfoOnly,
}

impl Recommendation {
    /// The wire rendering, also used in human summaries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::LeanHome => "LEAN HOME",
            Self::LeanAway => "LEAN AWAY",
            Self::BetHome => "BET HOME",
            Self::BetAway => "BET AWAY",
            Self::InfoOnly => "INFO ONLY",
        }
    }
}

/// Beta-distribution summary of a panel of expert opinions.
#[derive(Debug, Clone, Serialize)]
pub struct BetaConsensus {
    /// Consensus probability (arithmetic mean of expert estimates).
    pub mean: f64,
    /// Clamped variance actually used for the fit.
    pub variance: f64,
    /// Beta alpha parameter, always positive.
    pub alpha: f64,
    /// Beta beta parameter, always positive.
    pub beta: f64,
    /// Signed consensus-minus-market edge, when a market was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<f64>,
    /// The derived recommendation.
    pub recommendation: Recommendation,
}

/// Collapse a non-empty set of expert opinions into a [`BetaConsensus`].
///
/// # Panics
///
/// Panics if `opinions` is empty; the caller guarantees at least one expert
/// succeeded before invoking the engine.
pub fn consensus(opinions: &[ExpertOpinion], market_prob: Option<f64>) -> BetaConsensus {
    assert!(!opinions.is_empty(), "consensus requires at least one opinion");

    let n = opinions.len() as f64;
    let mean = opinions.iter().map(|o| o.probability).sum::<f64>() / n;

    let raw_variance = if opinions.len() >= 2 {
        opinions
            .iter()
            .map(|o| (o.probability - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0)
    } else {
        SINGLE_EXPERT_VARIANCE
    };

    // Keep the variance strictly inside (0, mean(1-mean)) so both Beta
    // parameters stay positive.
    let ceiling = (mean * (1.0 - mean) - 1e-9).max(VARIANCE_FLOOR);
    let variance = raw_variance.clamp(VARIANCE_FLOOR, ceiling);

    let factor = mean * (1.0 - mean) / variance - 1.0;
    let alpha = mean * factor;
    let beta = (1.0 - mean) * factor;

    let edge = market_prob.map(|market| mean - market);
    let recommendation = match edge {
        None => Recommendation::InfoOnly,
        Some(edge) if edge.abs() < PASS_THRESHOLD => Recommendation::Pass,
        Some(edge) if edge.abs() < BET_THRESHOLD => {
            if edge > 0.0 {
                Recommendation::LeanHome
            } else {
                Recommendation::LeanAway
            }
        }
        Some(edge) if edge > 0.0 => Recommendation::BetHome,
        Some(_) => Recommendation::BetAway,
    };

    BetaConsensus {
        mean,
        variance,
        alpha,
        beta,
        edge,
        recommendation,
    }
}
