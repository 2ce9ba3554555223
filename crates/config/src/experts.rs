//! Expert consensus (LLM) settings.

use std::{borrow::Cow, fmt};

use regex::{Regex, RegexBuilder};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

/// Settings for the expert-panel analysis tools. The persona prompts are
/// compiled in; configuration selects the endpoint, model and the pattern
/// used to pull a probability out of each expert's reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpertsConfig {
    /// Base URL of an OpenAI-compatible chat completions API.
    pub base_url: String,
    /// Bearer key for the endpoint. Normally injected from `LLM_API_KEY`.
    pub api_key: Option<SecretString>,
    /// Model identifier passed through to the endpoint.
    pub model: String,
    /// Sampling temperature for expert calls.
    pub temperature: f64,
    /// Pattern used to extract a probability from an expert reply. The
    /// first capture group must match the numeric token.
    pub probability_pattern: ProbabilityPattern,
}

impl Default for ExpertsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            model: "anthropic/claude-3-5-haiku".to_string(),
            temperature: 0.7,
            probability_pattern: ProbabilityPattern::default(),
        }
    }
}

/// Validated, case-insensitive regex used for probability extraction.
#[derive(Clone)]
pub struct ProbabilityPattern {
    regex: Regex,
}

const DEFAULT_PROBABILITY_PATTERN: &str = r"(?i)probability[^0-9]*(0?\.\d+|[01](?:\.\d+)?)";

impl ProbabilityPattern {
    fn new(pattern: &str) -> Result<Self, String> {
        let trimmed = pattern.trim();

        if trimmed.is_empty() {
            return Err("probability_pattern cannot be empty".to_string());
        }

        let regex = RegexBuilder::new(trimmed)
            .case_insensitive(true)
            .build()
            .map_err(|err| format!("invalid probability_pattern regex: {err}"))?;

        if regex.captures_len() < 2 {
            return Err("probability_pattern must contain one capture group".to_string());
        }

        Ok(Self { regex })
    }

    /// The original pattern string.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The compiled regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Default for ProbabilityPattern {
    fn default() -> Self {
        Self::new(DEFAULT_PROBABILITY_PATTERN).expect("default probability pattern must compile")
    }
}

impl fmt::Debug for ProbabilityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbabilityPattern")
            .field("pattern", &self.pattern())
            .finish()
    }
}

impl<'de> Deserialize<'de> for ProbabilityPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pattern = Cow::<'de, str>::deserialize(deserializer)?;
        ProbabilityPattern::new(pattern.as_ref()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pattern_finds_marked_probability() {
        let pattern = ProbabilityPattern::default();
        let captures = pattern
            .regex()
            .captures("Final assessment. PROBABILITY: 0.62 for the home side.")
            .unwrap();

        assert_eq!(&captures[1], "0.62");
    }

    #[test]
    fn pattern_without_capture_group_is_rejected() {
        let err = toml::from_str::<ExpertsConfig>(r"probability_pattern = '0\.\d+'").unwrap_err();

        assert!(err.to_string().contains("capture group"));
    }
}
