//! The Odds API v4 client and normalizer. Query-key auth.
//!
//! Odds payloads are shaped, not aggregated: `commence_time` stays in the
//! provider's UTC rendering, the one deliberate exception to the ET rule.

mod input;

use config::OddsApiConfig;
use reqwest::Url;
use secrecy::SecretString;

use self::input::RawEvent;
use crate::{
    error::{Result, UpstreamError},
    http::{Auth, FetchClient, decode},
    model::{Bookmaker, Market, OddsEvent, Outcome, PropLine},
};

/// Client for api.the-odds-api.com.
#[derive(Clone)]
pub struct OddsClient {
    fetch: FetchClient,
    base_url: String,
    api_key: Option<SecretString>,
}

impl OddsClient {
    pub(crate) fn new(fetch: FetchClient, config: &OddsApiConfig) -> Self {
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
            .ok_or(UpstreamError::Credential { provider: "odds-api" })?;

        let mut url = Url::parse(&format!("{}{path}", self.base_url)).map_err(|_| UpstreamError::Transient {
            reason: format!("invalid upstream URL for {path}"),
        })?;
        url.query_pairs_mut().extend_pairs(query);

        let value = self.fetch.get_json(url, Auth::Query("apiKey", key)).await?;

        decode(value)
    }

    /// Event-level odds for one sport.
    pub async fn sport_odds(
        &self,
        sport: &str,
        regions: &str,
        markets: &str,
        odds_format: &str,
    ) -> Result<Vec<OddsEvent>> {
        let raw: Vec<RawEvent> = self
            .get(
                &format!("/sports/{sport}/odds"),
                &[
                    ("regions", regions.to_string()),
                    ("markets", markets.to_string()),
                    ("oddsFormat", odds_format.to_string()),
                    ("dateFormat", "iso".to_string()),
                ],
            )
            .await?;

        Ok(raw.into_iter().map(normalize_event).collect())
    }

    /// Odds for a single event, the endpoint that carries player props.
    pub async fn event_odds(
        &self,
        sport: &str,
        event_id: &str,
        regions: &str,
        markets: &str,
        odds_format: &str,
    ) -> Result<OddsEvent> {
        let raw: RawEvent = self
            .get(
                &format!("/sports/{sport}/events/{event_id}/odds"),
                &[
                    ("regions", regions.to_string()),
                    ("markets", markets.to_string()),
                    ("oddsFormat", odds_format.to_string()),
                    ("dateFormat", "iso".to_string()),
                ],
            )
            .await?;

        Ok(normalize_event(raw))
    }
}

fn normalize_event(raw: RawEvent) -> OddsEvent {
    OddsEvent {
        event_id: raw.id,
        sport_key: raw.sport_key,
        commence_time: raw.commence_time,
        home_team: raw.home_team,
        away_team: raw.away_team,
        bookmakers: raw
            .bookmakers
            .into_iter()
            .map(|bookmaker| Bookmaker {
                title: bookmaker.title.unwrap_or_else(|| bookmaker.key.clone()),
                key: bookmaker.key,
                last_update: bookmaker.last_update,
                markets: bookmaker
                    .markets
                    .into_iter()
                    .map(|market| Market {
                        key: market.key,
                        outcomes: market
                            .outcomes
                            .into_iter()
                            .map(|outcome| Outcome {
                                name: outcome.name,
                                price: outcome.price,
                                point: outcome.point,
                                description: outcome.description,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

/// Pair Over/Under outcomes per `(player, market)` group per bookmaker.
/// Outcomes without a counterpart are dropped.
pub fn pair_prop_lines(event: &OddsEvent) -> Vec<PropLine> {
    let mut lines = Vec::new();

    for bookmaker in &event.bookmakers {
        for market in &bookmaker.markets {
            let mut overs: Vec<&Outcome> = Vec::new();
            let mut unders: Vec<&Outcome> = Vec::new();

            for outcome in &market.outcomes {
                match outcome.name.as_str() {
                    "Over" => overs.push(outcome),
                    "Under" => unders.push(outcome),
                    _ => {}
                }
            }

            for over in overs {
                let player = over.description.as_deref().unwrap_or_default();
                let Some(under) = unders
                    .iter()
                    .find(|under| under.description.as_deref().unwrap_or_default() == player)
                else {
                    continue;
                };

                lines.push(PropLine {
                    player: player.to_string(),
                    market: market.key.clone(),
                    bookmaker: bookmaker.key.clone(),
                    over_price: over.price,
                    over_point: over.point,
                    under_price: under.price,
                    under_point: under.point,
                });
            }
        }
    }

    lines
}
