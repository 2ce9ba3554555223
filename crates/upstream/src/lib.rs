//! Upstream aggregation layer: HTTP fetch with retry/backoff, ET time
//! normalization, and one client + normalizer per sports data provider.
//!
//! Everything outbound flows through a single [`FetchClient`] carrying the
//! process-wide concurrency semaphore, so the cap covers MLB, soccer, odds
//! and expert traffic alike.

mod cache;
pub mod coerce;
pub mod error;
pub mod et;
mod http;
pub mod model;
pub mod provider;
pub mod retry;

pub use error::{Result, UpstreamError};
pub use http::FetchClient;

use provider::{
    experts::ExpertClient, football_data::FootballDataClient, mlb::MlbClient, odds::OddsClient,
    soccerdata::SoccerDataClient,
};

/// Every provider client, built once at startup and shared by reference.
#[derive(Clone)]
pub struct Upstreams {
    /// MLB Stats API.
    pub mlb: MlbClient,
    /// Football-Data.org.
    pub football: FootballDataClient,
    /// SoccerDataAPI.
    pub soccerdata: SoccerDataClient,
    /// The Odds API.
    pub odds: OddsClient,
    /// Chat-completion endpoint for the expert panel.
    pub experts: ExpertClient,
}

impl Upstreams {
    /// Wire every provider client to the shared fetch layer.
    pub fn new(config: &config::Config) -> Self {
        let fetch = FetchClient::new(&config.limits, &config.upstreams.cache);

        Self {
            mlb: MlbClient::new(fetch.clone(), &config.upstreams.mlb),
            football: FootballDataClient::new(fetch.clone(), &config.upstreams.football_data),
            soccerdata: SoccerDataClient::new(fetch.clone(), &config.upstreams.soccerdata),
            odds: OddsClient::new(fetch.clone(), &config.upstreams.odds),
            experts: ExpertClient::new(fetch, &config.experts),
        }
    }
}
