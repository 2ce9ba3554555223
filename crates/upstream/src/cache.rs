//! Optional same-day response cache.
//!
//! Keyed by full request URL, holding only 2xx JSON bodies, with a TTL the
//! configuration clamps to at most five minutes. Off by default.

use std::{sync::Arc, time::Duration};

use mini_moka::sync::Cache;
use serde_json::Value;

const MAX_ENTRIES: u64 = 1_000;

#[derive(Clone)]
pub(crate) struct UrlCache {
    cache: Cache<String, Arc<Value>>,
}

impl UrlCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub(crate) fn get(&self, url: &str) -> Option<Arc<Value>> {
        self.cache.get(&url.to_string())
    }

    pub(crate) fn insert(&self, url: &str, body: Arc<Value>) {
        self.cache.insert(url.to_string(), body);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn round_trips_by_full_url() {
        let cache = UrlCache::new(Duration::from_secs(60));
        let url = "https://statsapi.mlb.com/api/v1/schedule?sportId=1&date=2025-08-13";

        cache.insert(url, Arc::new(json!({"dates": []})));

        assert!(cache.get(url).is_some());
        // A different query string is a different entry.
        assert!(cache.get("https://statsapi.mlb.com/api/v1/schedule?sportId=1&date=2025-08-14").is_none());
    }
}
