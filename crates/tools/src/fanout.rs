//! Concurrent fan-out over entity ids.
//!
//! Collects `(id, Result)` pairs into disjoint results/errors maps keyed by
//! the id's string form; their key sets always union to the requested ids.
//! Concurrency is bounded at the HTTP layer by the process-wide semaphore,
//! so callers just hand over the whole id list.

use std::{collections::BTreeMap, future::Future};

use serde_json::Value;

use crate::error::ToolError;

pub(crate) async fn fan_out<F, Fut>(ids: &[i64], per_id: F) -> (BTreeMap<String, Value>, BTreeMap<String, String>)
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<Value, ToolError>>,
{
    let tasks = ids.iter().map(|&id| {
        let fut = per_id(id);
        async move { (id, fut.await) }
    });

    let mut results = BTreeMap::new();
    let mut errors = BTreeMap::new();

    for (id, outcome) in futures::future::join_all(tasks).await {
        match outcome {
            Ok(value) => {
                results.insert(id.to_string(), value);
            }
            Err(err) => {
                errors.insert(id.to_string(), err.to_string());
            }
        }
    }

    (results, errors)
}
