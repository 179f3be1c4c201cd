use std::collections::HashMap;
use std::time::Instant;

use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use chronotope_core::model::{ChartMap, ChronotopeNode, Dataset, Group, Segment};

use crate::registry::{SourceError, SourceKey, SourceRegistry};

/// Concurrency ceiling: at most this many source operations are logically
/// in flight at once, regardless of registry size.
pub const MAX_IN_FLIGHT: usize = 4;

#[derive(Debug, Error)]
pub enum FetchError {
    /// An individual source operation rejected.
    #[error("source `{key}` failed: {source}")]
    Source { key: SourceKey, source: SourceError },

    /// A source settled but its payload does not match the expected shape.
    #[error("source `{key}` returned a malformed payload: {source}")]
    Decode {
        key: SourceKey,
        source: serde_json::Error,
    },

    /// A registry entry produced no result.
    #[error("source `{key}` produced no result")]
    MissingSource { key: SourceKey },

    /// All sources settled but the merged dataset failed the completeness
    /// check (missing creation instant, or an empty collection). The call
    /// site cannot tell which source was deficient, by design.
    #[error("merged dataset is incomplete")]
    IncompleteDataset,
}

/// Run every registry entry to completion and merge the results into a
/// validated [`Dataset`].
///
/// All-or-nothing: the first source failure, any malformed payload, and an
/// incomplete merged dataset each fail the whole call — a partial dataset
/// is never returned. No retries, no timeout; a hung source stalls the
/// fetch.
pub async fn fetch_all(registry: &SourceRegistry) -> Result<Dataset, FetchError> {
    info!("fetching chronotope sources");
    let started = Instant::now();

    // Worker pool: entries are pulled through a bounded buffer, so at most
    // MAX_IN_FLIGHT operations are pending at once and a freed slot takes
    // the next pending source. Each result is tagged with its key, making
    // the merge below independent of completion order.
    let mut results: HashMap<SourceKey, Value> = stream::iter(registry.entries())
        .map(|entry| async move {
            let value = entry
                .operation
                .call()
                .await
                .map_err(|source| FetchError::Source {
                    key: entry.key,
                    source,
                })?;
            Ok::<_, FetchError>((entry.key, value))
        })
        .buffer_unordered(MAX_IN_FLIGHT)
        .try_collect()
        .await?;

    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "all sources settled"
    );

    // Re-validate each payload's shape at the boundary rather than trusting
    // it downstream.
    let dataset = Dataset {
        map: take_decoded::<ChartMap>(&mut results, SourceKey::Map)?,
        groups: take_decoded::<Vec<Group>>(&mut results, SourceKey::Groups)?,
        segments: take_decoded::<Vec<Segment>>(&mut results, SourceKey::Segments)?,
        chronotope: take_decoded::<Vec<ChronotopeNode>>(&mut results, SourceKey::Chronotope)?,
    };

    if !dataset.is_complete() {
        return Err(FetchError::IncompleteDataset);
    }

    info!(
        groups = dataset.groups.len(),
        segments = dataset.segments.len(),
        nodes = dataset.chronotope.len(),
        "dataset merged"
    );
    Ok(dataset)
}

fn take_decoded<T: DeserializeOwned>(
    results: &mut HashMap<SourceKey, Value>,
    key: SourceKey,
) -> Result<T, FetchError> {
    let value = results
        .remove(&key)
        .ok_or(FetchError::MissingSource { key })?;
    serde_json::from_value(value).map_err(|source| FetchError::Decode { key, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FnSource;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn map_payload() -> Value {
        json!({
            "identification": 1,
            "name": "demo",
            "description": "",
            "type": "chronotope",
            "created_at": "2022-01-01T00:00:00Z",
            "num_nodes": 1,
            "num_groups": 1,
            "num_segments": 1
        })
    }

    fn groups_payload() -> Value {
        json!([{
            "identification": 1,
            "group_no": 1,
            "name": "alpha",
            "description": "",
            "position": 0,
            "hexadecimal": "1d3557",
            "num_segments": 1,
            "num_nodes": 1
        }])
    }

    fn segments_payload() -> Value {
        json!([{
            "identification": 10,
            "segment_no": 10,
            "group_no": 1,
            "name": "alpha-1",
            "position": 0,
            "hexadecimal": "e63946",
            "num_nodes": 1
        }])
    }

    fn chronotope_payload() -> Value {
        json!([{
            "node_id": "n-1",
            "message_id": "m-1",
            "hit_time": "2022-01-02T00:00:00Z",
            "segment_no": 10
        }])
    }

    fn serve(payload: Value) -> FnSource<impl Fn() -> std::future::Ready<Result<Value, SourceError>> + Send + Sync> {
        FnSource(move || std::future::ready(Ok(payload.clone())))
    }

    #[tokio::test]
    async fn merges_all_four_sources() {
        let registry = SourceRegistry::new(
            serve(map_payload()),
            serve(groups_payload()),
            serve(segments_payload()),
            serve(chronotope_payload()),
        );
        let dataset = fetch_all(&registry).await.unwrap();
        assert_eq!(dataset.map.name, "demo");
        assert_eq!(dataset.groups.len(), 1);
        assert_eq!(dataset.segments.len(), 1);
        assert_eq!(dataset.chronotope.len(), 1);
    }

    #[tokio::test]
    async fn empty_chronotope_fails_the_whole_fetch() {
        let registry = SourceRegistry::new(
            serve(map_payload()),
            serve(groups_payload()),
            serve(segments_payload()),
            serve(json!([])),
        );
        let err = fetch_all(&registry).await.unwrap_err();
        assert!(matches!(err, FetchError::IncompleteDataset));
    }

    #[tokio::test]
    async fn missing_creation_instant_fails_the_whole_fetch() {
        let mut map = map_payload();
        map.as_object_mut().unwrap().remove("created_at");
        let registry = SourceRegistry::new(
            serve(map),
            serve(groups_payload()),
            serve(segments_payload()),
            serve(chronotope_payload()),
        );
        let err = fetch_all(&registry).await.unwrap_err();
        assert!(matches!(err, FetchError::IncompleteDataset));
    }

    #[tokio::test]
    async fn source_rejection_names_the_failing_key() {
        let registry = SourceRegistry::new(
            serve(map_payload()),
            FnSource(|| async { Err::<Value, _>(SourceError::new("connection refused")) }),
            serve(segments_payload()),
            serve(chronotope_payload()),
        );
        let err = fetch_all(&registry).await.unwrap_err();
        match err {
            FetchError::Source { key, .. } => assert_eq!(key, SourceKey::Groups),
            other => panic!("expected Source error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_fails_at_the_boundary() {
        // segments payload is an object, not an array
        let registry = SourceRegistry::new(
            serve(map_payload()),
            serve(groups_payload()),
            serve(json!({"nope": 1})),
            serve(chronotope_payload()),
        );
        let err = fetch_all(&registry).await.unwrap_err();
        match err {
            FetchError::Decode { key, .. } => assert_eq!(key, SourceKey::Segments),
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pool_admits_all_four_sources_at_once() {
        // Each source blocks until all four have started: the fetch can
        // only finish if the pool admits the full registry concurrently.
        let barrier = Arc::new(tokio::sync::Barrier::new(4));
        let gated = |payload: Value| {
            let barrier = Arc::clone(&barrier);
            FnSource(move || {
                let barrier = Arc::clone(&barrier);
                let payload = payload.clone();
                async move {
                    let _ = barrier.wait().await;
                    Ok(payload)
                }
            })
        };
        let registry = SourceRegistry::new(
            gated(map_payload()),
            gated(groups_payload()),
            gated(segments_payload()),
            gated(chronotope_payload()),
        );
        let dataset = tokio::time::timeout(Duration::from_secs(5), fetch_all(&registry))
            .await
            .expect("pool queued a source instead of starting all four")
            .unwrap();
        assert!(dataset.is_complete());
    }

    #[tokio::test]
    async fn merge_is_independent_of_completion_order() {
        // Sources finish in reverse registry order; the merge still lands
        // every payload under its own key.
        let delays = [40u64, 30, 20, 10];
        let calls = Arc::new(AtomicUsize::new(0));
        let delayed = |payload: Value, delay_ms: u64| {
            let calls = Arc::clone(&calls);
            FnSource(move || {
                let payload = payload.clone();
                let calls = Arc::clone(&calls);
                async move {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(payload)
                }
            })
        };
        let registry = SourceRegistry::new(
            delayed(map_payload(), delays[0]),
            delayed(groups_payload(), delays[1]),
            delayed(segments_payload(), delays[2]),
            delayed(chronotope_payload(), delays[3]),
        );
        let dataset = fetch_all(&registry).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(dataset.map.name, "demo");
        assert_eq!(dataset.segments[0].name, "alpha-1");
        assert_eq!(dataset.chronotope[0].node_id, "n-1");
    }
}
