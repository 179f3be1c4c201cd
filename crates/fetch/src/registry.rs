use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The fixed enumeration of chronotope data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKey {
    Map,
    Groups,
    Segments,
    Chronotope,
}

impl SourceKey {
    /// Registry order. Results are tagged and merged by key, so the order
    /// sources *complete* in never matters.
    pub const ALL: [SourceKey; 4] = [
        SourceKey::Map,
        SourceKey::Groups,
        SourceKey::Segments,
        SourceKey::Chronotope,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKey::Map => "map",
            SourceKey::Groups => "groups",
            SourceKey::Segments => "segments",
            SourceKey::Chronotope => "chronotope",
        }
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of an individual source operation (e.g. a transport error).
/// Never retried; the fetcher turns it into the terminating failure of
/// the whole fetch.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A zero-argument asynchronous retrieval operation bound to one source.
///
/// Any transport satisfying this shape is acceptable — HTTP, local file,
/// in-memory mock. The core never learns how the bytes were retrieved.
#[async_trait]
pub trait SourceOp: Send + Sync {
    async fn call(&self) -> Result<Value, SourceError>;
}

/// Adapter turning an async closure into a [`SourceOp`].
pub struct FnSource<F>(pub F);

#[async_trait]
impl<F, Fut> SourceOp for FnSource<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, SourceError>> + Send,
{
    async fn call(&self) -> Result<Value, SourceError> {
        (self.0)().await
    }
}

/// One registry slot: a source key bound to its retrieval operation.
pub struct SourceEntry {
    pub key: SourceKey,
    pub operation: Box<dyn SourceOp>,
}

/// The fixed, ordered list of source operations the fetcher runs.
pub struct SourceRegistry {
    entries: Vec<SourceEntry>,
}

impl SourceRegistry {
    /// Bind one operation to each of the four source keys, in registry
    /// order.
    pub fn new(
        map: impl SourceOp + 'static,
        groups: impl SourceOp + 'static,
        segments: impl SourceOp + 'static,
        chronotope: impl SourceOp + 'static,
    ) -> Self {
        Self {
            entries: vec![
                SourceEntry {
                    key: SourceKey::Map,
                    operation: Box::new(map),
                },
                SourceEntry {
                    key: SourceKey::Groups,
                    operation: Box::new(groups),
                },
                SourceEntry {
                    key: SourceKey::Segments,
                    operation: Box::new(segments),
                },
                SourceEntry {
                    key: SourceKey::Chronotope,
                    operation: Box::new(chronotope),
                },
            ],
        }
    }

    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }
}
