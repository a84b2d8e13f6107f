//! In-memory fetch adapter for demos, tests and offline development

use crate::core::entity::Entity;
use crate::core::error::FetchError;
use crate::core::fetch::{FetchAdapter, FetchResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Fetch adapter serving a canned response.
///
/// The response can be swapped at any time; every `fetch_all` returns a copy
/// of whatever is configured when it runs. Clones share the same response.
#[derive(Clone)]
pub struct StaticFetchAdapter {
    response: Arc<RwLock<FetchResult>>,
    calls: Arc<AtomicUsize>,
}

impl StaticFetchAdapter {
    /// Serve `entities` on every fetch
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            response: Arc::new(RwLock::new(Ok(entities))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fail every fetch with `error`
    pub fn failing(error: FetchError) -> Self {
        Self {
            response: Arc::new(RwLock::new(Err(error))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn set_entities(&self, entities: Vec<Entity>) {
        *self.response.write().await = Ok(entities);
    }

    pub async fn set_error(&self, error: FetchError) {
        *self.response.write().await = Err(error);
    }

    /// Number of `fetch_all` calls served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StaticFetchAdapter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl FetchAdapter for StaticFetchAdapter {
    async fn fetch_all(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.read().await.clone()
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
