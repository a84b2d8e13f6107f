//! Shared fixtures for listing view integration tests
//!
//! Provides entity builders with integer timestamps and `GatedAdapter`, a
//! fetch adapter whose calls only resolve when the test opens their gate.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod view_harness;
//! use view_harness::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::{broadcast, oneshot, watch};

use listing::core::events::{EventEnvelope, SessionEvent};
use listing::prelude::*;

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("timestamp in range")
}

pub fn company(id: &str, name: &str, created: i64) -> Entity {
    Company::new(id, name, at(created)).into()
}

pub fn job(id: &str, title: &str, created: i64) -> Entity {
    Job::new(id, title, at(created)).into()
}

/// The two-company collection used throughout the scenarios
pub fn acme_and_boxcorp() -> Vec<Entity> {
    vec![company("1", "Acme", 100), company("2", "Boxcorp", 200)]
}

pub fn predicate(query: &str) -> FilterPredicate {
    let mut predicate = FilterPredicate::new();
    predicate.set_query(query);
    predicate
}

pub fn ids(view: &DerivedView) -> Vec<&str> {
    view.ids().iter().map(String::as_str).collect()
}

// ---------------------------------------------------------------------------
// GatedAdapter
// ---------------------------------------------------------------------------

/// Fetch adapter whose calls block until the test releases them.
///
/// Register a gate with [`gate`](Self::gate) before each expected call; the
/// n-th `fetch_all` waits on the n-th gate. Dropping a gate's sender resolves
/// the call with a network error.
pub struct GatedAdapter {
    gates: Mutex<VecDeque<oneshot::Receiver<FetchResult>>>,
    started: watch::Sender<usize>,
}

impl GatedAdapter {
    pub fn new() -> Self {
        let (started, _) = watch::channel(0);
        Self {
            gates: Mutex::new(VecDeque::new()),
            started,
        }
    }

    /// Register the gate for the next call
    pub fn gate(&self) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().expect("gate lock").push_back(rx);
        tx
    }

    /// Wait until at least `n` calls have picked up their gate
    pub async fn wait_started(&self, n: usize) {
        let mut rx = self.started.subscribe();
        rx.wait_for(|count| *count >= n)
            .await
            .expect("adapter alive");
    }
}

#[async_trait]
impl FetchAdapter for GatedAdapter {
    async fn fetch_all(&self) -> FetchResult {
        let gate = self.gates.lock().expect("gate lock").pop_front();
        self.started.send_modify(|count| *count += 1);

        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::network("gate dropped"))),
            None => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "gated"
    }
}

// ---------------------------------------------------------------------------
// Event helpers
// ---------------------------------------------------------------------------

/// Receive events until one satisfies `pred`
pub async fn next_matching<F>(
    rx: &mut broadcast::Receiver<EventEnvelope>,
    mut pred: F,
) -> SessionEvent
where
    F: FnMut(&SessionEvent) -> bool,
{
    loop {
        let envelope = rx.recv().await.expect("event bus open");
        if pred(&envelope.event) {
            return envelope.event;
        }
    }
}
