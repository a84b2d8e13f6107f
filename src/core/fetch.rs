//! Fetch adapter contract and last-writer-wins sequencing

use crate::core::entity::Entity;
use crate::core::error::FetchError;
use crate::storage::ReplaceSummary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Result produced by one fetch
pub type FetchResult = Result<Vec<Entity>, FetchError>;

/// Source of the canonical listing collection.
///
/// Implementations are free to use any transport. The core never retries and
/// never times out a fetch; a call that never resolves simply never updates
/// the store.
#[async_trait]
pub trait FetchAdapter: Send + Sync {
    /// Retrieve the complete collection
    async fn fetch_all(&self) -> FetchResult;

    /// Short name used in logs
    fn name(&self) -> &str {
        "fetch"
    }
}

#[async_trait]
impl<T: FetchAdapter + ?Sized> FetchAdapter for Arc<T> {
    async fn fetch_all(&self) -> FetchResult {
        (**self).fetch_all().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Sequence number handed out when a fetch is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues fetch tickets and decides which completion may touch the store.
///
/// Only the most recently *issued* ticket is accepted, and only once.
/// Completions for older tickets are stale no matter when they arrive.
#[derive(Debug, Clone, Default)]
pub struct FetchSequencer {
    latest: u64,
    settled: bool,
}

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one
    pub fn issue(&mut self) -> FetchTicket {
        self.latest += 1;
        self.settled = false;
        FetchTicket(self.latest)
    }

    /// Most recently issued ticket, if any
    pub fn latest(&self) -> Option<FetchTicket> {
        (self.latest > 0).then_some(FetchTicket(self.latest))
    }

    /// Whether `ticket` is the newest one and has not completed yet
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest && !self.settled
    }

    /// Claim the right to apply `ticket`'s result.
    ///
    /// Returns `false` for superseded or already-settled tickets.
    pub fn settle(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.settled = true;
        true
    }

    /// Supersede every in-flight fetch without issuing a new one.
    ///
    /// [`latest`](Self::latest) keeps reporting the last issued ticket.
    pub fn cancel_all(&mut self) {
        self.settled = true;
    }

    /// Whether a fetch has been issued and not yet completed
    pub fn in_flight(&self) -> bool {
        self.latest > 0 && !self.settled
    }
}

/// What a session did with a fetch completion
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The result replaced the collection
    Applied(ReplaceSummary),
    /// The latest fetch failed; the collection is unchanged
    Failed(FetchError),
    /// A newer fetch was issued; this completion was ignored
    Discarded {
        ticket: FetchTicket,
        latest: Option<FetchTicket>,
    },
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied(_))
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, FetchOutcome::Discarded { .. })
    }
}
