//! Change notifications for page sessions
//!
//! The EventBus decouples the session (which owns all listing state) from
//! anything that wants to react to it: renderers, loggers, tests. It uses
//! `tokio::sync::broadcast` so any number of subscribers can listen.
//!
//! # Architecture
//!
//! ```text
//! fetch completion ──┐
//! query input      ──┼──▶ PageSession ──▶ EventBus::publish() ──▶ subscribers
//! scroll offset    ──┘
//! ```
//!
//! Subscribers that only care about the rendered list check
//! [`SessionEvent::invalidates_view`].

use crate::core::scroll::ScrollStyle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events about the canonical collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CollectionEvent {
    /// A fetch result replaced the collection.
    ///
    /// `changed` is false when the batch matched the current contents;
    /// `recovered` is true when the fetch lifted the unavailable state.
    Replaced {
        seq: u64,
        revision: u64,
        len: usize,
        changed: bool,
        recovered: bool,
    },
    /// The collection was emptied
    Cleared { revision: u64 },
    /// The latest fetch failed; the previous collection is kept
    FetchFailed { seq: u64, kind: String },
    /// A superseded fetch completed and was ignored
    FetchDiscarded { seq: u64, latest: u64 },
}

/// Top-level session event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A collection event
    Collection(CollectionEvent),
    /// The normalized search query changed
    QueryChanged { query: String, revision: u64 },
    /// The navigation bar style flipped
    ScrollStyleChanged { style: ScrollStyle },
}

impl SessionEvent {
    pub fn event_kind(&self) -> &str {
        match self {
            SessionEvent::Collection(_) => "collection",
            SessionEvent::QueryChanged { .. } => "query",
            SessionEvent::ScrollStyleChanged { .. } => "scroll",
        }
    }

    /// Whether the rendered list must be refreshed after this event.
    ///
    /// A failed fetch counts: the list switches to the unavailable state even
    /// though its entries are unchanged. An identical replace does not, unless
    /// it recovers from a failure.
    pub fn invalidates_view(&self) -> bool {
        match self {
            SessionEvent::Collection(CollectionEvent::Replaced { changed, recovered, .. }) => {
                *changed || *recovered
            }
            SessionEvent::Collection(CollectionEvent::FetchDiscarded { .. }) => false,
            SessionEvent::Collection(_) => true,
            SessionEvent::QueryChanged { .. } => true,
            SessionEvent::ScrollStyleChanged { .. } => false,
        }
    }
}

/// Envelope wrapping a session event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: SessionEvent,
}

impl EventEnvelope {
    pub fn new(event: SessionEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus.
///
/// Cheap to clone (Arc internally).
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never blocks and never fails. Returns the number of receivers that
    /// will see the event.
    pub fn publish(&self, event: SessionEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() only errors when nobody is listening
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
