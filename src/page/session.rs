//! The page/session context owning all listing state

use crate::config::ViewConfig;
use crate::core::events::{CollectionEvent, EventBus, EventEnvelope, SessionEvent};
use crate::core::fetch::{FetchAdapter, FetchOutcome, FetchResult, FetchSequencer, FetchTicket};
use crate::core::query::{FilterPredicate, ViewOptions};
use crate::core::render::{RenderMeta, RenderSink};
use crate::core::scroll::{ScrollStyle, ScrollStyleState};
use crate::core::view::{DerivedView, DerivedViewCache};
use crate::storage::CollectionStore;
use tokio::sync::broadcast;

/// State for one page showing a listing collection.
///
/// All writes go through named methods:
/// - [`complete_fetch`](Self::complete_fetch) is the only writer of the store
/// - [`set_query`](Self::set_query) is the only writer of the predicate
///
/// Both recompute the derived view before returning, so a read right after
/// any change never sees stale data.
///
/// # Example
/// ```rust,ignore
/// let mut session = PageSession::company_list(&ViewConfig::default());
/// session.refresh(&adapter).await;
/// session.set_query("box");
/// session.render(&mut sink);
/// ```
#[derive(Debug)]
pub struct PageSession {
    store: CollectionStore,
    predicate: FilterPredicate,
    sequencer: FetchSequencer,
    cache: DerivedViewCache,
    scroll: ScrollStyleState,
    unavailable: bool,
    events: EventBus,
}

impl PageSession {
    pub fn new(config: &ViewConfig, options: ViewOptions) -> Self {
        Self {
            store: CollectionStore::new(),
            predicate: FilterPredicate::with_max_chars(config.max_query_chars),
            sequencer: FetchSequencer::new(),
            cache: DerivedViewCache::new(options),
            scroll: ScrollStyleState::new(config.scroll_threshold),
            unavailable: false,
            events: EventBus::new(config.event_capacity),
        }
    }

    /// Every matching listing in fetch order (company table, job browser)
    pub fn company_list(config: &ViewConfig) -> Self {
        Self::new(config, ViewOptions::all())
    }

    /// The most recent matching listings (home page "latest jobs")
    pub fn latest_jobs(config: &ViewConfig) -> Self {
        Self::new(config, ViewOptions::latest(config.latest_jobs_limit))
    }

    // === Input handler ===

    /// Apply a raw search input.
    ///
    /// Returns `true` if the normalized query changed.
    pub fn set_query(&mut self, raw: &str) -> bool {
        if !self.predicate.set_query(raw) {
            return false;
        }

        self.sync_view();
        self.events.publish(SessionEvent::QueryChanged {
            query: self.predicate.query().to_string(),
            revision: self.predicate.revision(),
        });
        true
    }

    // === Fetch handling ===

    /// Start a fetch. The returned ticket supersedes every earlier one.
    pub fn issue_fetch(&mut self) -> FetchTicket {
        let ticket = self.sequencer.issue();
        tracing::debug!(seq = ticket.seq(), "Fetch issued");
        ticket
    }

    /// Handle a fetch completion.
    ///
    /// Only the latest issued ticket may write the store. A failure of the
    /// latest fetch keeps the current collection and marks it unavailable.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: FetchResult) -> FetchOutcome {
        if !self.sequencer.settle(ticket) {
            let latest = self.sequencer.latest();
            tracing::debug!(
                seq = ticket.seq(),
                latest = latest.map(|t| t.seq()),
                "Discarding stale fetch completion"
            );
            self.events
                .publish(SessionEvent::Collection(CollectionEvent::FetchDiscarded {
                    seq: ticket.seq(),
                    latest: latest.map_or(0, |t| t.seq()),
                }));
            return FetchOutcome::Discarded { ticket, latest };
        }

        match result {
            Ok(entities) => {
                let summary = self.store.replace(entities);
                let recovered = std::mem::take(&mut self.unavailable);
                self.sync_view();
                tracing::debug!(
                    seq = ticket.seq(),
                    kept = summary.kept,
                    changed = summary.changed,
                    "Fetch applied"
                );
                self.events
                    .publish(SessionEvent::Collection(CollectionEvent::Replaced {
                        seq: ticket.seq(),
                        revision: self.store.revision(),
                        len: summary.kept,
                        changed: summary.changed,
                        recovered,
                    }));
                FetchOutcome::Applied(summary)
            }
            Err(err) => {
                tracing::warn!(seq = ticket.seq(), kind = err.kind(), error = %err, "Fetch failed");
                self.unavailable = true;
                self.events
                    .publish(SessionEvent::Collection(CollectionEvent::FetchFailed {
                        seq: ticket.seq(),
                        kind: err.kind().to_string(),
                    }));
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Issue a fetch, await `adapter`, and apply the completion
    pub async fn refresh<A: FetchAdapter + ?Sized>(&mut self, adapter: &A) -> FetchOutcome {
        let ticket = self.issue_fetch();
        let result = adapter.fetch_all().await;
        self.complete_fetch(ticket, result)
    }

    // === Scroll ===

    /// Feed a scroll offset; returns the new style on a transition
    pub fn on_scroll(&mut self, offset: f64) -> Option<ScrollStyle> {
        let style = self.scroll.on_scroll(offset)?;
        self.events
            .publish(SessionEvent::ScrollStyleChanged { style });
        Some(style)
    }

    pub fn scroll_style(&self) -> ScrollStyle {
        self.scroll.style()
    }

    // === Reads ===

    /// The derived view for the current store and predicate
    pub fn view(&mut self) -> &DerivedView {
        self.cache.view(&self.store, &self.predicate)
    }

    /// Push the current view to `sink`
    pub fn render<S: RenderSink + ?Sized>(&mut self, sink: &mut S) {
        let view = self.cache.view(&self.store, &self.predicate);
        let entities = view.resolve(&self.store);
        let meta = RenderMeta {
            is_empty: entities.is_empty(),
            unavailable: self.unavailable,
            query: self.predicate.query().to_string(),
        };
        sink.render(&entities, &meta);
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    pub fn options(&self) -> &ViewOptions {
        self.cache.options()
    }

    /// Whether the latest fetch failed
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    /// Whether a fetch was issued and has not completed yet
    pub fn fetch_in_flight(&self) -> bool {
        self.sequencer.in_flight()
    }

    /// Number of real view recomputations so far
    pub fn recompute_count(&self) -> u64 {
        self.cache.recompute_count()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // === Lifecycle ===

    /// Empty the collection on the caller's request
    pub fn clear(&mut self) {
        let before = self.store.revision();
        self.store.clear();
        if self.store.revision() != before {
            self.sync_view();
            self.events
                .publish(SessionEvent::Collection(CollectionEvent::Cleared {
                    revision: self.store.revision(),
                }));
        }
    }

    /// Discard all page state: in-flight fetches, collection and query
    pub fn teardown(&mut self) {
        self.sequencer.cancel_all();
        self.clear();
        self.set_query("");
        self.unavailable = false;
        self.cache.invalidate();
        tracing::debug!("Page session torn down");
    }

    fn sync_view(&mut self) {
        self.cache.view(&self.store, &self.predicate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Company, Entity, Job};
    use crate::core::error::FetchError;
    use crate::core::render::FrameRecorder;
    use crate::storage::StaticFetchAdapter;
    use chrono::DateTime;

    fn company(id: &str, name: &str, secs: i64) -> Entity {
        Company::new(id, name, DateTime::from_timestamp(secs, 0).unwrap()).into()
    }

    fn session() -> PageSession {
        PageSession::company_list(&ViewConfig::default())
    }

    #[test]
    fn test_new_session_renders_empty() {
        let mut session = session();
        let mut sink = FrameRecorder::new();

        session.render(&mut sink);

        let frame = sink.last().unwrap();
        assert!(frame.ids.is_empty());
        assert!(frame.meta.is_empty);
        assert!(!frame.meta.unavailable);
    }

    #[test]
    fn test_query_recomputes_synchronously() {
        let mut session = session();
        let ticket = session.issue_fetch();
        session.complete_fetch(ticket, Ok(vec![company("1", "Acme", 100), company("2", "Boxcorp", 200)]));
        let after_fetch = session.recompute_count();

        assert!(session.set_query("BOX"));
        assert_eq!(session.recompute_count(), after_fetch + 1);
        assert_eq!(session.view().ids(), ["2"]);
    }

    #[test]
    fn test_repeated_query_does_not_recompute() {
        let mut session = session();
        session.set_query("acme");
        let count = session.recompute_count();

        assert!(!session.set_query("acme"));
        assert!(!session.set_query(" ACME "));
        assert_eq!(session.recompute_count(), count);
    }

    #[test]
    fn test_failure_keeps_previous_collection() {
        let mut session = session();
        let first = session.issue_fetch();
        session.complete_fetch(first, Ok(vec![company("1", "Acme", 100)]));

        let second = session.issue_fetch();
        let outcome = session.complete_fetch(second, Err(FetchError::network("offline")));

        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert!(session.is_unavailable());
        assert_eq!(session.view().ids(), ["1"]);

        let mut sink = FrameRecorder::new();
        session.render(&mut sink);
        assert!(sink.last().unwrap().meta.unavailable);
        assert_eq!(sink.last().unwrap().ids, vec!["1"]);
    }

    #[test]
    fn test_success_clears_unavailable() {
        let mut session = session();
        let failed = session.issue_fetch();
        session.complete_fetch(failed, Err(FetchError::server(500, "boom")));
        assert!(session.is_unavailable());

        let ok = session.issue_fetch();
        session.complete_fetch(ok, Ok(vec![]));
        assert!(!session.is_unavailable());
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut session = session();
        let a = session.issue_fetch();
        let b = session.issue_fetch();

        session.complete_fetch(b, Ok(vec![company("b", "Bravo", 1)]));
        let outcome = session.complete_fetch(a, Err(FetchError::network("late")));

        assert!(outcome.is_discarded());
        assert!(!session.is_unavailable());
    }

    #[test]
    fn test_teardown_discards_in_flight_fetch() {
        let mut session = session();
        let ticket = session.issue_fetch();
        session.set_query("acme");

        session.teardown();

        let mut rx = session.subscribe();
        let outcome = session.complete_fetch(ticket, Ok(vec![company("1", "Acme", 1)]));
        assert_eq!(
            outcome,
            FetchOutcome::Discarded {
                ticket,
                latest: Some(ticket),
            }
        );
        assert_eq!(
            rx.try_recv().unwrap().event,
            SessionEvent::Collection(CollectionEvent::FetchDiscarded { seq: 1, latest: 1 })
        );
        assert!(session.store().is_empty());
        assert!(session.predicate().is_empty());
    }

    #[test]
    fn test_teardown_publishes_reset_query() {
        let mut session = session();
        let ticket = session.issue_fetch();
        session.complete_fetch(ticket, Ok(vec![company("1", "Acme", 1)]));
        session.set_query("acme");
        let mut rx = session.subscribe();

        session.teardown();

        let cleared = rx.try_recv().unwrap();
        assert_eq!(
            cleared.event,
            SessionEvent::Collection(CollectionEvent::Cleared { revision: 2 })
        );
        let reset = rx.try_recv().unwrap();
        assert_eq!(
            reset.event,
            SessionEvent::QueryChanged {
                query: String::new(),
                revision: 2,
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_teardown_of_empty_session_is_silent() {
        let mut session = session();
        let mut rx = session.subscribe();

        session.teardown();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_recovery_with_identical_batch_is_reported() {
        let mut session = session();
        let first = session.issue_fetch();
        session.complete_fetch(first, Ok(vec![company("1", "Acme", 1)]));
        let failed = session.issue_fetch();
        session.complete_fetch(failed, Err(FetchError::network("offline")));
        let mut rx = session.subscribe();

        let again = session.issue_fetch();
        session.complete_fetch(again, Ok(vec![company("1", "Acme", 1)]));

        let event = rx.try_recv().unwrap().event;
        assert_eq!(
            event,
            SessionEvent::Collection(CollectionEvent::Replaced {
                seq: 3,
                revision: 1,
                len: 1,
                changed: false,
                recovered: true,
            })
        );
        assert!(event.invalidates_view());
    }

    #[test]
    fn test_config_limits_reach_session_state() {
        let config = ViewConfig {
            scroll_threshold: 64.0,
            max_query_chars: 4,
            ..ViewConfig::default()
        };
        let mut session = PageSession::company_list(&config);

        session.set_query("boxcorp");

        assert_eq!(session.predicate().max_chars(), 4);
        assert_eq!(session.predicate().query(), "boxc");
        assert_eq!(session.scroll.threshold(), 64.0);
    }

    #[test]
    fn test_latest_jobs_uses_configured_limit() {
        let config = ViewConfig {
            latest_jobs_limit: 2,
            ..ViewConfig::default()
        };
        let mut session = PageSession::latest_jobs(&config);
        let ticket = session.issue_fetch();
        session.complete_fetch(
            ticket,
            Ok((1..=4)
                .map(|i| Job::new(format!("j{i}"), "Job", DateTime::from_timestamp(i, 0).unwrap()).into())
                .collect()),
        );

        assert_eq!(session.view().ids(), ["j4", "j3"]);
    }

    #[test]
    fn test_scroll_publishes_on_transition_only() {
        let mut session = session();
        let mut rx = session.subscribe();

        assert_eq!(session.on_scroll(5.0), None);
        assert_eq!(session.on_scroll(40.0), Some(ScrollStyle::Scrolled));
        assert_eq!(session.on_scroll(41.0), None);

        let envelope = rx.try_recv().unwrap();
        assert_eq!(
            envelope.event,
            SessionEvent::ScrollStyleChanged {
                style: ScrollStyle::Scrolled
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_refresh_with_adapter() {
        let adapter = StaticFetchAdapter::new(vec![company("1", "Acme", 100)]);
        let mut session = session();

        let outcome = session.refresh(&adapter).await;

        assert!(outcome.is_applied());
        assert_eq!(session.store().len(), 1);
        assert!(!session.fetch_in_flight());
    }
}
