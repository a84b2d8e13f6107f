//! Single-task page event loop
//!
//! User input, scroll offsets and fetch completions all arrive on one
//! channel and are processed strictly one at a time. Fetches are the only
//! suspending work: the loop assigns the ticket, spawns the adapter call, and
//! the spawned task posts the completion back into the same channel. A
//! pending fetch never keeps the loop alive.
//!
//! ```text
//! PageHandle ──▶ mpsc ──▶ PageLoop ──▶ PageSession ──▶ RenderSink
//!                  ▲          │
//!                  └── spawned fetch task ◀── FetchAdapter
//! ```

use crate::core::fetch::{FetchAdapter, FetchOutcome, FetchResult, FetchTicket};
use crate::core::render::RenderSink;
use crate::page::session::PageSession;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Events processed by the page loop
#[derive(Debug)]
pub enum PageEvent {
    /// Raw text from the search input
    Input(String),
    /// Vertical scroll offset
    Scroll(f64),
    /// Issue a new fetch, superseding any in flight
    Refresh,
    /// A spawned fetch finished
    FetchCompleted {
        ticket: FetchTicket,
        result: FetchResult,
    },
    /// Stop the loop and discard page state
    Teardown,
}

/// The loop has stopped and no longer accepts events
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page loop is closed")]
pub struct PageClosed;

/// Cloneable handle for feeding events into a [`PageLoop`]
#[derive(Debug, Clone)]
pub struct PageHandle {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl PageHandle {
    pub fn input(&self, raw: impl Into<String>) -> Result<(), PageClosed> {
        self.send(PageEvent::Input(raw.into()))
    }

    pub fn scroll(&self, offset: f64) -> Result<(), PageClosed> {
        self.send(PageEvent::Scroll(offset))
    }

    pub fn refresh(&self) -> Result<(), PageClosed> {
        self.send(PageEvent::Refresh)
    }

    pub fn teardown(&self) -> Result<(), PageClosed> {
        self.send(PageEvent::Teardown)
    }

    fn send(&self, event: PageEvent) -> Result<(), PageClosed> {
        self.tx.send(event).map_err(|_| PageClosed)
    }
}

/// Event loop driving one [`PageSession`] and one [`RenderSink`]
pub struct PageLoop<S> {
    session: PageSession,
    sink: S,
    adapter: Arc<dyn FetchAdapter>,
    rx: mpsc::UnboundedReceiver<PageEvent>,
    // Weak so the loop ends once every handle is gone, even with fetches pending
    tx: mpsc::WeakUnboundedSender<PageEvent>,
    fetches: JoinSet<()>,
}

/// Build a page loop and the handle that feeds it.
///
/// # Example
/// ```rust,ignore
/// let (handle, page) = page_loop(session, Arc::new(adapter), FrameRecorder::new());
/// let task = tokio::spawn(page.run());
/// handle.refresh()?;
/// handle.input("box")?;
/// handle.teardown()?;
/// let sink = task.await?;
/// ```
pub fn page_loop<S: RenderSink>(
    session: PageSession,
    adapter: Arc<dyn FetchAdapter>,
    sink: S,
) -> (PageHandle, PageLoop<S>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let page = PageLoop {
        session,
        sink,
        adapter,
        rx,
        tx: tx.downgrade(),
        fetches: JoinSet::new(),
    };
    (PageHandle { tx }, page)
}

impl<S: RenderSink> PageLoop<S> {
    /// Run until teardown or until every sender is dropped.
    ///
    /// Renders once on start and after every event that changed the view.
    /// Pending fetches are aborted on exit. Returns the sink after tearing the
    /// session down.
    pub async fn run(mut self) -> S {
        tracing::info!(adapter = self.adapter.name(), "Page loop started");
        self.session.render(&mut self.sink);

        while let Some(event) = self.rx.recv().await {
            if matches!(event, PageEvent::Teardown) {
                break;
            }
            if self.handle(event) {
                self.session.render(&mut self.sink);
            }
        }

        self.fetches.abort_all();
        self.session.teardown();
        tracing::info!("Page loop stopped");
        self.sink
    }

    /// Process one event; returns whether the view must be re-rendered
    fn handle(&mut self, event: PageEvent) -> bool {
        match event {
            PageEvent::Input(raw) => self.session.set_query(&raw),
            PageEvent::Scroll(offset) => {
                if let Some(style) = self.session.on_scroll(offset) {
                    self.sink.scroll_style(style);
                }
                false
            }
            PageEvent::Refresh => {
                self.spawn_fetch();
                false
            }
            PageEvent::FetchCompleted { ticket, result } => {
                let was_unavailable = self.session.is_unavailable();
                match self.session.complete_fetch(ticket, result) {
                    FetchOutcome::Applied(summary) => summary.changed || was_unavailable,
                    FetchOutcome::Failed(_) => true,
                    FetchOutcome::Discarded { .. } => false,
                }
            }
            PageEvent::Teardown => false,
        }
    }

    fn spawn_fetch(&mut self) {
        // Reap finished fetches so the set only holds pending ones
        while self.fetches.try_join_next().is_some() {}

        let ticket = self.session.issue_fetch();
        let tx = self.tx.clone();
        let adapter = Arc::clone(&self.adapter);
        self.fetches.spawn(async move {
            let result = adapter.fetch_all().await;
            match tx.upgrade() {
                Some(tx) => {
                    let _ = tx.send(PageEvent::FetchCompleted { ticket, result });
                }
                None => tracing::debug!(seq = ticket.seq(), "Page closed before fetch completed"),
            }
        });
    }
}
