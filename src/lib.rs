//! # listing-sync
//!
//! Keeps a rendered listing view in step with a mutable search query and a
//! remotely fetched collection of companies or jobs.
//!
//! ## Features
//!
//! - **Canonical Store**: one deduplicated, ordered collection per page, replaced wholesale
//! - **Normalized Search**: trimmed, lowercased, length-capped substring matching
//! - **Derived Views**: filter, recency sort and "latest N" truncation, memoized by revision
//! - **Last-Writer-Wins Fetches**: only the most recently issued fetch may write the store
//! - **Change Notifications**: broadcast events on every store, query and scroll change
//! - **Single-Task Event Loop**: input, scroll and fetch completions handled one at a time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listing::prelude::*;
//!
//! let adapter = StaticFetchAdapter::new(vec![
//!     Company::new("1", "Acme", Utc::now()).into(),
//!     Company::new("2", "Boxcorp", Utc::now()).into(),
//! ]);
//!
//! let mut session = PageSession::company_list(&ViewConfig::default());
//! session.refresh(&adapter).await;
//! session.set_query("BOX");
//!
//! assert_eq!(session.view().ids(), ["2"]);
//! ```

pub mod config;
pub mod core;
pub mod page;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        entity::{Company, Entity, EntityKind, Job, Listing},
        error::{ConfigError, FetchError, ListingError},
        events::{CollectionEvent, EventBus, EventEnvelope, SessionEvent},
        fetch::{FetchAdapter, FetchOutcome, FetchResult, FetchTicket},
        query::{FilterPredicate, ViewOptions},
        render::{Frame, FrameRecorder, RenderMeta, RenderSink},
        scroll::{ScrollStyle, ScrollStyleState},
        view::{DerivedView, DerivedViewCache, recompute},
    };

    // === Storage ===
    pub use crate::storage::{CollectionStore, ReplaceSummary, StaticFetchAdapter};
    #[cfg(feature = "http")]
    pub use crate::storage::{HttpFetchAdapter, ListingResource};

    // === Config ===
    pub use crate::config::ViewConfig;

    // === Page ===
    pub use crate::page::{PageClosed, PageEvent, PageHandle, PageLoop, PageSession, page_loop};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
}
