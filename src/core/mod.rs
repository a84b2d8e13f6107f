//! Core module containing the listing model and the view engine

pub mod entity;
pub mod error;
pub mod events;
pub mod fetch;
pub mod query;
pub mod render;
pub mod scroll;
pub mod view;

pub use entity::{Company, Entity, EntityKind, Job, Listing};
pub use error::{ConfigError, FetchError, ListingError};
pub use events::{CollectionEvent, EventBus, EventEnvelope, SessionEvent};
pub use fetch::{FetchAdapter, FetchOutcome, FetchResult, FetchSequencer, FetchTicket};
pub use query::{FilterPredicate, ViewOptions, normalize};
pub use render::{Frame, FrameRecorder, RenderMeta, RenderSink};
pub use scroll::{ScrollStyle, ScrollStyleState};
pub use view::{DerivedView, DerivedViewCache, recompute};
