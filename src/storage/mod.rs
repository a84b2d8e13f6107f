//! Listing storage and fetch backends

pub mod collection;
#[cfg(feature = "http")]
pub mod http;
pub mod in_memory;

pub use collection::{CollectionStore, ReplaceSummary};
#[cfg(feature = "http")]
pub use http::{HttpFetchAdapter, ListingResource};
pub use in_memory::StaticFetchAdapter;
