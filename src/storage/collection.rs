//! Canonical listing collection for one page or session

use crate::core::entity::{Entity, Listing};
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

/// What a [`CollectionStore::replace`] call did with its batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplaceSummary {
    /// Entities handed to `replace`
    pub received: usize,

    /// Entities now held by the store
    pub kept: usize,

    /// Later occurrences of an already-seen id that were dropped
    pub duplicates_dropped: usize,

    /// Whether the stored contents differ from before the call
    pub changed: bool,
}

/// Ordered, id-keyed collection of listings.
///
/// Invariants:
/// - ids are unique
/// - iteration order is the order of the last accepted batch
///
/// The store is only ever replaced wholesale; there is no per-entity insert or
/// update. Every effective change bumps [`revision`](Self::revision).
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    entities: IndexMap<String, Entity>,
    revision: u64,
}

impl CollectionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with `entities`.
    ///
    /// Duplicate ids within the batch keep their first occurrence. If the
    /// deduplicated batch equals the current contents (same entities, same
    /// order) the revision does not move.
    pub fn replace<I>(&mut self, entities: I) -> ReplaceSummary
    where
        I: IntoIterator<Item = Entity>,
    {
        let entities = entities.into_iter();
        let mut next = IndexMap::with_capacity(entities.size_hint().0);
        let mut received = 0;
        let mut duplicates_dropped = 0;

        for entity in entities {
            received += 1;
            match next.entry(entity.id().to_string()) {
                Entry::Occupied(_) => duplicates_dropped += 1,
                Entry::Vacant(slot) => {
                    slot.insert(entity);
                }
            }
        }

        // IndexMap equality ignores order, compare positionally instead
        let changed = next.len() != self.entities.len()
            || next.iter().zip(self.entities.iter()).any(|(a, b)| a != b);

        if changed {
            self.entities = next;
            self.revision += 1;
        }

        if duplicates_dropped > 0 {
            tracing::debug!(
                received,
                duplicates_dropped,
                "Dropped duplicate ids from fetched batch"
            );
        }

        ReplaceSummary {
            received,
            kept: self.entities.len(),
            duplicates_dropped,
            changed,
        }
    }

    /// The current collection, in order
    pub fn get(&self) -> impl ExactSizeIterator<Item = &Entity> + DoubleEndedIterator {
        self.entities.values()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Ids in collection order
    pub fn ids(&self) -> impl ExactSizeIterator<Item = &str> + DoubleEndedIterator {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drop every entity
    pub fn clear(&mut self) {
        if !self.entities.is_empty() {
            self.entities.clear();
            self.revision += 1;
        }
    }

    /// Counter bumped on every effective change
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
