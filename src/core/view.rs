//! Derived views: the filtered, ordered sequence handed to the renderer
//!
//! A derived view is a pure function of the collection, the predicate and the
//! [`ViewOptions`]. [`recompute`] is that function; [`DerivedViewCache`] wraps
//! it with a memo keyed on the store and predicate revisions so repeated reads
//! between changes cost nothing.

use crate::core::entity::{Entity, Listing};
use crate::core::query::{FilterPredicate, ViewOptions};
use crate::storage::CollectionStore;
use serde::Serialize;

/// Ordered ids of the entities to render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    ids: Vec<String>,
}

impl DerivedView {
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Look the ids back up in `store`.
    ///
    /// Ids the store no longer holds are skipped.
    pub fn resolve<'a>(&self, store: &'a CollectionStore) -> Vec<&'a Entity> {
        self.ids
            .iter()
            .filter_map(|id| store.get_by_id(id))
            .collect()
    }
}

/// Build a derived view.
///
/// 1. keep entities matching `predicate`, in collection order
/// 2. if requested, stable-sort by `created_at` descending, ties by id ascending
/// 3. if requested, truncate to `limit`
pub fn recompute<'a, I>(
    collection: I,
    predicate: &FilterPredicate,
    options: &ViewOptions,
) -> DerivedView
where
    I: IntoIterator<Item = &'a Entity>,
{
    let matching = collection
        .into_iter()
        .filter(|entity| predicate.matches(*entity));

    let ids = if options.sort_by_recency_desc {
        let mut matched: Vec<&Entity> = matching.collect();
        matched.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        if let Some(limit) = options.limit {
            matched.truncate(limit);
        }
        matched.into_iter().map(|e| e.id().to_string()).collect()
    } else {
        let limit = options.limit.unwrap_or(usize::MAX);
        matching.take(limit).map(|e| e.id().to_string()).collect()
    };

    DerivedView { ids }
}

#[derive(Debug, Clone)]
struct Memo {
    store_revision: u64,
    query_revision: u64,
    view: DerivedView,
}

/// Memoizing front for [`recompute`].
///
/// The only inputs are the store and the predicate passed to
/// [`view`](Self::view); the cached result is reused while both revisions are
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct DerivedViewCache {
    options: ViewOptions,
    memo: Option<Memo>,
    recomputes: u64,
}

impl DerivedViewCache {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            options,
            memo: None,
            recomputes: 0,
        }
    }

    /// The current view, recomputed first if either input moved
    pub fn view(&mut self, store: &CollectionStore, predicate: &FilterPredicate) -> &DerivedView {
        let stale = self.memo.as_ref().is_none_or(|memo| {
            memo.store_revision != store.revision() || memo.query_revision != predicate.revision()
        });
        if stale {
            self.memo = None;
        }

        let options = &self.options;
        let recomputes = &mut self.recomputes;
        let memo = self.memo.get_or_insert_with(|| {
            *recomputes += 1;
            let view = recompute(store.get(), predicate, options);
            tracing::debug!(
                store_revision = store.revision(),
                query_revision = predicate.revision(),
                len = view.len(),
                "Derived view recomputed"
            );
            Memo {
                store_revision: store.revision(),
                query_revision: predicate.revision(),
                view,
            }
        });

        &memo.view
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Change the view shape; the next read recomputes
    pub fn set_options(&mut self, options: ViewOptions) {
        if options != self.options {
            self.options = options;
            self.memo = None;
        }
    }

    /// Forget the memoized view
    pub fn invalidate(&mut self) {
        self.memo = None;
    }

    /// How many times the view was actually recomputed
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Company, Job};
    use chrono::DateTime;

    fn company(id: &str, name: &str, secs: i64) -> Entity {
        Company::new(id, name, DateTime::from_timestamp(secs, 0).unwrap()).into()
    }

    fn job(id: &str, secs: i64) -> Entity {
        Job::new(id, format!("Job {id}"), DateTime::from_timestamp(secs, 0).unwrap()).into()
    }

    fn query(q: &str) -> FilterPredicate {
        let mut predicate = FilterPredicate::new();
        predicate.set_query(q);
        predicate
    }

    #[test]
    fn test_empty_query_keeps_collection_order() {
        let collection = vec![company("2", "B", 1), company("1", "A", 2)];
        let view = recompute(&collection, &query(""), &ViewOptions::all());

        assert_eq!(view.ids(), ["2", "1"]);
    }

    #[test]
    fn test_filter_preserves_order() {
        let collection = vec![
            company("1", "Acme Corp", 1),
            company("2", "Bolt", 2),
            company("3", "Corpus", 3),
        ];
        let view = recompute(&collection, &query("corp"), &ViewOptions::all());

        assert_eq!(view.ids(), ["1", "3"]);
    }

    #[test]
    fn test_latest_sorts_and_truncates() {
        let collection = vec![job("e", 100), job("a", 500), job("c", 300), job("b", 400)];
        let view = recompute(&collection, &query(""), &ViewOptions::latest(2));

        assert_eq!(view.ids(), ["a", "b"]);
    }

    #[test]
    fn test_recency_ties_break_by_id() {
        let collection = vec![job("z", 10), job("m", 10), job("a", 10), job("q", 20)];
        let options = ViewOptions {
            sort_by_recency_desc: true,
            limit: None,
        };
        let view = recompute(&collection, &query(""), &options);

        assert_eq!(view.ids(), ["q", "a", "m", "z"]);
    }

    #[test]
    fn test_limit_without_sort_takes_prefix() {
        let collection = vec![job("c", 1), job("a", 2), job("b", 3)];
        let options = ViewOptions {
            sort_by_recency_desc: false,
            limit: Some(2),
        };

        assert_eq!(recompute(&collection, &query(""), &options).ids(), ["c", "a"]);
    }

    #[test]
    fn test_limit_zero_is_empty() {
        let collection = vec![job("a", 1)];
        let view = recompute(&collection, &query(""), &ViewOptions::latest(0));
        assert!(view.is_empty());
    }

    #[test]
    fn test_cache_reuses_view_until_inputs_change() {
        let mut store = CollectionStore::new();
        store.replace(vec![company("1", "Acme", 1), company("2", "Boxcorp", 2)]);
        let mut predicate = FilterPredicate::new();
        let mut cache = DerivedViewCache::new(ViewOptions::all());

        assert_eq!(cache.view(&store, &predicate).len(), 2);
        assert_eq!(cache.view(&store, &predicate).len(), 2);
        assert_eq!(cache.recompute_count(), 1);

        predicate.set_query("BOX");
        assert_eq!(cache.view(&store, &predicate).ids(), ["2"]);
        assert_eq!(cache.recompute_count(), 2);

        predicate.set_query("box ");
        cache.view(&store, &predicate);
        assert_eq!(cache.recompute_count(), 2);

        store.replace(vec![company("3", "Boxwood", 3)]);
        assert_eq!(cache.view(&store, &predicate).ids(), ["3"]);
        assert_eq!(cache.recompute_count(), 3);
    }

    #[test]
    fn test_set_options_invalidates() {
        let mut store = CollectionStore::new();
        store.replace(vec![job("old", 1), job("new", 2)]);
        let predicate = FilterPredicate::new();
        let mut cache = DerivedViewCache::new(ViewOptions::all());

        assert_eq!(cache.view(&store, &predicate).ids(), ["old", "new"]);

        cache.set_options(ViewOptions::latest(1));
        assert_eq!(cache.view(&store, &predicate).ids(), ["new"]);
        assert_eq!(cache.recompute_count(), 2);
    }

    #[test]
    fn test_resolve_maps_ids_to_entities() {
        let mut store = CollectionStore::new();
        store.replace(vec![company("1", "Acme", 1), company("2", "Boxcorp", 2)]);
        let view = recompute(store.get(), &query("acme"), &ViewOptions::all());

        let entities = view.resolve(&store);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].display_field(), "Acme");
    }
}
