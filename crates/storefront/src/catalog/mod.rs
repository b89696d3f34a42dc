//! Menu catalog engine.
//!
//! [`CatalogSource`] owns the observable catalog state and drives the fetch
//! pipeline: raw rows from an injected [`MenuSource`] strategy, normalization
//! into [`MenuItem`] values, a re-applied [`MenuFilter`] (the backend may
//! have ignored pushed-down options), and ascending-by-name ordering.

pub mod filter;
pub mod normalize;
pub mod source;

pub use filter::MenuFilter;
pub use normalize::normalize_items;
pub use source::{MenuSource, StaticMenuSource, SupabaseMenuSource};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chasha_core::MenuItem;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// Category label backing the "best sellers" view.
pub const BEST_SELLERS_CATEGORY: &str = "BEST SELLERS";

/// Observable catalog state: `Idle`/`Loading`/`Ready`/`Failed` collapsed into
/// the three fields the UI consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    /// Normalized, filtered, name-ordered items. Empty while loading or
    /// after a failure.
    pub items: Vec<MenuItem>,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
    /// Human-readable reason of the last failure, cleared on refetch.
    pub error: Option<String>,
}

/// The menu catalog: provenance strategy, current filter, and state.
///
/// Cheaply cloneable; clones share state. All mutation goes through
/// [`refetch`](Self::refetch) and [`set_filter`](Self::set_filter), and a
/// generation token guarantees that a slow in-flight fetch whose parameters
/// have since changed never overwrites state with stale results.
pub struct CatalogSource<S: MenuSource> {
    inner: Arc<CatalogSourceInner<S>>,
}

impl<S: MenuSource> Clone for CatalogSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CatalogSourceInner<S> {
    source: S,
    shared: Mutex<SharedState>,
    generation: AtomicU64,
}

struct SharedState {
    filter: MenuFilter,
    state: CatalogState,
}

impl<S: MenuSource> CatalogSource<S> {
    /// Create a catalog over a provenance strategy and an initial filter.
    ///
    /// The catalog starts idle; call [`refetch`](Self::refetch) to load.
    pub fn new(source: S, filter: MenuFilter) -> Self {
        Self {
            inner: Arc::new(CatalogSourceInner {
                source,
                shared: Mutex::new(SharedState {
                    filter,
                    state: CatalogState::default(),
                }),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The "best sellers" view: fixed category, available items only.
    pub fn best_sellers(source: S, limit: Option<usize>) -> Self {
        Self::new(source, MenuFilter::for_category(BEST_SELLERS_CATEGORY, limit))
    }

    /// A category view: caller-supplied category, available items only.
    pub fn by_category(source: S, category: impl Into<String>) -> Self {
        Self::new(source, MenuFilter::for_category(category, None))
    }

    /// Snapshot of the current observable state.
    #[must_use]
    pub fn state(&self) -> CatalogState {
        self.lock_shared().state.clone()
    }

    /// The current filter.
    #[must_use]
    pub fn filter(&self) -> MenuFilter {
        self.lock_shared().filter.clone()
    }

    /// Change the query parameters.
    ///
    /// Re-enters `Loading` immediately and bumps the generation token so any
    /// in-flight fetch for the previous parameters is discarded on arrival.
    /// Callers follow up with [`refetch`](Self::refetch); latest parameters
    /// win.
    pub fn set_filter(&self, filter: MenuFilter) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let mut shared = self.lock_shared();
        shared.filter = filter;
        shared.state.is_loading = true;
        shared.state.error = None;
    }

    /// Fetch, normalize, re-filter, and sort; then publish the result.
    ///
    /// Enters `Loading` from any state. On failure the items are reset to
    /// empty and the error message is stored for display; the caller may
    /// retry by calling this again. Returns the state after settlement (or
    /// the untouched current state when the result arrived stale).
    pub async fn refetch(&self) -> CatalogState {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = {
            let mut shared = self.lock_shared();
            shared.state.is_loading = true;
            shared.state.error = None;
            shared.filter.clone()
        };

        let outcome = self.fetch_items(&filter).await;

        let mut shared = self.lock_shared();
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding stale catalog fetch result");
            return shared.state.clone();
        }

        match outcome {
            Ok(items) => {
                shared.state.items = items;
                shared.state.error = None;
            }
            Err(err) => {
                warn!(error = %err, "Catalog fetch failed");
                shared.state.items.clear();
                shared.state.error = Some(err.to_string());
            }
        }
        shared.state.is_loading = false;
        shared.state.clone()
    }

    async fn fetch_items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, CatalogError> {
        let raw = self.inner.source.fetch_raw(filter).await?;
        let items = normalize_items(&raw)?;
        // The source may have ignored pushed-down options; the contract is
        // re-established here.
        let mut items = filter.apply(&items);
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn lock_shared(&self) -> std::sync::MutexGuard<'_, SharedState> {
        self.inner
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn raw_rows() -> Value {
        json!([
            {
                "id": "2",
                "name": "Zafrani Chai",
                "description": "Saffron chai",
                "category": "CHAI",
                "price": "8.00",
                "currency": "AED",
                "is_available": true
            },
            {
                "id": "1",
                "name": "Aloo Paratha",
                "description": "Stuffed flatbread",
                "category": "PARATHAS",
                "price": 9.0,
                "currency": "AED",
                "is_available": true
            }
        ])
    }

    struct FixedSource(Value);

    impl MenuSource for FixedSource {
        async fn fetch_raw(&self, _filter: &MenuFilter) -> Result<Value, CatalogError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl MenuSource for FailingSource {
        async fn fetch_raw(&self, _filter: &MenuFilter) -> Result<Value, CatalogError> {
            Err(CatalogError::SourceUnavailable("connection refused".to_string()))
        }
    }

    /// Blocks the first fetch until released, so tests can interleave
    /// deterministically; later fetches pass straight through.
    struct GatedSource {
        started: Arc<Notify>,
        release: Arc<Notify>,
        gate_first: std::sync::atomic::AtomicBool,
        rows: Value,
    }

    impl MenuSource for GatedSource {
        async fn fetch_raw(&self, _filter: &MenuFilter) -> Result<Value, CatalogError> {
            if self.gate_first.swap(false, Ordering::SeqCst) {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(self.rows.clone())
        }
    }

    #[tokio::test]
    async fn refetch_normalizes_and_sorts_by_name() {
        let catalog = CatalogSource::new(FixedSource(raw_rows()), MenuFilter::default());
        assert_eq!(catalog.state(), CatalogState::default());

        let state = catalog.refetch().await;
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        let names: Vec<&str> = state.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Aloo Paratha", "Zafrani Chai"]);
    }

    #[tokio::test]
    async fn refilter_applies_even_when_source_ignores_filter() {
        // FixedSource ignores the pushed-down filter entirely.
        let catalog = CatalogSource::by_category(FixedSource(raw_rows()), "CHAI");
        let state = catalog.refetch().await;
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items.first().unwrap().category, "CHAI");
    }

    #[tokio::test]
    async fn failed_fetch_resets_items_and_stores_error() {
        let catalog = CatalogSource::new(FixedSource(raw_rows()), MenuFilter::default());
        catalog.refetch().await;
        assert!(!catalog.state().items.is_empty());

        let catalog = CatalogSource::new(FailingSource, catalog.filter());
        let state = catalog.refetch().await;
        assert!(state.items.is_empty());
        assert!(!state.is_loading);
        assert!(state.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn invalid_record_fails_the_fetch() {
        let rows = json!([{ "id": "9", "name": "Broken", "description": "",
            "category": "CHAI", "price": "oops", "currency": "AED" }]);
        let catalog = CatalogSource::new(FixedSource(rows), MenuFilter::default());
        let state = catalog.refetch().await;
        assert!(state.items.is_empty());
        assert!(state.error.unwrap().contains("invalid menu record 9"));
    }

    #[tokio::test]
    async fn set_filter_enters_loading_and_clears_error() {
        let catalog = CatalogSource::new(FixedSource(raw_rows()), MenuFilter::default());
        let settled = catalog.refetch().await;
        assert!(!settled.is_loading);

        catalog.set_filter(MenuFilter::for_category("CHAI", None));
        let state = catalog.state();
        assert!(state.is_loading);
        assert!(state.error.is_none());

        // A stored failure is also cleared when the parameters change.
        let catalog = CatalogSource::new(FailingSource, MenuFilter::default());
        catalog.refetch().await;
        assert!(catalog.state().error.is_some());
        catalog.set_filter(MenuFilter::for_category("CHAI", None));
        let state = catalog.state();
        assert!(state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn stale_results_are_discarded_when_parameters_change() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let source = GatedSource {
            started: Arc::clone(&started),
            release: Arc::clone(&release),
            gate_first: std::sync::atomic::AtomicBool::new(true),
            rows: raw_rows(),
        };
        let catalog = CatalogSource::new(source, MenuFilter::default());

        let task = tokio::spawn({
            let catalog = catalog.clone();
            async move { catalog.refetch().await }
        });

        // Wait until the fetch is in flight, then change parameters under it.
        started.notified().await;
        catalog.set_filter(MenuFilter::for_category("CHAI", None));
        release.notify_one();

        let state = task.await.unwrap();
        // The late result was discarded: no items were published for the
        // superseded parameter set, and the catalog still reports loading
        // until the follow-up refetch settles.
        assert!(state.items.is_empty());
        assert!(state.is_loading);

        let state = catalog.refetch().await;
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items.first().unwrap().category, "CHAI");
    }

    #[tokio::test]
    async fn best_sellers_view_is_available_only() {
        let rows = json!([
            { "id": "1", "name": "Karak", "description": "", "category": "BEST SELLERS",
              "price": 5.0, "currency": "AED", "is_available": true },
            { "id": "2", "name": "Nihari", "description": "", "category": "BEST SELLERS",
              "price": 22.0, "currency": "AED", "is_available": false }
        ]);
        let catalog = CatalogSource::best_sellers(FixedSource(rows), Some(6));
        let state = catalog.refetch().await;
        let ids: Vec<&str> = state.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
    }
}
