// src/services/detail_service.rs
//
// Detail Cache & Fetch Coordinator
//
// RULES:
// - An id is never in `pending` and `cache` at the same time
// - At most one request per id while it is pending; overlapping triggers share it
// - One failing id never affects the others in the same batch
// - Failed ids are retried on the next batch that names them

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use serde::Serialize;

use crate::domain::{extract_abilities, DetailRecord, ItemId};
use crate::error::{AppError, AppResult};
use crate::events::{DetailCached, DetailFetchFailed, EventBus};
use crate::integrations::CatalogApi;

type SharedFetch = Shared<BoxFuture<'static, Result<DetailRecord, String>>>;

#[derive(Default)]
struct DetailState {
    cache: HashMap<ItemId, DetailRecord>,
    pending: HashMap<ItemId, SharedFetch>,
    failed: BTreeMap<ItemId, String>,
}

/// Result of one `fetch_missing` pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailBatchReport {
    /// Requests this pass started (ids already pending are shared, not counted)
    pub issued: usize,
    pub cached: Vec<ItemId>,
    pub failed: Vec<(ItemId, String)>,
}

pub struct DetailService {
    api: Arc<dyn CatalogApi>,
    event_bus: Arc<EventBus>,
    state: Arc<Mutex<DetailState>>,
}

fn lock(state: &Mutex<DetailState>) -> MutexGuard<'_, DetailState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl DetailService {
    pub fn new(api: Arc<dyn CatalogApi>, event_bus: Arc<EventBus>) -> Self {
        Self {
            api,
            event_bus,
            state: Arc::new(Mutex::new(DetailState::default())),
        }
    }

    /// Build the shared request for `id`
    ///
    /// Must be registered in `pending` by the caller under the same lock
    /// acquisition that decided to start it. Settlement moves the id out of
    /// `pending` and into `cache` or `failed` in one step.
    fn start_fetch(&self, id: ItemId) -> SharedFetch {
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let event_bus = Arc::clone(&self.event_bus);

        async move {
            debug!("Fetching detail for item {}", id);
            let result = api.fetch_detail(id).await.map_err(|e| e.to_string());

            {
                let mut guard = lock(&state);
                guard.pending.remove(&id);
                match &result {
                    Ok(record) => {
                        guard.failed.remove(&id);
                        guard.cache.insert(id, record.clone());
                    }
                    Err(message) => {
                        guard.failed.insert(id, message.clone());
                    }
                }
            }

            match &result {
                Ok(_) => event_bus.emit(DetailCached::new(id)),
                Err(message) => {
                    warn!("Detail fetch for item {} failed: {}", id, message);
                    event_bus.emit(DetailFetchFailed::new(id, message.clone()));
                }
            }

            result
        }
        .boxed()
        .shared()
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Fetch every id in `ids` that is neither cached nor pending
    ///
    /// Ids already pending from an earlier pass are awaited alongside the new
    /// requests without issuing a second request.
    pub async fn fetch_missing(&self, ids: &[ItemId]) -> DetailBatchReport {
        let mut issued = 0;
        let mut in_progress = Vec::new();

        {
            let mut state = lock(&self.state);
            let mut seen = HashSet::new();

            for &id in ids {
                if !seen.insert(id) || state.cache.contains_key(&id) {
                    continue;
                }
                if let Some(existing) = state.pending.get(&id) {
                    in_progress.push((id, existing.clone()));
                    continue;
                }

                let fetch = self.start_fetch(id);
                state.pending.insert(id, fetch.clone());
                in_progress.push((id, fetch));
                issued += 1;
            }
        }

        if in_progress.is_empty() {
            return DetailBatchReport::default();
        }

        let results = join_all(
            in_progress
                .into_iter()
                .map(|(id, fetch)| async move { (id, fetch.await) }),
        )
        .await;

        let mut report = DetailBatchReport {
            issued,
            ..DetailBatchReport::default()
        };
        for (id, result) in results {
            match result {
                Ok(_) => report.cached.push(id),
                Err(message) => report.failed.push((id, message)),
            }
        }

        debug!(
            "Detail batch settled: {} issued, {} cached, {} failed",
            report.issued,
            report.cached.len(),
            report.failed.len()
        );

        report
    }

    /// Cached record for `id`, otherwise the result of the (possibly shared) request
    pub async fn get_or_fetch(&self, id: ItemId) -> AppResult<DetailRecord> {
        let fetch = {
            let mut state = lock(&self.state);
            if let Some(record) = state.cache.get(&id) {
                return Ok(record.clone());
            }
            match state.pending.get(&id) {
                Some(existing) => existing.clone(),
                None => {
                    let fetch = self.start_fetch(id);
                    state.pending.insert(id, fetch.clone());
                    fetch
                }
            }
        };

        fetch.await.map_err(AppError::Network)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn get_cached(&self, id: ItemId) -> Option<DetailRecord> {
        lock(&self.state).cache.get(&id).cloned()
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.state).pending.len()
    }

    pub fn cached_count(&self) -> usize {
        lock(&self.state).cache.len()
    }

    /// Ids whose most recent fetch failed, ascending
    pub fn failed_ids(&self) -> Vec<ItemId> {
        lock(&self.state).failed.keys().copied().collect()
    }

    /// Sorted, deduplicated ability names over every cached record
    pub fn available_abilities(&self) -> Vec<String> {
        extract_abilities(lock(&self.state).cache.values())
    }

    /// Run `f` against the cache without cloning it
    ///
    /// `f` must not call back into this service.
    pub fn with_cache<R>(&self, f: impl FnOnce(&HashMap<ItemId, DetailRecord>) -> R) -> R {
        f(&lock(&self.state).cache)
    }
}
