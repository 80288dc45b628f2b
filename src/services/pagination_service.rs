// src/services/pagination_service.rs
//
// Accumulation & Pagination Engine
//
// RULES:
// - The collection only grows; an id already held is never added twice
// - At most one page request in flight; extra triggers are no-ops
// - A failed fetch changes nothing except the last error
// - Events are emitted after the state lock is released

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{info, warn};
use serde::Serialize;

use crate::domain::{ItemId, ListItem};
use crate::error::AppResult;
use crate::events::{EventBus, PageLoadFailed, PageLoaded};
use crate::integrations::CatalogApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationCursor {
    pub page_index: u32,
    pub has_next_page: bool,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self {
            page_index: 0,
            has_next_page: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Loaded {
        page_index: u32,
        /// Items that were not already held
        new_items: Vec<ListItem>,
    },
    Skipped(SkipReason),
}

impl PageOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, PageOutcome::Loaded { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InFlight,
    NoNextPage,
    AtFirstPage,
    AlreadyLoaded,
    /// `advance`/`retreat` before the first page arrived
    NotLoaded,
}

#[derive(Debug, Default)]
struct PaginationState {
    cursor: PaginationCursor,
    total_count: Option<u32>,
    items: Vec<ListItem>,
    known_ids: HashSet<ItemId>,
    in_flight: bool,
    loaded: bool,
    last_error: Option<String>,
}

impl PaginationState {
    fn merge(&mut self, incoming: Vec<ListItem>) -> Vec<ListItem> {
        let mut added = Vec::new();
        for item in incoming {
            if self.known_ids.insert(item.id) {
                self.items.push(item.clone());
                added.push(item);
            }
        }
        added
    }
}

/// Clears the in-flight flag when the request settles or is dropped mid-await
struct InFlightGuard<'a> {
    state: &'a Mutex<PaginationState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight = false;
    }
}

pub struct PaginationService {
    api: Arc<dyn CatalogApi>,
    event_bus: Arc<EventBus>,
    page_size: u32,
    state: Mutex<PaginationState>,
}

impl PaginationService {
    pub fn new(api: Arc<dyn CatalogApi>, event_bus: Arc<EventBus>, page_size: u32) -> Self {
        Self {
            api,
            event_bus,
            page_size: page_size.max(1),
            state: Mutex::new(PaginationState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PaginationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Fetch page 0 unless something has been loaded already
    pub async fn load_initial(&self) -> AppResult<PageOutcome> {
        let guard = {
            let mut state = self.lock_state();
            if state.loaded {
                return Ok(PageOutcome::Skipped(SkipReason::AlreadyLoaded));
            }
            match self.try_begin(&mut state) {
                Some(guard) => guard,
                None => return Ok(PageOutcome::Skipped(SkipReason::InFlight)),
            }
        };

        self.fetch_and_commit(0, guard).await
    }

    /// Fetch `page_index + 1` and merge it into the collection
    pub async fn advance(&self) -> AppResult<PageOutcome> {
        let (target, guard) = {
            let mut state = self.lock_state();
            if !state.loaded {
                return Ok(PageOutcome::Skipped(SkipReason::NotLoaded));
            }
            if state.in_flight {
                return Ok(PageOutcome::Skipped(SkipReason::InFlight));
            }
            if !state.cursor.has_next_page {
                return Ok(PageOutcome::Skipped(SkipReason::NoNextPage));
            }
            let target = state.cursor.page_index + 1;
            match self.try_begin(&mut state) {
                Some(guard) => (target, guard),
                None => return Ok(PageOutcome::Skipped(SkipReason::InFlight)),
            }
        };

        self.fetch_and_commit(target, guard).await
    }

    /// Step the cursor back one page
    ///
    /// The previous page is fetched again and merged (usually adding nothing);
    /// accumulated items are never removed. The decrement is committed only
    /// when that fetch succeeds.
    pub async fn retreat(&self) -> AppResult<PageOutcome> {
        let (target, guard) = {
            let mut state = self.lock_state();
            if !state.loaded {
                return Ok(PageOutcome::Skipped(SkipReason::NotLoaded));
            }
            if state.in_flight {
                return Ok(PageOutcome::Skipped(SkipReason::InFlight));
            }
            if state.cursor.page_index == 0 {
                return Ok(PageOutcome::Skipped(SkipReason::AtFirstPage));
            }
            let target = state.cursor.page_index - 1;
            match self.try_begin(&mut state) {
                Some(guard) => (target, guard),
                None => return Ok(PageOutcome::Skipped(SkipReason::InFlight)),
            }
        };

        self.fetch_and_commit(target, guard).await
    }

    fn try_begin<'a>(&'a self, state: &mut PaginationState) -> Option<InFlightGuard<'a>> {
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        Some(InFlightGuard { state: &self.state })
    }

    async fn fetch_and_commit(
        &self,
        page_index: u32,
        guard: InFlightGuard<'_>,
    ) -> AppResult<PageOutcome> {
        let offset = page_index.saturating_mul(self.page_size);
        let result = self.api.fetch_page(offset, self.page_size).await;

        match result {
            Ok(page) => {
                let (new_items, total_count, has_next_page) = {
                    let mut state = self.lock_state();
                    state.cursor = PaginationCursor {
                        page_index,
                        has_next_page: page.has_next_page,
                    };
                    state.total_count = Some(page.count);
                    state.loaded = true;
                    state.last_error = None;
                    let added = state.merge(page.items);
                    (added, page.count, page.has_next_page)
                };
                drop(guard);

                info!(
                    "Loaded page {} ({} new items, {} total upstream)",
                    page_index,
                    new_items.len(),
                    total_count
                );
                self.event_bus.emit(PageLoaded::new(
                    page_index,
                    new_items.len(),
                    total_count,
                    has_next_page,
                ));

                Ok(PageOutcome::Loaded {
                    page_index,
                    new_items,
                })
            }
            Err(e) => {
                let message = e.to_string();
                self.lock_state().last_error = Some(message.clone());
                drop(guard);

                warn!("Failed to load page {}: {}", page_index, message);
                self.event_bus.emit(PageLoadFailed::new(page_index, message));

                Err(e)
            }
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.lock_state().cursor
    }

    pub fn current_page_index(&self) -> u32 {
        self.lock_state().cursor.page_index
    }

    pub fn has_next_page(&self) -> bool {
        self.lock_state().cursor.has_next_page
    }

    /// ceil(total upstream count / page size); 0 until a page has arrived
    pub fn total_page_count(&self) -> u32 {
        self.lock_state()
            .total_count
            .map(|count| count.div_ceil(self.page_size))
            .unwrap_or(0)
    }

    pub fn total_count(&self) -> Option<u32> {
        self.lock_state().total_count
    }

    pub fn items(&self) -> Vec<ListItem> {
        self.lock_state().items.clone()
    }

    pub fn item_ids(&self) -> Vec<ItemId> {
        self.lock_state().items.iter().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.lock_state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_loaded(&self) -> bool {
        self.lock_state().loaded
    }

    /// First page requested and not yet arrived
    pub fn is_loading(&self) -> bool {
        let state = self.lock_state();
        state.in_flight && !state.loaded
    }

    /// A page after the first is in flight
    pub fn is_loading_more(&self) -> bool {
        let state = self.lock_state();
        state.in_flight && state.loaded
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock_state().last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::integrations::{ListPage, MockCatalogApi};
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn page(ids: &[ItemId], count: u32, has_next_page: bool) -> ListPage {
        ListPage {
            count,
            has_next_page,
            items: ids
                .iter()
                .map(|id| {
                    ListItem::new(
                        *id,
                        format!("item-{}", id),
                        format!("https://example.test/items/{}/", id),
                    )
                })
                .collect(),
        }
    }

    fn service(api: MockCatalogApi, page_size: u32) -> PaginationService {
        PaginationService::new(Arc::new(api), Arc::new(EventBus::new()), page_size)
    }

    /// Every page request blocks until a permit is released
    struct GatedCatalog {
        calls: AtomicUsize,
        release: Semaphore,
    }

    impl GatedCatalog {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                release: Semaphore::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogApi for GatedCatalog {
        async fn fetch_page(&self, offset: u32, limit: u32) -> AppResult<ListPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release
                .acquire()
                .await
                .map_err(|e| AppError::Other(e.to_string()))?
                .forget();
            let ids: Vec<ItemId> = (offset + 1..=offset + limit).collect();
            Ok(page(&ids, 10, true))
        }

        async fn fetch_detail(&self, id: ItemId) -> AppResult<crate::domain::DetailRecord> {
            Err(AppError::Network(format!("no detail for {}", id)))
        }
    }

    async fn wait_for_calls(api: &GatedCatalog, calls: usize) {
        while api.calls() < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_initial_load_sets_cursor_and_count() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .with(eq(0), eq(20))
            .times(1)
            .returning(|_, _| Ok(page(&[1, 2, 3], 45, true)));

        let svc = service(api, 20);
        let outcome = svc.load_initial().await.unwrap();

        assert!(outcome.is_loaded());
        assert_eq!(svc.current_page_index(), 0);
        assert!(svc.has_next_page());
        assert_eq!(svc.total_page_count(), 3);
        assert_eq!(svc.item_ids(), vec![1, 2, 3]);

        // Second call is a no-op
        assert_eq!(
            svc.load_initial().await.unwrap(),
            PageOutcome::Skipped(SkipReason::AlreadyLoaded)
        );
    }

    #[tokio::test]
    async fn test_advance_requests_next_offset_and_dedups_overlap() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .with(eq(0), eq(3))
            .returning(|_, _| Ok(page(&[1, 2, 3], 7, true)));
        api.expect_fetch_page()
            .with(eq(3), eq(3))
            .returning(|_, _| Ok(page(&[3, 4, 5], 7, true)));

        let svc = service(api, 3);
        svc.load_initial().await.unwrap();
        let outcome = svc.advance().await.unwrap();

        match outcome {
            PageOutcome::Loaded {
                page_index,
                new_items,
            } => {
                assert_eq!(page_index, 1);
                assert_eq!(new_items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![4, 5]);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(svc.item_ids(), vec![1, 2, 3, 4, 5]);
        assert_eq!(svc.current_page_index(), 1);
    }

    #[tokio::test]
    async fn test_advance_stops_without_next_page() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page(&[1], 1, false)));

        let svc = service(api, 20);
        svc.load_initial().await.unwrap();

        assert_eq!(
            svc.advance().await.unwrap(),
            PageOutcome::Skipped(SkipReason::NoNextPage)
        );
        assert_eq!(svc.total_page_count(), 1);
    }

    #[tokio::test]
    async fn test_advance_before_first_page_is_skipped() {
        let svc = service(MockCatalogApi::new(), 20);
        assert_eq!(
            svc.advance().await.unwrap(),
            PageOutcome::Skipped(SkipReason::NotLoaded)
        );
    }

    #[tokio::test]
    async fn test_failed_advance_leaves_state_unchanged() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .with(eq(0), eq(2))
            .returning(|_, _| Ok(page(&[1, 2], 10, true)));
        api.expect_fetch_page()
            .with(eq(2), eq(2))
            .times(1)
            .returning(|_, _| Err(AppError::Network("connection reset".to_string())));

        let svc = service(api, 2);
        svc.load_initial().await.unwrap();

        let err = svc.advance().await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(svc.current_page_index(), 0);
        assert!(svc.has_next_page());
        assert_eq!(svc.item_ids(), vec![1, 2]);
        assert!(!svc.is_loading_more());
        assert!(svc.last_error().unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_retreat_keeps_accumulated_items() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page()
            .with(eq(0), eq(2))
            .returning(|_, _| Ok(page(&[1, 2], 6, true)));
        api.expect_fetch_page()
            .with(eq(2), eq(2))
            .returning(|_, _| Ok(page(&[3, 4], 6, true)));

        let svc = service(api, 2);
        assert_eq!(
            svc.retreat().await.unwrap(),
            PageOutcome::Skipped(SkipReason::NotLoaded)
        );

        svc.load_initial().await.unwrap();
        assert_eq!(
            svc.retreat().await.unwrap(),
            PageOutcome::Skipped(SkipReason::AtFirstPage)
        );

        svc.advance().await.unwrap();
        assert_eq!(svc.current_page_index(), 1);

        let outcome = svc.retreat().await.unwrap();
        assert_eq!(
            outcome,
            PageOutcome::Loaded {
                page_index: 0,
                new_items: Vec::new()
            }
        );
        assert_eq!(svc.current_page_index(), 0);
        assert_eq!(svc.item_ids(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_initial_failure_can_be_retried() {
        let mut api = MockCatalogApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(AppError::Network("offline".to_string())));
        api.expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&[1], 1, false)));

        let svc = service(api, 20);
        assert!(svc.load_initial().await.is_err());
        assert!(!svc.has_loaded());
        assert_eq!(svc.total_page_count(), 0);

        assert!(svc.load_initial().await.unwrap().is_loaded());
        assert!(svc.last_error().is_none());
    }

    #[tokio::test]
    async fn test_requests_while_in_flight_are_skipped() {
        let api = Arc::new(GatedCatalog::new());
        let svc = Arc::new(PaginationService::new(
            Arc::clone(&api) as Arc<dyn CatalogApi>,
            Arc::new(EventBus::new()),
            2,
        ));
        api.release.add_permits(1);
        svc.load_initial().await.unwrap();

        let first = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.advance().await })
        };
        wait_for_calls(&api, 2).await;
        assert!(svc.is_loading_more());

        assert_eq!(
            svc.advance().await.unwrap(),
            PageOutcome::Skipped(SkipReason::InFlight)
        );

        api.release.add_permits(1);
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, PageOutcome::Loaded { page_index: 1, .. }));
        assert_eq!(api.calls(), 2);
        assert_eq!(svc.current_page_index(), 1);
        assert_eq!(svc.item_ids(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_retreat_is_skipped_while_advance_in_flight() {
        let api = Arc::new(GatedCatalog::new());
        let svc = Arc::new(PaginationService::new(
            Arc::clone(&api) as Arc<dyn CatalogApi>,
            Arc::new(EventBus::new()),
            2,
        ));
        api.release.add_permits(2);
        svc.load_initial().await.unwrap();
        svc.advance().await.unwrap();
        assert_eq!(svc.current_page_index(), 1);

        let pending = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.advance().await })
        };
        wait_for_calls(&api, 3).await;

        assert_eq!(
            svc.retreat().await.unwrap(),
            PageOutcome::Skipped(SkipReason::InFlight)
        );
        assert_eq!(svc.current_page_index(), 1);

        api.release.add_permits(1);
        assert!(pending.await.unwrap().unwrap().is_loaded());
        assert_eq!(api.calls(), 3);
        assert_eq!(svc.current_page_index(), 2);
    }
}
