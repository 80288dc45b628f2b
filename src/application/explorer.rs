// src/application/explorer.rs
//
// Presentation-facing API
//
// ARCHITECTURE:
// - Composes the pagination, detail, view and preference services
// - Returns DTOs; never exposes service internals
// - After every successful page merge, detail synchronization for the whole
//   collection is spawned on the runtime, so page results are visible before
//   their details arrive

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{error, warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::application::dto::{
    ExplorerStatusDto, GridRowDto, ItemCardDto, ItemDetailDto, PageIndicatorDto, PreferencesDto,
};
use crate::application::grid::{GridLayout, ScrollMetrics};
use crate::config::ExplorerConfig;
use crate::domain::{FilterCriteria, ItemId, ListItem};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::{CatalogApi, HttpCatalogClient};
use crate::repositories::{PreferenceRepository, SqlitePreferenceRepository};
use crate::services::{
    DetailBatchReport, DetailService, PageOutcome, PaginationService, PreferenceService,
    ViewService,
};

/// Cheap to clone; every clone drives the same state
#[derive(Clone)]
pub struct CatalogExplorer {
    event_bus: Arc<EventBus>,
    pagination: Arc<PaginationService>,
    details: Arc<DetailService>,
    view: Arc<ViewService>,
    preferences: Arc<PreferenceService>,
    detail_tasks: Arc<Mutex<Vec<JoinHandle<DetailBatchReport>>>>,
}

impl CatalogExplorer {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        repository: Option<Arc<dyn PreferenceRepository>>,
        config: &ExplorerConfig,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new());

        Self {
            pagination: Arc::new(PaginationService::new(
                Arc::clone(&api),
                Arc::clone(&event_bus),
                config.page_size,
            )),
            details: Arc::new(DetailService::new(api, Arc::clone(&event_bus))),
            view: Arc::new(ViewService::new(Arc::clone(&event_bus))),
            preferences: Arc::new(PreferenceService::new(
                repository,
                config.preferences_key.clone(),
                Arc::clone(&event_bus),
            )),
            event_bus,
            detail_tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// HTTP catalog client plus SQLite preferences, as configured
    ///
    /// A preference store that cannot be opened degrades to memory-only
    /// preferences instead of failing startup.
    pub fn from_config(config: &ExplorerConfig) -> AppResult<Self> {
        config.validate()?;
        let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalogClient::new(config)?);

        let repository: Option<Arc<dyn PreferenceRepository>> = if config.persistence_enabled {
            match config
                .resolve_storage_path()
                .and_then(|path| SqlitePreferenceRepository::open(&path))
            {
                Ok(repo) => Some(Arc::new(repo) as Arc<dyn PreferenceRepository>),
                Err(e) => {
                    error!("Preference storage unavailable, continuing without it: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self::new(api, repository, config))
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    // ========================================================================
    // PAGINATION
    // ========================================================================

    /// Load persisted preferences; call once at startup
    pub fn hydrate_preferences(&self) -> PreferencesDto {
        self.preferences.hydrate_from_storage().into()
    }

    pub async fn load_initial(&self) -> AppResult<PageOutcome> {
        let outcome = self.pagination.load_initial().await?;
        self.after_page(&outcome);
        Ok(outcome)
    }

    pub async fn advance(&self) -> AppResult<PageOutcome> {
        let outcome = self.pagination.advance().await?;
        self.after_page(&outcome);
        Ok(outcome)
    }

    pub async fn retreat(&self) -> AppResult<PageOutcome> {
        let outcome = self.pagination.retreat().await?;
        self.after_page(&outcome);
        Ok(outcome)
    }

    /// Infinite scroll: advance once the list is scrolled near its end
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> AppResult<Option<PageOutcome>> {
        if !metrics.near_bottom()
            || !self.pagination.has_next_page()
            || self.pagination.is_loading()
            || self.pagination.is_loading_more()
        {
            return Ok(None);
        }

        self.advance().await.map(Some)
    }

    pub fn current_page_index(&self) -> u32 {
        self.pagination.current_page_index()
    }

    pub fn total_page_count(&self) -> u32 {
        self.pagination.total_page_count()
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination.has_next_page()
    }

    pub fn page_indicator(&self) -> PageIndicatorDto {
        let cursor = self.pagination.cursor();
        PageIndicatorDto {
            current_page: cursor.page_index + 1,
            total_pages: self.pagination.total_page_count(),
            has_previous_page: cursor.page_index > 0,
            has_next_page: cursor.has_next_page,
        }
    }

    fn after_page(&self, outcome: &PageOutcome) {
        if outcome.is_loaded() {
            self.sync_details();
        }
    }

    /// Spawn a detail batch for every collection id not yet cached or pending
    ///
    /// Outside a Tokio runtime nothing is spawned; the next sync made inside
    /// one covers the whole collection again.
    fn sync_details(&self) {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Skipping detail sync, no Tokio runtime: {}", e);
                return;
            }
        };

        let ids = self.pagination.item_ids();
        let details = Arc::clone(&self.details);
        let handle = runtime.spawn(async move { details.fetch_missing(&ids).await });

        let mut tasks = self.lock_tasks();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    fn lock_tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<DetailBatchReport>>> {
        self.detail_tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait for every spawned detail batch, including ones spawned meanwhile
    pub async fn settle_details(&self) -> Vec<DetailBatchReport> {
        let mut reports = Vec::new();
        loop {
            let tasks = std::mem::take(&mut *self.lock_tasks());
            if tasks.is_empty() {
                return reports;
            }
            for task in tasks {
                match task.await {
                    Ok(report) => reports.push(report),
                    Err(e) => warn!("Detail batch task ended abnormally: {}", e),
                }
            }
        }
    }

    // ========================================================================
    // FILTER & SEARCH
    // ========================================================================

    pub fn set_name_query(&self, query: impl Into<String>) {
        self.view.set_name_query(query);
    }

    pub fn set_filter_criteria(&self, criteria: FilterCriteria) {
        self.view.set_filter_criteria(criteria);
    }

    pub fn name_query(&self) -> String {
        self.view.name_query()
    }

    pub fn filter_criteria(&self) -> FilterCriteria {
        self.view.filter_criteria()
    }

    pub fn visible_items(&self) -> Vec<ListItem> {
        let visible = self.view.visible_items(&self.pagination, &self.details);
        Vec::clone(&visible)
    }

    pub fn visible_cards(&self) -> Vec<ItemCardDto> {
        let visible = self.view.visible_items(&self.pagination, &self.details);
        let favorites = self.preferences.state();

        visible
            .iter()
            .map(|item| ItemCardDto::from_item(item, favorites.is_favorite(item.id)))
            .collect()
    }

    pub fn available_abilities(&self) -> Vec<String> {
        self.details.available_abilities()
    }

    pub fn row_count(&self, layout: &GridLayout) -> usize {
        layout.row_count(self.view.visible_items(&self.pagination, &self.details).len())
    }

    pub fn row_at(&self, layout: &GridLayout, index: usize) -> GridRowDto {
        let visible = self.view.visible_items(&self.pagination, &self.details);
        let row = layout.row_at(visible.as_slice(), index);
        let favorites = self.preferences.state();

        GridRowDto {
            index: row.index,
            cards: row
                .cards
                .iter()
                .map(|item| ItemCardDto::from_item(item, favorites.is_favorite(item.id)))
                .collect(),
            empty_slots: row.empty_slots,
        }
    }

    // ========================================================================
    // DETAIL VIEW & PREFERENCES
    // ========================================================================

    /// Open the detail view for `id` and record it as recently viewed
    pub async fn view_item(&self, id: ItemId) -> AppResult<ItemDetailDto> {
        let record = self.details.get_or_fetch(id).await?;
        self.preferences.add_to_recently_viewed(id);
        Ok(ItemDetailDto::from_record(
            &record,
            self.preferences.is_favorite(id),
        ))
    }

    /// Returns whether `id` is a favorite afterwards
    pub fn toggle_favorite(&self, id: ItemId) -> bool {
        self.preferences.toggle_favorite(id)
    }

    pub fn add_to_recently_viewed(&self, id: ItemId) {
        self.preferences.add_to_recently_viewed(id);
    }

    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.preferences.is_favorite(id)
    }

    pub fn preferences(&self) -> PreferencesDto {
        self.preferences.state().into()
    }

    pub fn status(&self) -> ExplorerStatusDto {
        ExplorerStatusDto {
            is_loading: self.pagination.is_loading(),
            is_loading_more: self.pagination.is_loading_more(),
            list_error: self.pagination.last_error(),
            pending_details: self.details.pending_count(),
            cached_details: self.details.cached_count(),
            failed_details: self.details.failed_ids(),
        }
    }
}
