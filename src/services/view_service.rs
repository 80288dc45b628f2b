// src/services/view_service.rs
//
// Filter & search state plus the memoized visible list
//
// The visible list is a pure function of (collection, detail cache, query,
// criteria). It is recomputed only when one of those moved since the last
// computation: the collection and cache only grow, so their sizes together
// with a revision counter for the filter inputs identify a state exactly.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::domain::{apply_filters, FilterCriteria, ListItem};
use crate::events::{EventBus, FiltersChanged};
use crate::services::{DetailService, PaginationService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewKey {
    collection_len: usize,
    cached_details: usize,
    filter_revision: u64,
}

#[derive(Debug, Default)]
struct ViewState {
    name_query: String,
    criteria: FilterCriteria,
    filter_revision: u64,
    memo: Option<(ViewKey, Arc<Vec<ListItem>>)>,
}

pub struct ViewService {
    event_bus: Arc<EventBus>,
    state: Mutex<ViewState>,
}

impl ViewService {
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            event_bus,
            state: Mutex::new(ViewState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_name_query(&self, query: impl Into<String>) {
        let query = query.into();
        let criteria_active = {
            let mut state = self.lock_state();
            if state.name_query == query {
                return;
            }
            state.name_query = query.clone();
            state.filter_revision += 1;
            state.criteria.is_active()
        };

        self.event_bus.emit(FiltersChanged::new(query, criteria_active));
    }

    pub fn set_filter_criteria(&self, criteria: FilterCriteria) {
        let (name_query, criteria_active) = {
            let mut state = self.lock_state();
            if state.criteria == criteria {
                return;
            }
            let active = criteria.is_active();
            state.criteria = criteria;
            state.filter_revision += 1;
            (state.name_query.clone(), active)
        };

        self.event_bus
            .emit(FiltersChanged::new(name_query, criteria_active));
    }

    pub fn clear_filters(&self) {
        self.set_filter_criteria(FilterCriteria::default());
    }

    pub fn name_query(&self) -> String {
        self.lock_state().name_query.clone()
    }

    pub fn filter_criteria(&self) -> FilterCriteria {
        self.lock_state().criteria.clone()
    }

    /// Collection items passing the name query and attribute criteria, in
    /// collection order
    pub fn visible_items(
        &self,
        pagination: &PaginationService,
        details: &DetailService,
    ) -> Arc<Vec<ListItem>> {
        let mut state = self.lock_state();

        // Read the key before the inputs: the result can only be newer than it
        let key = ViewKey {
            collection_len: pagination.len(),
            cached_details: details.cached_count(),
            filter_revision: state.filter_revision,
        };

        if let Some((memo_key, items)) = &state.memo {
            if *memo_key == key {
                return Arc::clone(items);
            }
        }

        let items = pagination.items();
        let visible = details.with_cache(|cache| {
            apply_filters(&items, cache, &state.name_query, &state.criteria)
        });
        debug!(
            "Recomputed visible list: {} of {} items",
            visible.len(),
            items.len()
        );

        let visible = Arc::new(visible);
        state.memo = Some((key, Arc::clone(&visible)));
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ability, DetailRecord, ItemId};
    use crate::integrations::{ListPage, MockCatalogApi};

    fn list_page(ids: &[(ItemId, &str)]) -> ListPage {
        ListPage {
            count: ids.len() as u32,
            has_next_page: false,
            items: ids
                .iter()
                .map(|(id, name)| {
                    ListItem::new(*id, *name, format!("https://example.test/items/{}/", id))
                })
                .collect(),
        }
    }

    fn detail(id: ItemId, height: u32, ability: &str) -> DetailRecord {
        DetailRecord {
            id,
            name: format!("item-{}", id),
            height,
            weight: 100,
            abilities: vec![Ability::new(ability, false)],
            types: Vec::new(),
            stats: Vec::new(),
            image_url: None,
        }
    }

    async fn fixture() -> (PaginationService, DetailService) {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_page().returning(|_, _| {
            Ok(list_page(&[(1, "bulbasaur"), (4, "charmander"), (7, "squirtle")]))
        });
        api.expect_fetch_detail().returning(|id| {
            Ok(match id {
                1 => detail(1, 7, "overgrow"),
                4 => detail(4, 6, "blaze"),
                _ => detail(id, 5, "torrent"),
            })
        });

        let api = Arc::new(api);
        let bus = Arc::new(EventBus::new());
        let pagination = PaginationService::new(api.clone(), bus.clone(), 20);
        let details = DetailService::new(api, bus);
        pagination.load_initial().await.unwrap();
        (pagination, details)
    }

    #[tokio::test]
    async fn test_without_filters_everything_is_visible() {
        let (pagination, details) = fixture().await;
        let view = ViewService::new(Arc::new(EventBus::new()));

        let visible = view.visible_items(&pagination, &details);
        assert_eq!(visible.len(), 3);
    }

    #[tokio::test]
    async fn test_name_query_and_criteria_combine() {
        let (pagination, details) = fixture().await;
        details.fetch_missing(&pagination.item_ids()).await;
        let view = ViewService::new(Arc::new(EventBus::new()));

        view.set_name_query("SAUR");
        let visible = view.visible_items(&pagination, &details);
        assert_eq!(visible.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1]);

        view.set_name_query("");
        view.set_filter_criteria(FilterCriteria::default().with_max_height(6));
        let visible = view.visible_items(&pagination, &details);
        assert_eq!(visible.iter().map(|i| i.id).collect::<Vec<_>>(), vec![4, 7]);
    }

    #[tokio::test]
    async fn test_memo_reused_until_inputs_change() {
        let (pagination, details) = fixture().await;
        let view = ViewService::new(Arc::new(EventBus::new()));
        view.set_filter_criteria(FilterCriteria::default().with_ability("blaze"));

        // No details yet: an active filter hides everything
        let before = view.visible_items(&pagination, &details);
        assert!(before.is_empty());
        let again = view.visible_items(&pagination, &details);
        assert!(Arc::ptr_eq(&before, &again));

        // New details invalidate the memo
        details.fetch_missing(&pagination.item_ids()).await;
        let after = view.visible_items(&pagination, &details);
        assert_eq!(after.iter().map(|i| i.id).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_unchanged_filter_emits_nothing() {
        let bus = Arc::new(EventBus::new());
        let view = ViewService::new(Arc::clone(&bus));

        view.set_name_query("pika");
        view.set_name_query("pika");
        view.clear_filters();

        assert_eq!(bus.get_event_log().len(), 1);
    }
}
