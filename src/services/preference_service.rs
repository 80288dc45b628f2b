// src/services/preference_service.rs
//
// User Preference Store
//
// RULES:
// - Every state change goes through `reduce`
// - Mutating actions are written to storage after they are applied
// - Storage failures are logged and swallowed; the in-memory state stays authoritative
// - Hydration never writes back

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{error, info, warn};

use crate::domain::{reduce, ItemId, PreferenceAction, UserPreferenceState};
use crate::events::{EventBus, FavoriteToggled, ItemViewed, PreferencesHydrated};
use crate::repositories::PreferenceRepository;

pub struct PreferenceService {
    /// `None` disables persistence entirely
    repository: Option<Arc<dyn PreferenceRepository>>,
    storage_key: String,
    event_bus: Arc<EventBus>,
    state: Mutex<UserPreferenceState>,
}

impl PreferenceService {
    pub fn new(
        repository: Option<Arc<dyn PreferenceRepository>>,
        storage_key: impl Into<String>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            repository,
            storage_key: storage_key.into(),
            event_bus,
            state: Mutex::new(UserPreferenceState::default()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, UserPreferenceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_persistent(&self) -> bool {
        self.repository.is_some()
    }

    /// Apply `action` and persist the result when the action requires it
    ///
    /// The state lock covers both the transition and the write, so storage
    /// always receives states in the order they were produced.
    ///
    /// Returns the state after the transition.
    pub fn dispatch(&self, action: PreferenceAction) -> UserPreferenceState {
        let persist = action.is_persisted();

        let mut state = self.lock_state();
        let current = std::mem::take(&mut *state);
        *state = reduce(current, action);

        if persist {
            self.persist(&state);
        }

        state.clone()
    }

    pub fn toggle_favorite(&self, id: ItemId) -> bool {
        let next = self.dispatch(PreferenceAction::ToggleFavorite(id));
        let is_favorite = next.is_favorite(id);
        self.event_bus.emit(FavoriteToggled::new(id, is_favorite));
        is_favorite
    }

    pub fn add_to_recently_viewed(&self, id: ItemId) {
        self.dispatch(PreferenceAction::AddToRecentlyViewed(id));
        self.event_bus.emit(ItemViewed::new(id));
    }

    /// Replace the in-memory state with whatever storage holds
    ///
    /// Absent, unreadable, or unparseable data yields the empty state.
    pub fn hydrate_from_storage(&self) -> UserPreferenceState {
        let loaded = self.load_persisted();
        let state = self.dispatch(PreferenceAction::Hydrate(loaded));

        info!(
            "Preferences hydrated: {} favorites, {} recently viewed",
            state.favorites.len(),
            state.recently_viewed.len()
        );
        self.event_bus.emit(PreferencesHydrated::new(
            state.favorites.len(),
            state.recently_viewed.len(),
        ));

        state
    }

    fn load_persisted(&self) -> UserPreferenceState {
        let Some(repository) = &self.repository else {
            return UserPreferenceState::default();
        };

        match repository.load(&self.storage_key) {
            Ok(Some(raw)) => match serde_json::from_str::<UserPreferenceState>(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!(
                        "Stored preferences under '{}' are unreadable, starting empty: {}",
                        self.storage_key, e
                    );
                    UserPreferenceState::default()
                }
            },
            Ok(None) => UserPreferenceState::default(),
            Err(e) => {
                error!("Failed to load preferences: {}", e);
                UserPreferenceState::default()
            }
        }
    }

    fn persist(&self, state: &UserPreferenceState) {
        let Some(repository) = &self.repository else {
            return;
        };

        let result = serde_json::to_string(state)
            .map_err(crate::error::AppError::from)
            .and_then(|raw| repository.save(&self.storage_key, &raw));

        if let Err(e) = result {
            error!("Failed to persist preferences: {}", e);
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn state(&self) -> UserPreferenceState {
        self.lock_state().clone()
    }

    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.lock_state().is_favorite(id)
    }

    /// Favorite ids, ascending
    pub fn favorites(&self) -> Vec<ItemId> {
        self.lock_state().favorites.iter().copied().collect()
    }

    /// Most recent first
    pub fn recently_viewed(&self) -> Vec<ItemId> {
        self.lock_state().recently_viewed.clone()
    }
}
