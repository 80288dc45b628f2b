use super::entity::{UserPreferenceState, RECENTLY_VIEWED_LIMIT};
use crate::domain::catalog::ItemId;

/// Every transition the preference state supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceAction {
    ToggleFavorite(ItemId),
    AddToRecentlyViewed(ItemId),
    /// Replaces the whole state; used once at startup
    Hydrate(UserPreferenceState),
}

impl PreferenceAction {
    /// Whether the resulting state must be written to durable storage
    pub fn is_persisted(&self) -> bool {
        !matches!(self, PreferenceAction::Hydrate(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            PreferenceAction::ToggleFavorite(_) => "toggle_favorite",
            PreferenceAction::AddToRecentlyViewed(_) => "add_to_recently_viewed",
            PreferenceAction::Hydrate(_) => "hydrate",
        }
    }
}

/// Pure transition function
pub fn reduce(mut state: UserPreferenceState, action: PreferenceAction) -> UserPreferenceState {
    match action {
        PreferenceAction::ToggleFavorite(id) => {
            if !state.favorites.remove(&id) {
                state.favorites.insert(id);
            }
            state
        }
        PreferenceAction::AddToRecentlyViewed(id) => {
            state.recently_viewed.retain(|existing| *existing != id);
            state.recently_viewed.insert(0, id);
            state.recently_viewed.truncate(RECENTLY_VIEWED_LIMIT);
            state
        }
        PreferenceAction::Hydrate(next) => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_favorite_is_its_own_inverse() {
        let mut initial = UserPreferenceState::new();
        initial.favorites.insert(1);
        initial.favorites.insert(7);

        let once = reduce(initial.clone(), PreferenceAction::ToggleFavorite(25));
        assert!(once.is_favorite(25));

        let twice = reduce(once, PreferenceAction::ToggleFavorite(25));
        assert_eq!(twice, initial);
    }

    #[test]
    fn test_toggle_removes_existing_favorite() {
        let mut initial = UserPreferenceState::new();
        initial.favorites.insert(1);

        let state = reduce(initial, PreferenceAction::ToggleFavorite(1));
        assert!(state.favorites.is_empty());
    }

    #[test]
    fn test_recently_viewed_evicts_oldest_beyond_limit() {
        let state = (1..=11).fold(UserPreferenceState::new(), |state, id| {
            reduce(state, PreferenceAction::AddToRecentlyViewed(id))
        });

        assert_eq!(state.recently_viewed.len(), RECENTLY_VIEWED_LIMIT);
        assert_eq!(state.recently_viewed, vec![11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    }

    #[test]
    fn test_recently_viewed_moves_existing_to_front() {
        let state = [1, 2, 3].into_iter().fold(UserPreferenceState::new(), |state, id| {
            reduce(state, PreferenceAction::AddToRecentlyViewed(id))
        });
        assert_eq!(state.recently_viewed, vec![3, 2, 1]);

        let state = reduce(state, PreferenceAction::AddToRecentlyViewed(1));
        assert_eq!(state.recently_viewed, vec![1, 3, 2]);
    }

    #[test]
    fn test_hydrate_replaces_instead_of_merging() {
        let mut current = UserPreferenceState::new();
        current.favorites.insert(1);
        current.recently_viewed = vec![1];

        let mut persisted = UserPreferenceState::new();
        persisted.favorites.insert(99);

        let state = reduce(current, PreferenceAction::Hydrate(persisted.clone()));
        assert_eq!(state, persisted);
    }

    #[test]
    fn test_only_user_actions_are_persisted() {
        assert!(PreferenceAction::ToggleFavorite(1).is_persisted());
        assert!(PreferenceAction::AddToRecentlyViewed(1).is_persisted());
        assert!(!PreferenceAction::Hydrate(UserPreferenceState::new()).is_persisted());
    }
}
