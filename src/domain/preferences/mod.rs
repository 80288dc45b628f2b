pub mod entity;
pub mod reducer;

pub use entity::{UserPreferenceState, RECENTLY_VIEWED_LIMIT};
pub use reducer::{reduce, PreferenceAction};
