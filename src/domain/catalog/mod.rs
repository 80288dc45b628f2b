pub mod entity;
pub mod invariants;

pub use entity::{Ability, DetailRecord, ItemId, ItemType, ListItem, Stat};
pub use invariants::parse_item_id;
