// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};

use crate::domain::{Ability, DetailRecord, ItemId, ListItem, Stat, UserPreferenceState};

/// Upper bound of a base stat, used for the bar width
const MAX_BASE_STAT: f64 = 255.0;

// ============================================================================
// LIST DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCardDto {
    pub id: ItemId,
    pub name: String,
    /// Zero-padded id, e.g. "#001"
    pub display_number: String,
    pub is_favorite: bool,
}

impl ItemCardDto {
    pub fn from_item(item: &ListItem, is_favorite: bool) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            display_number: display_number(item.id),
            is_favorite,
        }
    }
}

pub fn display_number(id: ItemId) -> String {
    format!("#{:03}", id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRowDto {
    pub index: usize,
    pub cards: Vec<ItemCardDto>,
    pub empty_slots: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIndicatorDto {
    /// 1-based for display
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageIndicatorDto {
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerStatusDto {
    /// First page in flight
    pub is_loading: bool,
    /// A later page in flight
    pub is_loading_more: bool,
    /// Message of the last failed page fetch
    pub list_error: Option<String>,
    pub pending_details: usize,
    pub cached_details: usize,
    pub failed_details: Vec<ItemId>,
}

impl ExplorerStatusDto {
    pub fn is_fetching_details(&self) -> bool {
        self.pending_details > 0
    }
}

// ============================================================================
// DETAIL DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailDto {
    pub id: ItemId,
    pub name: String,
    pub display_number: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub abilities: Vec<AbilityDto>,
    pub types: Vec<String>,
    pub stats: Vec<StatDto>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
}

impl ItemDetailDto {
    pub fn from_record(record: &DetailRecord, is_favorite: bool) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            display_number: display_number(record.id),
            height_m: record.height_in_metres(),
            weight_kg: record.weight_in_kilograms(),
            abilities: record.abilities.iter().map(AbilityDto::from).collect(),
            types: record.types.iter().map(|t| t.name.clone()).collect(),
            stats: record.stats.iter().map(StatDto::from).collect(),
            image_url: record.image_url.clone(),
            is_favorite,
        }
    }

    pub fn height_label(&self) -> String {
        format!("{:.1} m", self.height_m)
    }

    pub fn weight_label(&self) -> String {
        format!("{:.1} kg", self.weight_kg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityDto {
    pub name: String,
    pub label: String,
    pub is_hidden: bool,
}

impl From<&Ability> for AbilityDto {
    fn from(ability: &Ability) -> Self {
        Self {
            name: ability.name.clone(),
            label: ability.label(),
            is_hidden: ability.is_hidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDto {
    pub label: String,
    pub base_value: u32,
    /// Bar width, 0 to 100
    pub percent: f64,
}

impl From<&Stat> for StatDto {
    fn from(stat: &Stat) -> Self {
        Self {
            label: stat.name.replacen('-', " ", 1),
            base_value: stat.base_value,
            percent: (f64::from(stat.base_value) / MAX_BASE_STAT * 100.0).min(100.0),
        }
    }
}

// ============================================================================
// PREFERENCE DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesDto {
    pub favorites: Vec<ItemId>,
    pub recently_viewed: Vec<ItemId>,
}

impl From<UserPreferenceState> for PreferencesDto {
    fn from(state: UserPreferenceState) -> Self {
        Self {
            favorites: state.favorites.into_iter().collect(),
            recently_viewed: state.recently_viewed,
        }
    }
}
