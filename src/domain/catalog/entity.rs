use serde::{Deserialize, Serialize};

/// Identifier of a catalog entry, as assigned by the upstream service
pub type ItemId = u32;

/// Minimal catalog entry returned by the paginated listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Parsed from the trailing numeric segment of `source_url`
    pub id: ItemId,

    pub name: String,

    /// URL of the item's detail resource
    pub source_url: String,
}

impl ListItem {
    pub fn new(id: ItemId, name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source_url: source_url.into(),
        }
    }
}

/// Full attribute record for one item, fetched individually
///
/// Immutable once fetched: the cache never replaces a record with a
/// different one for the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: ItemId,
    pub name: String,

    /// Upstream unit: decimetres
    pub height: u32,

    /// Upstream unit: hectograms
    pub weight: u32,

    /// Ordered as the upstream lists them
    pub abilities: Vec<Ability>,

    pub types: Vec<ItemType>,

    pub stats: Vec<Stat>,

    /// Preferred artwork, falling back to the default sprite
    pub image_url: Option<String>,
}

impl DetailRecord {
    /// Ability names in upstream order
    pub fn ability_names(&self) -> impl Iterator<Item = &str> {
        self.abilities.iter().map(|a| a.name.as_str())
    }

    pub fn has_ability(&self, name: &str) -> bool {
        self.abilities.iter().any(|a| a.name == name)
    }

    pub fn height_in_metres(&self) -> f64 {
        f64::from(self.height) / 10.0
    }

    pub fn weight_in_kilograms(&self) -> f64 {
        f64::from(self.weight) / 10.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub is_hidden: bool,
}

impl Ability {
    pub fn new(name: impl Into<String>, is_hidden: bool) -> Self {
        Self {
            name: name.into(),
            is_hidden,
        }
    }

    /// Human-readable label: first `-` becomes a space, hidden abilities are marked
    pub fn label(&self) -> String {
        let base = self.name.replacen('-', " ", 1);
        if self.is_hidden {
            format!("{} (Hidden)", base)
        } else {
            base
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub base_value: u32,
}

impl std::fmt::Display for ListItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:03} {}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> DetailRecord {
        DetailRecord {
            id: 1,
            name: "bulbasaur".to_string(),
            height: 7,
            weight: 69,
            abilities: vec![
                Ability::new("overgrow", false),
                Ability::new("chlorophyll", true),
            ],
            types: vec![ItemType {
                name: "grass".to_string(),
            }],
            stats: Vec::new(),
            image_url: None,
        }
    }

    #[test]
    fn test_ability_lookup() {
        let record = detail();
        assert!(record.has_ability("chlorophyll"));
        assert!(!record.has_ability("blaze"));
        assert_eq!(
            record.ability_names().collect::<Vec<_>>(),
            vec!["overgrow", "chlorophyll"]
        );
    }

    #[test]
    fn test_unit_conversion() {
        let record = detail();
        assert!((record.height_in_metres() - 0.7).abs() < f64::EPSILON);
        assert!((record.weight_in_kilograms() - 6.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ability_label() {
        assert_eq!(Ability::new("solar-power", true).label(), "solar power (Hidden)");
        assert_eq!(Ability::new("blaze", false).label(), "blaze");
    }

    #[test]
    fn test_list_item_display_pads_id() {
        let item = ListItem::new(4, "charmander", "https://example.test/items/4/");
        assert_eq!(item.to_string(), "#004 charmander");
    }
}
