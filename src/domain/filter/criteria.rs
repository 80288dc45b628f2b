use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Structured attribute filter
///
/// An absent bound is unconstrained; an empty ability set is unconstrained.
/// A non-empty ability set matches items having ANY of the abilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_weight: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<u32>,

    #[serde(default)]
    pub abilities: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_height(mut self, value: u32) -> Self {
        self.min_height = Some(value);
        self
    }

    pub fn with_max_height(mut self, value: u32) -> Self {
        self.max_height = Some(value);
        self
    }

    pub fn with_min_weight(mut self, value: u32) -> Self {
        self.min_weight = Some(value);
        self
    }

    pub fn with_max_weight(mut self, value: u32) -> Self {
        self.max_weight = Some(value);
        self
    }

    pub fn with_ability(mut self, name: impl Into<String>) -> Self {
        self.abilities.insert(name.into());
        self
    }

    pub fn with_abilities<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities.extend(names.into_iter().map(Into::into));
        self
    }

    /// True when at least one bound is set or the ability set is non-empty
    pub fn is_active(&self) -> bool {
        !self.abilities.is_empty()
            || self.min_height.is_some()
            || self.max_height.is_some()
            || self.min_weight.is_some()
            || self.max_weight.is_some()
    }
}
