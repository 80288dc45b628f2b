// src/application/grid.rs
//
// Virtualized grid support
//
// The rendering primitive asks for "the row at index N"; everything it needs
// to answer (cards per row, row height, row slicing, the near-bottom check
// that drives infinite scroll) lives here.

use serde::{Deserialize, Serialize};

/// Distance from the bottom, in pixels, at which the next page is requested
pub const NEAR_BOTTOM_THRESHOLD_PX: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub cards_per_row: usize,
    pub row_height: u32,
}

impl GridLayout {
    /// Breakpoints: <640, <768, <1024, <1280, wider
    pub fn for_viewport_width(width: u32) -> Self {
        let (cards_per_row, row_height) = match width {
            0..=639 => (1, 200),
            640..=767 => (2, 210),
            768..=1023 => (3, 220),
            1024..=1279 => (4, 220),
            _ => (5, 220),
        };

        Self {
            cards_per_row,
            row_height,
        }
    }

    pub fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.cards_per_row.max(1))
    }

    /// Slice of `items` shown in row `index`
    ///
    /// The last row may be short; `empty_slots` says how many placeholders
    /// keep it aligned with the rows above. Out-of-range rows are empty.
    pub fn row_at<'a, T>(&self, items: &'a [T], index: usize) -> GridRow<'a, T> {
        let per_row = self.cards_per_row.max(1);
        let start = index.saturating_mul(per_row).min(items.len());
        let end = start.saturating_add(per_row).min(items.len());
        let cards = &items[start..end];

        GridRow {
            index,
            cards,
            empty_slots: if cards.is_empty() { 0 } else { per_row - cards.len() },
        }
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::for_viewport_width(u32::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRow<'a, T> {
    pub index: usize,
    pub cards: &'a [T],
    pub empty_slots: usize,
}

/// Scroll position reported by the list container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub client_height: f64,
    pub scroll_height: f64,
    pub scroll_top: f64,
}

impl ScrollMetrics {
    pub fn new(client_height: f64, scroll_height: f64, scroll_top: f64) -> Self {
        Self {
            client_height,
            scroll_height,
            scroll_top,
        }
    }

    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }

    pub fn near_bottom(&self) -> bool {
        self.distance_to_bottom() < NEAR_BOTTOM_THRESHOLD_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(GridLayout::for_viewport_width(375).cards_per_row, 1);
        assert_eq!(GridLayout::for_viewport_width(375).row_height, 200);
        assert_eq!(GridLayout::for_viewport_width(640).cards_per_row, 2);
        assert_eq!(GridLayout::for_viewport_width(640).row_height, 210);
        assert_eq!(GridLayout::for_viewport_width(1023).cards_per_row, 3);
        assert_eq!(GridLayout::for_viewport_width(1024).cards_per_row, 4);
        assert_eq!(GridLayout::for_viewport_width(1920).cards_per_row, 5);
        assert_eq!(GridLayout::for_viewport_width(1920).row_height, 220);
    }

    #[test]
    fn test_rows_cover_every_item_once() {
        let layout = GridLayout::for_viewport_width(800);
        let items: Vec<u32> = (1..=7).collect();

        assert_eq!(layout.row_count(items.len()), 3);
        assert_eq!(layout.row_count(0), 0);

        let flattened: Vec<u32> = (0..layout.row_count(items.len()))
            .flat_map(|i| layout.row_at(&items, i).cards.to_vec())
            .collect();
        assert_eq!(flattened, items);
    }

    #[test]
    fn test_last_row_is_padded() {
        let layout = GridLayout::for_viewport_width(800);
        let items: Vec<u32> = (1..=7).collect();

        let last = layout.row_at(&items, 2);
        assert_eq!(last.cards, &[7]);
        assert_eq!(last.empty_slots, 2);

        let past_end = layout.row_at(&items, 10);
        assert!(past_end.cards.is_empty());
        assert_eq!(past_end.empty_slots, 0);
    }

    #[test]
    fn test_near_bottom_threshold() {
        assert!(ScrollMetrics::new(600.0, 2000.0, 1250.0).near_bottom());
        assert!(!ScrollMetrics::new(600.0, 2000.0, 1200.0).near_bottom());
        assert!(!ScrollMetrics::new(600.0, 2000.0, 0.0).near_bottom());
    }
}
