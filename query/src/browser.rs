//! `filter_and_sort` and the card browser session state.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId, DeckId};
use crate::filter::{Evaluator, FilterState};
use crate::sort::{SortField, SortSpec};
use crate::token::tokenize;

/// Filter and order `cards` for display.
///
/// Pure: the same inputs always give the same references in the same order,
/// and `cards` itself is never reordered.
#[must_use]
pub fn filter_and_sort<'a>(
    cards: &'a [Card],
    query: &str,
    filter: &FilterState,
    sort: SortSpec,
) -> Vec<&'a Card> {
    let tokens = tokenize(query);
    let evaluator = Evaluator::new(&tokens, filter, cards);
    let mut visible = cards.iter().filter(|card| evaluator.matches(card)).collect::<Vec<_>>();
    sort.sort_cards(&mut visible);

    tracing::debug!(
        total = cards.len(),
        visible = visible.len(),
        field = %sort.field,
        direction = %sort.direction,
        "filtered card list"
    );
    visible
}

/// A named, reusable combination of query and checkbox selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub selected_decks: Vec<DeckId>,
    #[serde(default)]
    pub selected_tags: Vec<String>,
    /// When present, overrides the show-suspended toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
}

/// Everything the browser screen tracks between renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowserState {
    pub query: String,
    pub filter: FilterState,
    pub sort: SortSpec,
    /// Multi-selected cards, in the order they were selected.
    pub selected_card_ids: Vec<CardId>,
    /// Card shown in the detail pane.
    pub focused: Option<CardId>,
}

impl BrowserState {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle_deck(&mut self, id: DeckId) {
        self.filter.toggle_deck(id);
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.filter.toggle_tag(tag);
    }

    pub fn set_show_suspended(&mut self, show: bool) {
        self.filter.show_suspended = show;
    }

    pub fn focus(&mut self, id: CardId) {
        self.focused = Some(id);
    }

    pub fn toggle_card_selection(&mut self, id: CardId) {
        if let Some(pos) = self.selected_card_ids.iter().position(|c| *c == id) {
            self.selected_card_ids.remove(pos);
        } else {
            self.selected_card_ids.push(id);
        }
    }

    pub fn clear_card_selection(&mut self) {
        self.selected_card_ids.clear();
    }

    /// Clear the query and every deck/tag checkbox. Show-suspended and the
    /// sort are left alone.
    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.filter.clear_selection();
    }

    pub fn apply_saved_filter(&mut self, saved: &SavedFilter) {
        self.query.clone_from(&saved.search_query);
        self.filter.selected_decks.clone_from(&saved.selected_decks);
        self.filter.selected_tags.clone_from(&saved.selected_tags);
        if let Some(show) = saved.suspended {
            self.filter.show_suspended = show;
        }
        tracing::debug!(id = %saved.id, name = %saved.name, "applied saved filter");
    }

    /// Snapshot the current query and selections as a saved filter.
    #[must_use]
    pub fn to_saved_filter(&self, id: impl Into<String>, name: impl Into<String>) -> SavedFilter {
        SavedFilter {
            id: id.into(),
            name: name.into(),
            search_query: self.query.clone(),
            selected_decks: self.filter.selected_decks.clone(),
            selected_tags: self.filter.selected_tags.clone(),
            suspended: Some(self.filter.show_suspended),
        }
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Select every card currently visible.
    pub fn select_all(&mut self, cards: &[Card]) {
        self.selected_card_ids = self.visible(cards).iter().map(|card| card.id).collect();
    }

    /// Escape key: drop the card selection if there is one, otherwise clear
    /// the filters.
    pub fn on_escape(&mut self) {
        if self.selected_card_ids.is_empty() {
            self.clear_filters();
        } else {
            self.selected_card_ids.clear();
        }
    }

    /// Whether the query or any deck/tag checkbox narrows the list.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.query.is_empty() || self.filter.has_selection()
    }

    #[must_use]
    pub fn visible<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        filter_and_sort(cards, &self.query, &self.filter, self.sort)
    }
}
