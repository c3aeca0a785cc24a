use super::*;
use crate::card::{DEFAULT_EASE, deck_catalog};
use crate::sort::SortDirection;

// =============================================================
// Helpers
// =============================================================

fn card(id: u64, deck: &str, front: &str, tags: &[&str], modified: &str) -> Card {
    Card {
        id,
        deck: deck.to_owned(),
        front: front.to_owned(),
        back: String::new(),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        created: "2024-01-01T00:00:00Z".to_owned(),
        modified: modified.to_owned(),
        reviews: 0,
        ease: DEFAULT_EASE,
        lapses: 0,
        interval: 0,
        suspended: false,
    }
}

fn collection() -> Vec<Card> {
    vec![
        card(1, "Cardiology", "chest pain", &["High-Yield"], "2024-03-01T00:00:00Z"),
        card(2, "Renal", "hyperkalemia", &["Easy"], "2024-03-03T00:00:00Z"),
        card(3, "Cardiology::ECG", "st elevation", &["High-Yield", "ECG"], "2024-03-02T00:00:00Z"),
        Card {
            suspended: true,
            ..card(4, "Cardiology", "old card", &["High-Yield"], "2024-03-04T00:00:00Z")
        },
    ]
}

fn ids(cards: &[&Card]) -> Vec<u64> {
    cards.iter().map(|c| c.id).collect()
}

// =============================================================
// filter_and_sort
// =============================================================

#[test]
fn empty_collection_yields_empty_result() {
    let filter = FilterState { show_suspended: true, ..Default::default() };
    for query in ["", "deck:x", "is:suspended -tag:y", r#""unterminated"#] {
        assert!(filter_and_sort(&[], query, &filter, SortSpec::default()).is_empty());
    }
}

#[test]
fn default_view_hides_suspended_and_sorts_recent_first() {
    let cards = collection();
    let visible = filter_and_sort(&cards, "", &FilterState::default(), SortSpec::default());
    assert_eq!(ids(&visible), vec![2, 3, 1]);
}

#[test]
fn explicit_suspended_query_shows_only_suspended_card() {
    let cards = collection();
    let query = r#"deck:Cardio tag:"High-Yield" is:suspended"#;
    for show_suspended in [false, true] {
        let filter = FilterState { show_suspended, ..Default::default() };
        let visible = filter_and_sort(&cards, query, &filter, SortSpec::default());
        assert_eq!(ids(&visible), vec![4]);
    }
}

#[test]
fn input_collection_is_not_reordered() {
    let cards = collection();
    let before = cards.clone();
    let sort = SortSpec::new(SortField::Front, SortDirection::Asc);
    let _visible = filter_and_sort(&cards, "", &FilterState::default(), sort);
    assert_eq!(cards, before);
}

#[test]
fn same_inputs_give_same_output() {
    let cards = collection();
    let filter = FilterState::default();
    let a = ids(&filter_and_sort(&cards, "tag:high", &filter, SortSpec::default()));
    let b = ids(&filter_and_sort(&cards, "tag:high", &filter, SortSpec::default()));
    assert_eq!(a, b);
}

// =============================================================
// BrowserState
// =============================================================

#[test]
fn selection_layer_and_query_combine() {
    let cards = collection();
    let catalog = deck_catalog(&cards);
    let cardiology = catalog.iter().find(|d| d.name == "Cardiology").expect("deck").id;

    let mut state = BrowserState::default();
    state.toggle_deck(cardiology);
    assert_eq!(ids(&state.visible(&cards)), vec![1]);

    state.set_show_suspended(true);
    assert_eq!(ids(&state.visible(&cards)), vec![4, 1]);

    state.set_query("chest");
    assert_eq!(ids(&state.visible(&cards)), vec![1]);
}

#[test]
fn toggle_sort_follows_header_clicks() {
    let mut state = BrowserState::default();
    state.toggle_sort(SortField::Modified);
    assert_eq!(state.sort.direction, SortDirection::Asc);
    state.toggle_sort(SortField::Front);
    assert_eq!(state.sort, SortSpec::new(SortField::Front, SortDirection::Desc));
}

#[test]
fn toggle_card_selection_adds_and_removes() {
    let mut state = BrowserState::default();
    state.toggle_card_selection(3);
    state.toggle_card_selection(1);
    assert_eq!(state.selected_card_ids, vec![3, 1]);
    state.toggle_card_selection(3);
    assert_eq!(state.selected_card_ids, vec![1]);
}

#[test]
fn select_all_takes_visible_cards_in_display_order() {
    let cards = collection();
    let mut state = BrowserState::default();
    state.set_query("tag:high");
    state.select_all(&cards);
    assert_eq!(state.selected_card_ids, vec![3, 1]);
}

#[test]
fn escape_clears_selection_before_filters() {
    let mut state = BrowserState::default();
    state.set_query("deck:Renal");
    state.toggle_tag("Easy");
    state.toggle_card_selection(2);

    state.on_escape();
    assert!(state.selected_card_ids.is_empty());
    assert!(state.has_active_filters());

    state.on_escape();
    assert!(!state.has_active_filters());
    assert_eq!(state.query, "");
}

#[test]
fn clear_filters_keeps_show_suspended_and_sort() {
    let mut state = BrowserState::default();
    state.set_show_suspended(true);
    state.toggle_sort(SortField::Ease);
    state.set_query("x");
    state.toggle_deck(0);
    state.clear_filters();
    assert!(!state.has_active_filters());
    assert!(state.filter.show_suspended);
    assert_eq!(state.sort.field, SortField::Ease);
}

#[test]
fn saved_filter_restores_query_and_selections() {
    let mut state = BrowserState::default();
    state.set_query("tag:ECG");
    state.toggle_deck(2);
    state.toggle_tag("High-Yield");
    state.set_show_suspended(true);
    let saved = state.to_saved_filter("f1", "ECG review");

    let mut fresh = BrowserState::default();
    fresh.apply_saved_filter(&saved);
    assert_eq!(fresh.query, "tag:ECG");
    assert_eq!(fresh.filter.selected_decks, vec![2]);
    assert_eq!(fresh.filter.selected_tags, vec!["High-Yield".to_owned()]);
    assert!(fresh.filter.show_suspended);
}

#[test]
fn saved_filter_without_suspended_leaves_toggle() {
    let saved: SavedFilter = serde_json::from_str(
        r#"{"id":"a","name":"Cardio","searchQuery":"deck:Cardio","selectedDecks":[0],"selectedTags":[]}"#,
    )
    .expect("saved filter");
    assert_eq!(saved.suspended, None);

    let mut state = BrowserState::default();
    state.set_show_suspended(true);
    state.apply_saved_filter(&saved);
    assert!(state.filter.show_suspended);
    assert_eq!(state.query, "deck:Cardio");
}

#[test]
fn saved_filter_serializes_camel_case() {
    let saved = BrowserState::default().to_saved_filter("id", "All");
    let json = serde_json::to_value(&saved).expect("json");
    assert_eq!(json["searchQuery"], "");
    assert_eq!(json["suspended"], false);
    assert!(json.get("selectedDecks").is_some());
}
