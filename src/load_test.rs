#![allow(clippy::float_cmp)]

use super::*;

const NOW: &str = "2024-05-01T00:00:00Z";

// =============================================================
// Cards
// =============================================================

#[test]
fn card_array_parses_with_defaults() {
    let input = r#"[{
        "id": 7,
        "deck": "Cardio",
        "front": "Chest pain",
        "back": "ACS",
        "created": "2024-01-01",
        "modified": "2024-02-01"
    }]"#;
    let cards = parse_cards(input, NOW).expect("cards");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, 7);
    assert!(cards[0].tags.is_empty());
    assert_eq!(cards[0].ease, query::card::DEFAULT_EASE);
    assert!(!cards[0].suspended);
}

#[test]
fn empty_array_is_empty_collection() {
    assert!(parse_cards("[]", NOW).expect("cards").is_empty());
}

#[test]
fn question_list_becomes_placeholder_cards() {
    let input = r#"{"questions": [
        {"question_id": 3, "source_name": "UWorld", "source_question_key": "q-103"}
    ]}"#;
    let cards = parse_cards(input, NOW).expect("cards");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, 3);
    assert_eq!(cards[0].deck, "UWorld");
    assert_eq!(cards[0].front, "q-103");
    assert_eq!(cards[0].created, NOW);
    assert_eq!(cards[0].reviews, 0);
}

#[test]
fn unrecognized_card_shape_is_error() {
    assert!(parse_cards(r#"{"cards": 1}"#, NOW).is_err());
    assert!(parse_cards("not json", NOW).is_err());
}

#[test]
fn card_array_error_names_the_bad_field() {
    let input = r#"[{"id": 1, "deck": "Cardio", "front": "a", "back": "b", "created": "x", "modified": "y", "reviews": "many"}]"#;
    let err = parse_cards(input, NOW).unwrap_err();
    assert!(err.to_string().contains("invalid type"), "{err}");
}

#[test]
fn question_list_error_names_the_missing_field() {
    let err = parse_cards(r#"{"questions": [{"question_id": 3}]}"#, NOW).unwrap_err();
    assert!(err.to_string().contains("source_name"), "{err}");
}

// =============================================================
// Notes
// =============================================================

#[test]
fn notes_parse_camel_case() {
    let input = r#"[{
        "id": "n1",
        "title": "Heart",
        "content": "see [[Lung]]",
        "lastModified": "2024-01-01T00:00:00Z"
    }]"#;
    let notes = parse_notes(input).expect("notes");
    assert_eq!(notes[0].last_modified, "2024-01-01T00:00:00Z");
    assert!(notes[0].links.is_empty());
}

#[test]
fn note_without_timestamp_is_error() {
    assert!(parse_notes(r#"[{"id": "n1", "title": "Heart"}]"#).is_err());
}
