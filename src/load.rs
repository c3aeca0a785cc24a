//! JSON inputs for the command line: card collections and note sets.

#[cfg(test)]
#[path = "load_test.rs"]
mod load_test;

use graph::note::Note;
use query::Card;
use query::card::QuestionListResponse;

/// Parse a card collection. Question lists become placeholder cards stamped `now`.
///
/// Input starting with `[` is read as a card array, anything else as a
/// question list, so errors point at the offending field of that shape.
///
/// # Errors
///
/// Returns the JSON error for the shape the input was read as.
pub fn parse_cards(input: &str, now: &str) -> Result<Vec<Card>, serde_json::Error> {
    let cards = if input.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<Card>>(input)?
    } else {
        serde_json::from_str::<QuestionListResponse>(input)?.into_cards(now)
    };
    tracing::debug!(count = cards.len(), "loaded cards");
    Ok(cards)
}

/// Parse a JSON array of notes.
///
/// # Errors
///
/// Returns the JSON error when `input` is not a note array.
pub fn parse_notes(input: &str) -> Result<Vec<Note>, serde_json::Error> {
    let notes = serde_json::from_str::<Vec<Note>>(input)?;
    tracing::debug!(count = notes.len(), "loaded notes");
    Ok(notes)
}
