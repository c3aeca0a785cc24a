//! Card records and the catalogs derived from a card collection.
//!
//! A [`Card`] is the unit the browser filters and sorts. Decks are plain name
//! strings on each card; the [`Deck`] catalog assigns them ids so checkbox
//! selections can refer to decks independently of card order. Nested deck names
//! use Anki's `Parent::Child` convention.

#[cfg(test)]
#[path = "card_test.rs"]
mod card_test;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Unique identifier for a card.
pub type CardId = u64;

/// Identifier of a deck within a [`deck_catalog`].
pub type DeckId = usize;

/// Ease factor given to cards that have never been reviewed.
pub const DEFAULT_EASE: f64 = 2.5;

/// Separator between nested deck name segments.
const DECK_SEPARATOR: &str = "::";

/// A flashcard-like record with review statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Stable unique identifier.
    pub id: CardId,
    /// Deck name, possibly nested with `::`.
    pub deck: String,
    /// Front (prompt) text.
    pub front: String,
    /// Back (answer) text.
    pub back: String,
    /// Tags in display order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp (ISO-8601).
    pub created: String,
    /// Last modification timestamp (ISO-8601).
    pub modified: String,
    /// Number of completed reviews.
    #[serde(default)]
    pub reviews: u32,
    /// Ease factor, nominally within `1.3..=3.5`.
    #[serde(default = "default_ease")]
    pub ease: f64,
    /// Number of times the card was forgotten.
    #[serde(default)]
    pub lapses: u32,
    /// Current review interval in days.
    #[serde(default)]
    pub interval: u32,
    /// Whether the card is excluded from study.
    #[serde(default)]
    pub suspended: bool,
}

fn default_ease() -> f64 {
    DEFAULT_EASE
}

impl Card {
    /// Build a placeholder card from a backend question summary.
    ///
    /// The backend only knows the question's source and key, so review
    /// statistics start at their "new card" values and both timestamps are `now`.
    #[must_use]
    pub fn from_question(question: &QuestionInfo, now: &str) -> Self {
        Self {
            id: question.question_id,
            deck: question.source_name.clone(),
            front: question.source_question_key.clone(),
            back: String::new(),
            tags: Vec::new(),
            created: now.to_owned(),
            modified: now.to_owned(),
            reviews: 0,
            ease: DEFAULT_EASE,
            lapses: 0,
            interval: 0,
            suspended: false,
        }
    }

    /// Parsed creation time, if the stored string is a valid timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created)
    }

    /// Parsed modification time, if the stored string is a valid timestamp.
    #[must_use]
    pub fn modified_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.modified)
    }
}

/// Summary of one question as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub question_id: u64,
    pub source_name: String,
    pub source_question_key: String,
}

/// Backend response for the question list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionInfo>,
}

impl QuestionListResponse {
    /// Convert every listed question into a placeholder card.
    #[must_use]
    pub fn into_cards(self, now: &str) -> Vec<Card> {
        self.questions
            .iter()
            .map(|q| Card::from_question(q, now))
            .collect()
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts full RFC 3339 strings and bare `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(ts);
    }
    let date = time::Date::parse(value, format_description!("[year]-[month]-[day]")).ok()?;
    Some(date.midnight().assume_utc())
}

// =============================================================================
// DECKS
// =============================================================================

/// A deck entry in the filter panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub card_count: usize,
}

impl Deck {
    /// Last segment of a nested deck name (`A::B::C` → `C`).
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.name
            .rsplit_once(DECK_SEPARATOR)
            .map_or(self.name.as_str(), |(_, leaf)| leaf)
    }

    /// Parent segments joined for display (`A::B::C` → `A / B`), empty for top-level decks.
    #[must_use]
    pub fn path(&self) -> String {
        self.name
            .rsplit_once(DECK_SEPARATOR)
            .map_or_else(String::new, |(parents, _)| {
                parents.split(DECK_SEPARATOR).collect::<Vec<_>>().join(" / ")
            })
    }
}

/// Build the deck catalog for a collection.
///
/// Ids follow sorted deck name order, so they do not depend on card order.
#[must_use]
pub fn deck_catalog(cards: &[Card]) -> Vec<Deck> {
    let mut counts = BTreeMap::<&str, usize>::new();
    for card in cards {
        *counts.entry(card.deck.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(id, (name, card_count))| Deck {
            id,
            name: name.to_owned(),
            card_count,
        })
        .collect()
}

/// Decks whose name contains `query` (case-insensitive).
#[must_use]
pub fn filter_decks<'a>(decks: &'a [Deck], query: &str) -> Vec<&'a Deck> {
    let needle = query.to_lowercase();
    decks
        .iter()
        .filter(|deck| deck.name.to_lowercase().contains(&needle))
        .collect()
}

// =============================================================================
// TAGS
// =============================================================================

/// A tag entry in the filter panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub name: String,
    pub card_count: usize,
}

/// Distinct tags with the number of cards carrying each, sorted by name.
#[must_use]
pub fn tag_catalog(cards: &[Card]) -> Vec<TagCount> {
    let mut counts = BTreeMap::<&str, usize>::new();
    for card in cards {
        let distinct = card.tags.iter().map(String::as_str).collect::<BTreeSet<_>>();
        for tag in distinct {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(name, card_count)| TagCount {
            name: name.to_owned(),
            card_count,
        })
        .collect()
}
