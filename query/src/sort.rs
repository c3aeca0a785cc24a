//! Sort fields, directions, and the stable card ordering.
//!
//! Keys are computed once per card before sorting, so timestamps are parsed a
//! single time instead of once per comparison.

#[cfg(test)]
#[path = "sort_test.rs"]
mod sort_test;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ParseError;
use crate::card::{Card, parse_timestamp};

/// Column a card list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Created,
    Modified,
    Reviews,
    Ease,
    Interval,
    Deck,
    Front,
    Tags,
}

impl SortField {
    pub const ALL: [Self; 8] = [
        Self::Created,
        Self::Modified,
        Self::Reviews,
        Self::Ease,
        Self::Interval,
        Self::Deck,
        Self::Front,
        Self::Tags,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Reviews => "reviews",
            Self::Ease => "ease",
            Self::Interval => "interval",
            Self::Deck => "deck",
            Self::Front => "front",
            Self::Tags => "tags",
        }
    }

    fn key(self, card: &Card) -> SortKey<'_> {
        match self {
            Self::Created => SortKey::Instant(parse_timestamp(&card.created)),
            Self::Modified => SortKey::Instant(parse_timestamp(&card.modified)),
            Self::Reviews => SortKey::Count(card.reviews),
            Self::Interval => SortKey::Count(card.interval),
            Self::Ease => SortKey::Ease(card.ease),
            Self::Deck => SortKey::Text(&card.deck),
            Self::Front => SortKey::Text(&card.front),
            Self::Tags => SortKey::Tags(card.tags.len(), card.tags.first().map(String::as_str)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == lower)
            .ok_or_else(|| ParseError::UnknownSortField(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseError::UnknownSortDirection(s.to_owned())),
        }
    }
}

/// Sort field plus direction. Defaults to most recently modified first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Modified,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    #[must_use]
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column header click: the same field flips direction, a new field
    /// starts descending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }

    /// Order `cards` in place. Stable: equal keys keep their input order in
    /// both directions.
    pub fn sort_cards(&self, cards: &mut Vec<&Card>) {
        let mut keyed = cards
            .drain(..)
            .map(|card| (self.field.key(card), card))
            .collect::<Vec<_>>();

        match self.direction {
            SortDirection::Asc => keyed.sort_by(|(a, _), (b, _)| a.compare(b)),
            SortDirection::Desc => keyed.sort_by(|(a, _), (b, _)| b.compare(a)),
        }

        cards.extend(keyed.into_iter().map(|(_, card)| card));
    }
}

/// Precomputed comparison key for one card.
enum SortKey<'a> {
    /// Unparsable timestamps are `None` and order before every valid one.
    Instant(Option<OffsetDateTime>),
    Count(u32),
    Ease(f64),
    Text(&'a str),
    /// Tag count, then the first tag.
    Tags(usize, Option<&'a str>),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            (Self::Count(a), Self::Count(b)) => a.cmp(b),
            (Self::Ease(a), Self::Ease(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Tags(len_a, first_a), Self::Tags(len_b, first_b)) => {
                len_a.cmp(len_b).then_with(|| first_a.cmp(first_b))
            }
            // Keys in one sort always share a variant.
            _ => Ordering::Equal,
        }
    }
}
