//! Search query tokenizer and raw-unit editing helpers.
//!
//! A query is split into whitespace-separated units, where a double-quoted
//! span keeps its spaces (`tag:"High Yield"` is one unit). Each unit is then
//! classified by prefix into a [`SearchToken`]. Tokens keep their `raw` unit
//! so the search bar can remove exactly the chip the user clicked.
//!
//! The editing helpers work on raw units rather than tokens; they never
//! re-quote or normalize what the user typed.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use serde::{Deserialize, Serialize};

/// Card text field targeted by `front:` / `back:` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Front,
    Back,
}

impl Field {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

/// Operator carried by an operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `is:` card state.
    Is,
    /// `added:` days since creation.
    Added,
    /// `rated:` days since last review.
    Rated,
    /// `prop:` property comparison.
    Prop,
    /// Leading `-` negation.
    #[serde(rename = "NOT")]
    Not,
}

impl Operator {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::Added => "added",
            Self::Rated => "rated",
            Self::Prop => "prop",
            Self::Not => "NOT",
        }
    }
}

/// Classification of a query unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "lowercase")]
pub enum TokenKind {
    Deck,
    Tag,
    Field(Field),
    Operator(Operator),
    Text,
}

/// One classified unit of a search query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchToken {
    pub kind: TokenKind,
    /// The unit's value with its prefix removed and all quotes stripped.
    pub value: String,
    /// The unit exactly as it appeared in the query.
    pub raw: String,
}

impl SearchToken {
    /// Operator label shown on the token chip; `None` for free text.
    #[must_use]
    pub fn operator_name(&self) -> Option<&'static str> {
        match self.kind {
            TokenKind::Deck => Some("deck"),
            TokenKind::Tag => Some("tag"),
            TokenKind::Field(field) => Some(field.as_str()),
            TokenKind::Operator(op) => Some(op.as_str()),
            TokenKind::Text => None,
        }
    }

    /// For a NOT token, the token it negates.
    ///
    /// The remainder is classified from the raw text after the leading `-`, so
    /// `-tag:"Very Easy"` wraps a tag token whose value is `Very Easy`.
    #[must_use]
    pub fn negated(&self) -> Option<SearchToken> {
        if self.kind != TokenKind::Operator(Operator::Not) {
            return None;
        }
        self.raw.strip_prefix('-').map(classify)
    }
}

/// Prefixes checked in priority order, with the kind they produce.
const PREFIXES: [(&str, TokenKind); 8] = [
    ("deck:", TokenKind::Deck),
    ("tag:", TokenKind::Tag),
    ("front:", TokenKind::Field(Field::Front)),
    ("back:", TokenKind::Field(Field::Back)),
    ("is:", TokenKind::Operator(Operator::Is)),
    ("added:", TokenKind::Operator(Operator::Added)),
    ("rated:", TokenKind::Operator(Operator::Rated)),
    ("prop:", TokenKind::Operator(Operator::Prop)),
];

/// Parse a query string into tokens. Blank input yields no tokens.
#[must_use]
pub fn tokenize(query: &str) -> Vec<SearchToken> {
    split_units(query).into_iter().map(classify).collect()
}

/// Classify a single raw unit.
#[must_use]
pub fn classify(raw: &str) -> SearchToken {
    let clean = raw.replace('"', "");

    for (prefix, kind) in PREFIXES {
        if raw.starts_with(prefix) {
            let rest = &clean[prefix.len()..];
            let value = if kind == TokenKind::Operator(Operator::Is) {
                rest.to_lowercase()
            } else {
                rest.to_owned()
            };
            return SearchToken {
                kind,
                value,
                raw: raw.to_owned(),
            };
        }
    }

    if raw.starts_with('-') {
        return SearchToken {
            kind: TokenKind::Operator(Operator::Not),
            value: clean[1..].to_owned(),
            raw: raw.to_owned(),
        };
    }

    SearchToken {
        kind: TokenKind::Text,
        value: clean,
        raw: raw.to_owned(),
    }
}

/// Re-join token raws with single spaces.
#[must_use]
pub fn join_raw(tokens: &[SearchToken]) -> String {
    tokens
        .iter()
        .map(|t| t.raw.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a query into raw units.
///
/// A unit is a maximal run of non-space, non-quote characters and complete
/// `"..."` spans. A `"` with no closing partner cannot start or extend a unit
/// and is skipped on its own.
#[must_use]
pub fn split_units(query: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut pos = 0;

    while let Some(c) = query[pos..].chars().next() {
        let end = unit_end(query, pos);
        if end > pos {
            units.push(&query[pos..end]);
            pos = end;
        } else {
            pos += c.len_utf8();
        }
    }

    units
}

/// End offset of the unit starting at `start` (equal to `start` if none).
fn unit_end(query: &str, start: usize) -> usize {
    let mut pos = start;
    while let Some(c) = query[pos..].chars().next() {
        if c == '"' {
            match query[pos + 1..].find('"') {
                Some(close) => pos += close + 2,
                None => break,
            }
        } else if c.is_whitespace() {
            break;
        } else {
            pos += c.len_utf8();
        }
    }
    pos
}

// =============================================================================
// EDITING
// =============================================================================

/// Remove every unit equal to `raw` and re-join the rest with single spaces.
#[must_use]
pub fn remove_token(query: &str, raw: &str) -> String {
    split_units(query)
        .into_iter()
        .filter(|unit| *unit != raw)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove the last unit (backspace in an empty input).
#[must_use]
pub fn remove_last_token(query: &str) -> String {
    let mut units = split_units(query);
    units.pop();
    units.join(" ")
}

/// Append a typed term to the query. Blank terms leave the query unchanged.
#[must_use]
pub fn append_term(query: &str, term: &str) -> String {
    let term = term.trim();
    if term.is_empty() {
        query.to_owned()
    } else if query.is_empty() {
        term.to_owned()
    } else {
        format!("{query} {term}")
    }
}

/// Whether any unit equals `token`, ignoring case.
#[must_use]
pub fn has_token(query: &str, token: &str) -> bool {
    let needle = token.to_lowercase();
    split_units(query)
        .into_iter()
        .any(|unit| unit.to_lowercase() == needle)
}

/// Remove `token` (ignoring case) if present, otherwise append it.
#[must_use]
pub fn toggle_token(query: &str, token: &str) -> String {
    if has_token(query, token) {
        let needle = token.to_lowercase();
        split_units(query)
            .into_iter()
            .filter(|unit| unit.to_lowercase() != needle)
            .collect::<Vec<_>>()
            .join(" ")
    } else if query.is_empty() {
        token.to_owned()
    } else {
        format!("{query} {token}")
    }
}
