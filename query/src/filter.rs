//! Filter evaluation: compiled query predicates plus the selection layer.
//!
//! DESIGN
//! ======
//! Tokens are compiled once per evaluation into [`Predicate`]s with their
//! needles already lowercased, then every card is tested against them. Two
//! independent layers are ANDed together:
//!
//! - the query layer (tokens typed into the search bar), and
//! - the selection layer (deck and tag checkboxes in the filter panel), which
//!   uses exact membership instead of substring matching.
//!
//! Within the query layer categories are conjunctive, except deck tokens which
//! are alternatives: `deck:Cardio deck:Renal` shows cards from either deck.
//!
//! Malformed fragments are permissive. An empty value matches everything, and
//! an operator whose argument cannot be understood does not constrain.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use std::collections::BTreeSet;

use time::{Duration, OffsetDateTime};

use crate::card::{Card, Deck, DeckId};
use crate::token::{Field, Operator, SearchToken, TokenKind};

/// Filter panel state: everything outside the query string that narrows results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Show suspended cards even without an `is:suspended` token.
    pub show_suspended: bool,
    /// Deck checkboxes, by catalog id. Empty means every deck.
    pub selected_decks: Vec<DeckId>,
    /// Tag checkboxes. Empty means no tag constraint.
    pub selected_tags: Vec<String>,
    /// Reference time for `added:` tokens; they do not constrain without it.
    pub now: Option<OffsetDateTime>,
}

impl FilterState {
    /// Check or uncheck a deck.
    pub fn toggle_deck(&mut self, id: DeckId) {
        if let Some(pos) = self.selected_decks.iter().position(|d| *d == id) {
            self.selected_decks.remove(pos);
        } else {
            self.selected_decks.push(id);
        }
    }

    /// Check or uncheck a tag.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.to_owned());
        }
    }

    /// Uncheck every deck and tag.
    pub fn clear_selection(&mut self) {
        self.selected_decks.clear();
        self.selected_tags.clear();
    }

    /// Whether any deck or tag checkbox is set.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        !self.selected_decks.is_empty() || !self.selected_tags.is_empty()
    }
}

// =============================================================================
// CARD STATES
// =============================================================================

/// Card state named by an `is:` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    New,
    Review,
    Suspended,
    Learning,
    Due,
    /// Any other name; never constrains.
    Unknown,
}

impl CardState {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "new" => Self::New,
            "review" => Self::Review,
            "suspended" => Self::Suspended,
            "learning" => Self::Learning,
            "due" => Self::Due,
            _ => Self::Unknown,
        }
    }

    /// Whether `card` is in this state.
    ///
    /// `Learning` is approximated from the interval because cards carry no
    /// learning-step data. `Due` always holds: there is no due-date model, so
    /// it is a placeholder until scheduling data exists.
    #[must_use]
    pub fn holds(self, card: &Card) -> bool {
        match self {
            Self::New => card.reviews == 0,
            Self::Review => card.reviews > 0,
            Self::Suspended => card.suspended,
            Self::Learning => card.interval < 1 && card.reviews > 0,
            Self::Due | Self::Unknown => true,
        }
    }
}

// =============================================================================
// PROP FILTERS
// =============================================================================

/// Numeric card property addressable by `prop:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardProp {
    Ease,
    Interval,
    Reviews,
    Lapses,
    /// Days until due. Placeholder: always satisfied.
    Due,
}

/// Comparison operator in a `prop:` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    fn apply(self, lhs: f64, rhs: f64) -> bool {
        let equal = (lhs - rhs).abs() < f64::EPSILON;
        match self {
            Self::Eq => equal,
            Self::Ne => !equal,
            Self::Lt => lhs < rhs,
            Self::Le => lhs < rhs || equal,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs > rhs || equal,
        }
    }
}

/// Two-character operators come first so `>=` is not read as `>`.
const COMPARISONS: [(&str, Comparison); 6] = [
    (">=", Comparison::Ge),
    ("<=", Comparison::Le),
    ("!=", Comparison::Ne),
    ("=", Comparison::Eq),
    (">", Comparison::Gt),
    ("<", Comparison::Lt),
];

/// A parsed `prop:<name><cmp><number>` expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropFilter {
    pub prop: CardProp,
    pub cmp: Comparison,
    pub value: f64,
}

impl PropFilter {
    /// Parse the literal text after `prop:`, e.g. `ease>=2.5` or `ivl<10`.
    #[must_use]
    pub fn parse(expr: &str) -> Option<Self> {
        let split = expr.find(|c: char| !c.is_ascii_alphabetic())?;
        let (name, rest) = expr.split_at(split);
        let prop = match name.to_ascii_lowercase().as_str() {
            "ease" => CardProp::Ease,
            "ivl" | "interval" => CardProp::Interval,
            "reps" | "reviews" => CardProp::Reviews,
            "lapses" => CardProp::Lapses,
            "due" => CardProp::Due,
            _ => return None,
        };
        let (cmp, number) = COMPARISONS
            .iter()
            .find_map(|(symbol, cmp)| rest.strip_prefix(*symbol).map(|n| (*cmp, n)))?;
        let value = number.trim().parse::<f64>().ok()?;
        Some(Self { prop, cmp, value })
    }

    #[must_use]
    pub fn holds(&self, card: &Card) -> bool {
        let actual = match self.prop {
            CardProp::Ease => card.ease,
            CardProp::Interval => f64::from(card.interval),
            CardProp::Reviews => f64::from(card.reviews),
            CardProp::Lapses => f64::from(card.lapses),
            CardProp::Due => return true,
        };
        self.cmp.apply(actual, self.value)
    }
}

// =============================================================================
// PREDICATES
// =============================================================================

/// A single compiled query condition. Text needles are stored lowercased.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Deck(String),
    Tag(String),
    Field(Field, String),
    Text(String),
    State(CardState),
    Prop(PropFilter),
    AddedWithinDays(u32),
    Not(Box<Predicate>),
    /// Recognized but non-constraining (`rated:`, unparsable arguments, empty NOT).
    Always,
}

impl Predicate {
    /// Compile one token.
    #[must_use]
    pub fn from_token(token: &SearchToken) -> Self {
        let needle = || token.value.to_lowercase();
        match token.kind {
            TokenKind::Deck => Self::Deck(needle()),
            TokenKind::Tag => Self::Tag(needle()),
            TokenKind::Field(field) => Self::Field(field, needle()),
            TokenKind::Text => Self::Text(needle()),
            TokenKind::Operator(Operator::Is) => Self::State(CardState::parse(&token.value)),
            TokenKind::Operator(Operator::Prop) => PropFilter::parse(&token.value).map_or_else(
                || {
                    tracing::debug!(expr = %token.value, "ignoring unparsable prop filter");
                    Self::Always
                },
                Self::Prop,
            ),
            TokenKind::Operator(Operator::Added) => token
                .value
                .trim()
                .parse::<u32>()
                .map_or(Self::Always, Self::AddedWithinDays),
            TokenKind::Operator(Operator::Rated) => Self::Always,
            TokenKind::Operator(Operator::Not) => {
                if token.value.is_empty() {
                    return Self::Always;
                }
                token
                    .negated()
                    .map_or(Self::Always, |inner| Self::Not(Box::new(Self::from_token(&inner))))
            }
        }
    }

    fn holds(&self, card: &Card, text: &CardText, now: Option<OffsetDateTime>) -> bool {
        match self {
            Self::Deck(needle) => text.deck.contains(needle.as_str()),
            Self::Tag(needle) => text.tags.iter().any(|tag| tag.contains(needle.as_str())),
            Self::Field(Field::Front, needle) => text.front.contains(needle.as_str()),
            Self::Field(Field::Back, needle) => text.back.contains(needle.as_str()),
            Self::Text(needle) => {
                text.front.contains(needle.as_str())
                    || text.back.contains(needle.as_str())
                    || text.tags.iter().any(|tag| tag.contains(needle.as_str()))
            }
            Self::State(state) => state.holds(card),
            Self::Prop(prop) => prop.holds(card),
            Self::AddedWithinDays(days) => match (now, card.created_at()) {
                (Some(now), Some(created)) => now
                    .checked_sub(Duration::days(i64::from(*days)))
                    .is_none_or(|cutoff| created >= cutoff),
                _ => true,
            },
            Self::Not(inner) => !inner.holds(card, text, now),
            Self::Always => true,
        }
    }
}

/// Lowercased card text, computed once per card per evaluation.
struct CardText {
    deck: String,
    front: String,
    back: String,
    tags: Vec<String>,
}

impl CardText {
    fn new(card: &Card) -> Self {
        Self {
            deck: card.deck.to_lowercase(),
            front: card.front.to_lowercase(),
            back: card.back.to_lowercase(),
            tags: card.tags.iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

/// A query compiled for repeated evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledQuery {
    /// Deck alternatives; at least one must hold when non-empty.
    decks: Vec<Predicate>,
    /// Every other condition; all must hold.
    clauses: Vec<Predicate>,
    /// An explicit `is:suspended` token reveals suspended cards.
    reveals_suspended: bool,
}

impl CompiledQuery {
    #[must_use]
    pub fn new(tokens: &[SearchToken]) -> Self {
        let mut compiled = Self::default();
        for token in tokens {
            let predicate = Predicate::from_token(token);
            match predicate {
                Predicate::Deck(_) => compiled.decks.push(predicate),
                Predicate::State(CardState::Suspended) => {
                    compiled.reveals_suspended = true;
                    compiled.clauses.push(predicate);
                }
                _ => compiled.clauses.push(predicate),
            }
        }
        tracing::debug!(
            tokens = tokens.len(),
            decks = compiled.decks.len(),
            clauses = compiled.clauses.len(),
            "compiled search query"
        );
        compiled
    }

    /// Whether the query contains an explicit `is:suspended`.
    #[must_use]
    pub fn reveals_suspended(&self) -> bool {
        self.reveals_suspended
    }

    /// Evaluate the query layer (including suspended visibility) for one card.
    #[must_use]
    pub fn matches(&self, card: &Card, show_suspended: bool, now: Option<OffsetDateTime>) -> bool {
        if card.suspended && !show_suspended && !self.reveals_suspended {
            return false;
        }
        let text = CardText::new(card);
        let deck_ok = self.decks.is_empty() || self.decks.iter().any(|p| p.holds(card, &text, now));
        deck_ok && self.clauses.iter().all(|p| p.holds(card, &text, now))
    }
}

// =============================================================================
// SELECTION LAYER
// =============================================================================

/// The checkbox layer, with deck ids resolved to names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// `None` when no deck is selected.
    decks: Option<BTreeSet<String>>,
    tags: Vec<String>,
}

impl Selection {
    /// Resolve the filter state's deck ids against a deck catalog.
    ///
    /// Ids missing from the catalog resolve to nothing, so a selection made of
    /// only unknown ids matches no card.
    #[must_use]
    pub fn resolve(filter: &FilterState, catalog: &[Deck]) -> Self {
        let decks = (!filter.selected_decks.is_empty()).then(|| {
            catalog
                .iter()
                .filter(|deck| filter.selected_decks.contains(&deck.id))
                .map(|deck| deck.name.clone())
                .collect()
        });
        Self {
            decks,
            tags: filter.selected_tags.clone(),
        }
    }

    #[must_use]
    pub fn allows(&self, card: &Card) -> bool {
        let deck_ok = self.decks.as_ref().is_none_or(|names| names.contains(&card.deck));
        deck_ok && self.tags.iter().all(|tag| card.tags.contains(tag))
    }
}

/// Evaluates both filter layers for a collection.
#[derive(Debug, Clone)]
pub struct Evaluator {
    query: CompiledQuery,
    selection: Selection,
    show_suspended: bool,
    now: Option<OffsetDateTime>,
}

impl Evaluator {
    /// Build an evaluator for `tokens` and `filter` over `cards`.
    ///
    /// The deck catalog is derived from `cards` only when decks are selected.
    #[must_use]
    pub fn new(tokens: &[SearchToken], filter: &FilterState, cards: &[Card]) -> Self {
        let catalog = if filter.selected_decks.is_empty() {
            Vec::new()
        } else {
            crate::card::deck_catalog(cards)
        };
        Self {
            query: CompiledQuery::new(tokens),
            selection: Selection::resolve(filter, &catalog),
            show_suspended: filter.show_suspended,
            now: filter.now,
        }
    }

    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        self.selection.allows(card) && self.query.matches(card, self.show_suspended, self.now)
    }
}
