//! Card browser search engine for the study tool.
//!
//! This crate turns a free-text search string into typed tokens and evaluates
//! them against a card collection to produce a filtered, sorted view. Every
//! entry point is a pure function of its inputs; the host UI owns the query
//! string, the checkbox selections, and the sort spec, and re-runs
//! [`browser::filter_and_sort`] whenever any of them change.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`card`] | Card records, deck/tag catalogs, backend question mapping |
//! | [`token`] | Query tokenizer and raw-unit editing helpers |
//! | [`suggest`] | Search syntax suggestions for the autocomplete popup |
//! | [`filter`] | Predicate compilation and the selection filter layer |
//! | [`sort`] | Sort fields, directions, and the stable card ordering |
//! | [`browser`] | `filter_and_sort` and the browser session state |

pub mod browser;
pub mod card;
pub mod filter;
pub mod sort;
pub mod suggest;
pub mod token;

pub use browser::{BrowserState, SavedFilter, filter_and_sort};
pub use card::{Card, CardId, Deck, DeckId};
pub use filter::FilterState;
pub use sort::{SortDirection, SortField, SortSpec};
pub use token::{SearchToken, TokenKind, tokenize};

/// Error returned when a sort field or direction name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string does not name a [`SortField`].
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),
    /// The string is neither `asc` nor `desc`.
    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),
}
