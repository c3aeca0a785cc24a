//! Search syntax suggestions for the autocomplete popup and help panel.

use serde::Serialize;

/// One entry of the search syntax cheat sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub syntax: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

const fn entry(syntax: &'static str, description: &'static str, example: &'static str) -> Suggestion {
    Suggestion {
        syntax,
        description,
        example,
    }
}

/// Every supported search operator, in help-panel order.
pub static SUGGESTIONS: [Suggestion; 13] = [
    entry("deck:", "Filter by deck name", "deck:Cardiology"),
    entry("tag:", "Filter by tag", "tag:High-Yield"),
    entry("-tag:", "Exclude tag", "-tag:Easy"),
    entry("front:", "Search front field", "front:ECG"),
    entry("back:", "Search back field", "back:treatment"),
    entry("prop:due=0", "Show cards due today", "prop:due=0"),
    entry("is:suspended", "Show suspended cards", "is:suspended"),
    entry("is:new", "Show new cards", "is:new"),
    entry("is:review", "Show review cards", "is:review"),
    entry("is:due", "Show due cards", "is:due"),
    entry("added:", "Cards added N days ago", "added:7"),
    entry("rated:", "Cards reviewed N days ago", "rated:30"),
    entry("-", "Exclude term (NOT)", "-tag:Skip"),
];

/// Suggestions whose syntax contains `input` (case-insensitive).
///
/// An empty input shows no popup, so it yields nothing.
#[must_use]
pub fn suggestions_for(input: &str) -> Vec<&'static Suggestion> {
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();
    SUGGESTIONS
        .iter()
        .filter(|s| s.syntax.to_lowercase().contains(&needle))
        .collect()
}
