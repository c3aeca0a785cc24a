//! Notes, `[[wikilink]]` extraction, and the in-memory note store.
//!
//! A note links to another note by naming its title in double brackets
//! anywhere in its content. Links are stored as resolved note ids and are
//! recomputed whenever a note's content changes, so renaming a target does not
//! retarget existing links until the linking note is edited again.
//!
//! Timestamps are RFC 3339 strings supplied by the caller; the browser host
//! passes `Date.toISOString()`.

#[cfg(test)]
#[path = "note_test.rs"]
mod note_test;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

/// Unique identifier for a note.
pub type NoteId = String;

/// Title given to freshly created notes.
pub const UNTITLED: &str = "Untitled Note";

/// A notebook entry as stored on disk and exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_modified: String,
    /// Ids of notes this note links to, in first-mention order.
    #[serde(default)]
    pub links: Vec<NoteId>,
}

impl Note {
    /// Recency sort key: valid timestamps rank above unparsable ones.
    fn recency(&self) -> (bool, OffsetDateTime) {
        match OffsetDateTime::parse(&self.last_modified, &Rfc3339) {
            Ok(at) => (true, at),
            Err(_) => (false, OffsetDateTime::UNIX_EPOCH),
        }
    }
}

/// Sparse edit for a note. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    #[error("note not found: {0}")]
    NotFound(NoteId),
}

// =============================================================================
// LINKS
// =============================================================================

/// Characters a link title may not span.
const LINE_BREAKS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Every `[[title]]` in `content`, in order.
///
/// Each title is the shortest run up to the next `]]` on the same line, so
/// `[[a]] and [[b]]` yields `a` and `b`, and `[[[x]]` yields `[x`. An opening
/// `[[` with no closing `]]` on its line is skipped.
#[must_use]
pub fn extract_link_titles(content: &str) -> Vec<&str> {
    let mut titles = Vec::new();
    let mut pos = 0;

    while let Some(found) = content[pos..].find("[[") {
        let open = pos + found;
        let body = &content[open + 2..];
        let line = body.find(LINE_BREAKS).map_or(body, |end| &body[..end]);
        match line.find("]]") {
            Some(close) => {
                titles.push(&body[..close]);
                pos = open + 2 + close + 2;
            }
            None => pos = open + 1,
        }
    }

    titles
}

/// Resolve link titles to note ids.
///
/// Titles compare case-insensitively. When several notes share a title the
/// first one in `notes` wins. Unknown titles are dropped, and each id appears
/// at most once.
#[must_use]
pub fn resolve_links(titles: &[&str], notes: &[Note]) -> Vec<NoteId> {
    let mut ids: Vec<NoteId> = Vec::new();
    for title in titles {
        let wanted = title.to_lowercase();
        let Some(target) = notes.iter().find(|n| n.title.to_lowercase() == wanted) else {
            continue;
        };
        if !ids.contains(&target.id) {
            ids.push(target.id.clone());
        }
    }
    ids
}

// =============================================================================
// STORE
// =============================================================================

/// Ordered in-memory note list. New notes go to the front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Link ids for `content` against the current notes.
    #[must_use]
    pub fn links_for(&self, content: &str) -> Vec<NoteId> {
        resolve_links(&extract_link_titles(content), &self.notes)
    }

    /// Insert an empty `Untitled Note` at the front and return its id.
    pub fn create(&mut self, now: &str) -> NoteId {
        let id = Uuid::new_v4().to_string();
        self.notes.insert(
            0,
            Note {
                id: id.clone(),
                title: UNTITLED.to_owned(),
                content: String::new(),
                tags: Vec::new(),
                last_modified: now.to_owned(),
                links: Vec::new(),
            },
        );
        tracing::debug!(%id, "created note");
        id
    }

    /// Apply `patch` to a note and bump its modification time.
    ///
    /// Links are recomputed only when the patch carries content. Titles are
    /// resolved against the notes as they were before the edit.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::NotFound`] if no note has `id`.
    pub fn update(&mut self, id: &str, patch: NotePatch, now: &str) -> Result<(), NoteError> {
        let links = patch.content.as_deref().map(|content| self.links_for(content));
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_owned()))?;

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(tags) = patch.tags {
            note.tags = tags;
        }
        if let Some(links) = links {
            note.links = links;
        }
        now.clone_into(&mut note.last_modified);
        Ok(())
    }

    /// Remove a note and every link pointing at it.
    pub fn delete(&mut self, id: &str) -> Option<Note> {
        let pos = self.notes.iter().position(|n| n.id == id)?;
        let removed = self.notes.remove(pos);
        for note in &mut self.notes {
            note.links.retain(|link| link != id);
        }
        tracing::debug!(%id, "deleted note");
        Some(removed)
    }

    /// Recompute every note's links from its content.
    pub fn relink_all(&mut self) {
        let links = self
            .notes
            .iter()
            .map(|n| self.links_for(&n.content))
            .collect::<Vec<_>>();
        for (note, links) in self.notes.iter_mut().zip(links) {
            note.links = links;
        }
    }

    /// Notes whose title or content contains `query` (case-insensitive), most
    /// recently modified first. Unparsable timestamps sort last.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Note> {
        let needle = query.to_lowercase();
        let mut hits = self
            .notes
            .iter()
            .filter(|n| n.title.to_lowercase().contains(&needle) || n.content.to_lowercase().contains(&needle))
            .map(|n| (n.recency(), n))
            .collect::<Vec<_>>();
        hits.sort_by(|(a, _), (b, _)| b.cmp(a));
        hits.into_iter().map(|(_, n)| n).collect()
    }
}
