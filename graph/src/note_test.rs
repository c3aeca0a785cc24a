use super::*;

// =============================================================
// Helpers
// =============================================================

fn note(id: &str, title: &str, content: &str, modified: &str) -> Note {
    Note {
        id: id.to_owned(),
        title: title.to_owned(),
        content: content.to_owned(),
        tags: Vec::new(),
        last_modified: modified.to_owned(),
        links: Vec::new(),
    }
}

fn store() -> NoteStore {
    NoteStore::from_notes(vec![
        note("1", "Cardiology", "See [[ECG]] and [[renal]].", "2024-03-01T00:00:00Z"),
        note("2", "ECG", "Leads and axes.", "2024-03-03T00:00:00Z"),
        note("3", "Renal", "Links back to [[cardiology]].", "2024-03-02T00:00:00Z"),
    ])
}

const NOW: &str = "2024-04-01T12:00:00.000Z";

// =============================================================
// extract_link_titles
// =============================================================

#[test]
fn extract_finds_titles_in_order() {
    assert_eq!(extract_link_titles("[[b]] then [[a]] then [[b]]"), vec!["b", "a", "b"]);
}

#[test]
fn extract_takes_shortest_title() {
    assert_eq!(extract_link_titles("[[a]] x ]]"), vec!["a"]);
    assert_eq!(extract_link_titles("[[[x]]"), vec!["[x"]);
}

#[test]
fn extract_allows_empty_title() {
    assert_eq!(extract_link_titles("[[]]"), vec![""]);
}

#[test]
fn extract_does_not_cross_lines() {
    assert!(extract_link_titles("[[a\nb]]").is_empty());
    assert_eq!(extract_link_titles("[[a\n[[b]]"), vec!["b"]);
    assert!(extract_link_titles("[[a\r\n]]").is_empty());
}

#[test]
fn extract_ignores_unclosed_and_plain_text() {
    assert!(extract_link_titles("no links [here] [[open").is_empty());
    assert!(extract_link_titles("").is_empty());
}

#[test]
fn extract_handles_multibyte_titles() {
    assert_eq!(extract_link_titles("→ [[心電図]] ←"), vec!["心電図"]);
}

// =============================================================
// resolve_links
// =============================================================

#[test]
fn resolve_is_case_insensitive() {
    let notes = store().into_notes();
    assert_eq!(resolve_links(&["ecg", "RENAL"], &notes), vec!["2".to_owned(), "3".to_owned()]);
}

#[test]
fn resolve_drops_unknown_and_duplicates() {
    let notes = store().into_notes();
    assert_eq!(
        resolve_links(&["ECG", "missing", "ecg", "Renal"], &notes),
        vec!["2".to_owned(), "3".to_owned()]
    );
}

#[test]
fn resolve_prefers_first_note_with_title() {
    let notes = vec![note("a", "Dup", "", NOW), note("b", "dup", "", NOW)];
    assert_eq!(resolve_links(&["DUP"], &notes), vec!["a".to_owned()]);
}

// =============================================================
// NoteStore
// =============================================================

#[test]
fn create_inserts_untitled_at_front() {
    let mut store = store();
    let id = store.create(NOW);
    assert_eq!(store.len(), 4);
    let first = &store.notes()[0];
    assert_eq!(first.id, id);
    assert_eq!(first.title, UNTITLED);
    assert!(first.content.is_empty());
    assert!(first.links.is_empty());
    assert_eq!(first.last_modified, NOW);
}

#[test]
fn create_generates_distinct_ids() {
    let mut store = NoteStore::new();
    let a = store.create(NOW);
    let b = store.create(NOW);
    assert_ne!(a, b);
    assert_eq!(store.notes()[0].id, b);
}

#[test]
fn update_content_recomputes_links() {
    let mut store = store();
    store
        .update(
            "2",
            NotePatch { content: Some("Pairs with [[Renal]] and [[nothing]]".to_owned()), ..Default::default() },
            NOW,
        )
        .expect("update");
    let ecg = store.get("2").expect("note");
    assert_eq!(ecg.links, vec!["3".to_owned()]);
    assert_eq!(ecg.last_modified, NOW);
}

#[test]
fn update_title_only_keeps_links() {
    let mut store = store();
    store.relink_all();
    store
        .update("1", NotePatch { title: Some("Heart".to_owned()), ..Default::default() }, NOW)
        .expect("update");
    let note = store.get("1").expect("note");
    assert_eq!(note.title, "Heart");
    assert_eq!(note.links, vec!["2".to_owned(), "3".to_owned()]);
    assert_eq!(note.last_modified, NOW);
}

#[test]
fn update_missing_note_fails() {
    let mut store = store();
    let err = store.update("nope", NotePatch::default(), NOW).unwrap_err();
    assert_eq!(err, NoteError::NotFound("nope".to_owned()));
}

#[test]
fn delete_prunes_dangling_links() {
    let mut store = store();
    store.relink_all();
    let removed = store.delete("2").expect("removed");
    assert_eq!(removed.title, "ECG");
    assert!(store.get("2").is_none());
    for note in store.notes() {
        assert!(!note.links.contains(&"2".to_owned()));
    }
    assert_eq!(store.get("1").expect("note").links, vec!["3".to_owned()]);
}

#[test]
fn delete_missing_note_is_none() {
    let mut store = store();
    assert!(store.delete("nope").is_none());
    assert_eq!(store.len(), 3);
}

#[test]
fn relink_all_resolves_every_note() {
    let mut store = store();
    store.relink_all();
    assert_eq!(store.get("1").expect("note").links, vec!["2".to_owned(), "3".to_owned()]);
    assert!(store.get("2").expect("note").links.is_empty());
    assert_eq!(store.get("3").expect("note").links, vec!["1".to_owned()]);
}

#[test]
fn search_matches_title_or_content_most_recent_first() {
    let store = store();
    let ids = store.search("").iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["2", "3", "1"]);

    let ids = store.search("CARDIO").iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["3", "1"]);
}

#[test]
fn search_puts_unparsable_timestamps_last() {
    let store = NoteStore::from_notes(vec![
        note("a", "x", "", "garbage"),
        note("b", "x", "", "2020-01-01T00:00:00Z"),
    ]);
    let ids = store.search("x").iter().map(|n| n.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn note_json_uses_camel_case() {
    let json = serde_json::to_value(note("1", "T", "", NOW)).expect("json");
    assert_eq!(json["lastModified"], NOW);
    let parsed: Note =
        serde_json::from_str(r#"{"id":"9","title":"Bare","lastModified":"2024-01-01T00:00:00Z"}"#).expect("note");
    assert!(parsed.links.is_empty());
    assert!(parsed.content.is_empty());
}
