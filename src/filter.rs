use crate::Note;
use crate::html::strip_html;

/// Number of characters of stripped content shown in list previews
pub const PREVIEW_CHARS: usize = 120;

/// Returns the notes whose title or stripped content contains `term`,
/// ignoring case. An empty term keeps every note. Relative order is kept.
#[must_use]
pub fn filter_notes<'a>(notes: &'a [Note], term: &str) -> Vec<&'a Note> {
    if term.is_empty() {
        return notes.iter().collect();
    }
    let needle = term.to_lowercase();
    notes.iter().filter(|note| matches(note, &needle)).collect()
}

/// Checks a single note against an already lowercased needle
fn matches(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || strip_html(&note.content).to_lowercase().contains(needle)
}

/// Plain-text preview of note content, cut at `PREVIEW_CHARS` characters
#[must_use]
pub fn preview_text(content: &str) -> String {
    let text = strip_html(content);
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text
    }
}

/// Message shown in place of an empty list
#[must_use]
pub fn empty_list_message(term: &str) -> String {
    if term.is_empty() {
        "Create your first note to get started".to_string()
    } else {
        format!("No notes match \"{term}\"")
    }
}
