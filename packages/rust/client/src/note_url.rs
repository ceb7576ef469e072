//! Note URL parsing.
//!
//! Accepted shapes (any host, trailing segments/query/fragment ignored):
//! - `https://<team>.kibe.la/notes/<n>`
//! - `https://<team>.kibela.com/notes/<n>`
//! - `https://<team>.kibe.la/shared/.../notes/<n>`

use kibela_toc_shared::{KibelaTocError, NoteRef, Result};
use url::Url;

/// A note URL broken into the parts the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUrl {
    /// Public note number.
    pub note: NoteRef,
    /// Host the URL points at, e.g. `acme.kibe.la`.
    pub host: String,
}

impl NoteUrl {
    /// Whether the URL's host belongs to `team` (`<team>.kibe.la` or `<team>.kibela.com`).
    pub fn belongs_to(&self, team: &str) -> bool {
        self.host
            .split('.')
            .next()
            .is_some_and(|sub| sub.eq_ignore_ascii_case(team))
    }
}

/// Extract the note number from a note URL.
pub fn parse_note_url(input: &str) -> Result<NoteUrl> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| KibelaTocError::invalid_url(trimmed, format!("not a valid URL: {e}")))?;

    let host = url
        .host_str()
        .ok_or_else(|| KibelaTocError::invalid_url(trimmed, "URL has no host"))?
        .to_string();

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    let notes_at = segments
        .iter()
        .position(|s| *s == "notes")
        .ok_or_else(|| KibelaTocError::invalid_url(trimmed, "expected a /notes/<number> path"))?;

    let number = segments
        .get(notes_at + 1)
        .ok_or_else(|| KibelaTocError::invalid_url(trimmed, "missing note number after /notes/"))?;

    let note = NoteRef::new(*number).map_err(|_| {
        KibelaTocError::invalid_url(trimmed, format!("note number '{number}' is not numeric"))
    })?;

    Ok(NoteUrl { note, host })
}
