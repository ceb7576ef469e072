//! TOC list rendering.

use kibela_toc_shared::Depth;

use crate::anchor::anchor;
use crate::headings::{Heading, document_title};
use crate::locate::is_toc_label;

/// A heading selected for the TOC, with its link fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub anchor: String,
}

/// Headings that may appear in a TOC.
///
/// Drops TOC header lines (a TOC never lists itself), the document title (the
/// first H1), and every heading above the title.
pub fn toc_candidates(headings: &[Heading]) -> Vec<&Heading> {
    let first_line = document_title(headings).map_or(0, |title| title.line + 1);

    headings
        .iter()
        .filter(|h| h.line >= first_line)
        .filter(|h| !is_toc_label(&h.text))
        .collect()
}

/// Keep headings up to `depth` and compute their anchors. Order is preserved.
pub fn toc_entries<'a>(
    headings: impl IntoIterator<Item = &'a Heading>,
    depth: Depth,
) -> Vec<TocEntry> {
    headings
        .into_iter()
        .filter(|h| h.level <= depth.get())
        .map(|h| TocEntry {
            level: h.level,
            text: h.text.clone(),
            anchor: anchor(&h.text),
        })
        .collect()
}

/// Render entries as a nested markdown list, one line per entry, no trailing newline.
///
/// The shallowest level present sits at column 0; each level below it adds
/// two spaces. Returns an empty string for no entries.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let Some(base) = entries.iter().map(|e| e.level).min() else {
        return String::new();
    };

    entries
        .iter()
        .map(|e| {
            let indent = "  ".repeat(usize::from(e.level - base));
            format!("{indent}- [{}](#{})", e.text, e.anchor)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
