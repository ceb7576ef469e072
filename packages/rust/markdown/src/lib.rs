//! Markdown table-of-contents generation.
//!
//! Pure text processing, no I/O:
//! 1. [`extract_headings`] scans ATX headings outside fenced code
//! 2. [`anchor`] derives link fragments
//! 3. [`toc_entries`] / [`render_toc`] build the nested list
//! 4. [`locate_toc`] / [`splice_toc`] place it in the document
//!
//! [`apply_toc`] runs all of the above in one call.

mod anchor;
mod headings;
mod locate;
mod render;

use tracing::{debug, instrument};

use kibela_toc_shared::Depth;

pub use anchor::anchor;
pub use headings::{Heading, document_title, extract_headings};
pub use locate::{CANONICAL_HEADER, TOC_LABELS, TocLocation, is_toc_label, locate_toc, splice_toc};
pub use render::{TocEntry, render_toc, toc_candidates, toc_entries};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Outcome of [`apply_toc`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocEdit {
    /// No heading qualified for the TOC; the document should be left alone.
    NoHeadings,
    /// A TOC was rendered and spliced in.
    Applied {
        /// The full modified document.
        content: String,
        /// Entries listed in the TOC, in document order.
        entries: Vec<TocEntry>,
        /// Whether an existing block was refreshed or a new one inserted.
        action: TocAction,
    },
}

/// How the TOC ended up in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TocAction {
    Replaced,
    Inserted,
}

impl std::fmt::Display for TocAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replaced => f.write_str("replaced existing TOC"),
            Self::Inserted => f.write_str("inserted new TOC"),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Build or refresh the TOC of `text`, including headings up to `depth`.
#[instrument(skip_all, fields(len = text.len(), depth = depth.get()))]
pub fn apply_toc(text: &str, depth: Depth) -> TocEdit {
    let headings = extract_headings(text);
    let entries = toc_entries(toc_candidates(&headings), depth);

    debug!(
        headings = headings.len(),
        entries = entries.len(),
        "headings extracted"
    );

    if entries.is_empty() {
        return TocEdit::NoHeadings;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let location = locate_toc(&lines, &headings);
    let action = match location {
        TocLocation::Existing { .. } => TocAction::Replaced,
        TocLocation::Insert { .. } => TocAction::Inserted,
    };

    debug!(?location, %action, "TOC location resolved");

    let rendered = render_toc(&entries);
    let content = splice_toc(text, &location, &rendered);

    TocEdit::Applied {
        content,
        entries,
        action,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
