//! Finding where the TOC goes, and splicing it in.
//!
//! An existing TOC is recognized by its header label. Without one, the TOC is
//! inserted under the first H1 (the document title), or at the very top.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::headings::{Heading, document_title};

/// Header labels recognized as an existing TOC (compared case-insensitively).
pub const TOC_LABELS: [&str; 3] = ["目次", "Table of Contents", "TOC"];

/// Header line written when a TOC is inserted fresh.
pub const CANONICAL_HEADER: &str = "## 目次";

/// Matches a bullet or ordered list item.
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]|\d{1,9}[.)])(?:\s|$)").expect("list item regex")
});

/// Whether heading text names a TOC section.
pub fn is_toc_label(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    TOC_LABELS.iter().any(|label| label.to_lowercase() == text)
}

/// Where the rendered TOC should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocLocation {
    /// A recognized TOC header exists at line `header`; `body` is the line
    /// range to replace. The range may be empty.
    Existing { header: usize, body: Range<usize> },
    /// No TOC yet: insert a new block before line `at`.
    Insert { at: usize },
}

#[derive(Debug, Clone, Copy)]
enum LocatorState {
    Searching,
    InsideToc { header: usize, level: u8 },
    Done { header: usize, end: usize },
}

/// Locate an existing TOC block, or the insertion point for a new one.
///
/// `lines` is the document split on `'\n'`; `headings` must come from the same
/// text. An existing TOC takes precedence over the title fallback.
pub fn locate_toc(lines: &[&str], headings: &[Heading]) -> TocLocation {
    let mut state = LocatorState::Searching;

    for heading in headings {
        match state {
            LocatorState::Searching if is_toc_label(&heading.text) => {
                state = LocatorState::InsideToc {
                    header: heading.line,
                    level: heading.level,
                };
            }
            LocatorState::InsideToc { header, level } if heading.level <= level => {
                state = LocatorState::Done {
                    header,
                    end: heading.line,
                };
                break;
            }
            _ => {}
        }
    }

    match state {
        LocatorState::Searching => TocLocation::Insert {
            at: insertion_point(lines, headings),
        },
        LocatorState::InsideToc { header, .. } => TocLocation::Existing {
            header,
            body: list_block(lines, header + 1, lines.len()),
        },
        LocatorState::Done { header, end } => TocLocation::Existing {
            header,
            body: list_block(lines, header + 1, end),
        },
    }
}

/// Splice `rendered` (list lines, no trailing newline) into `text` at `location`.
///
/// Keeps one blank line on each side of the list so it never merges with
/// neighbouring content, and preserves the document's trailing newline.
/// Inserted lines follow the document's line ending (`\r\n` or `\n`).
pub fn splice_toc(text: &str, location: &TocLocation, rendered: &str) -> String {
    let crlf = text.contains("\r\n");
    let lines: Vec<&str> = text.split('\n').collect();
    let block = rendered.split('\n').map(|l| with_eol(l, crlf));
    let mut out: Vec<Cow<'_, str>> =
        Vec::with_capacity(lines.len() + rendered.lines().count() + 4);

    match location {
        TocLocation::Existing { body, .. } => {
            out.extend(lines[..body.start].iter().map(|l| Cow::Borrowed(*l)));
            out.push(with_eol("", crlf));
            out.extend(block);
            if lines.get(body.end).is_some_and(|l| !is_blank(l)) {
                out.push(with_eol("", crlf));
            }
            out.extend(lines[body.end..].iter().map(|l| Cow::Borrowed(*l)));
        }
        TocLocation::Insert { at } => {
            let at = (*at).min(lines.len());
            out.extend(lines[..at].iter().map(|l| Cow::Borrowed(*l)));
            if at > 0 && !is_blank(lines[at - 1]) {
                out.push(with_eol("", crlf));
            }
            out.push(with_eol(CANONICAL_HEADER, crlf));
            out.push(with_eol("", crlf));
            out.extend(block);
            if !lines.get(at).is_some_and(|l| is_blank(l)) {
                out.push(with_eol("", crlf));
            }
            out.extend(lines[at..].iter().map(|l| Cow::Borrowed(*l)));
        }
    }

    out.join("\n")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// After the title, skipping one blank line; line 0 when there is no title.
fn insertion_point(lines: &[&str], headings: &[Heading]) -> usize {
    let Some(title) = document_title(headings) else {
        return 0;
    };

    let after = title.line + 1;
    if lines.get(after).is_some_and(|l| is_blank(l)) {
        after + 1
    } else {
        after
    }
}

/// The replaceable part of a TOC section body within `start..end`.
///
/// Covers leading blank lines and the first contiguous list after them. The
/// block ends at the first blank line following a list line, so a separate
/// list or prose further down is left alone.
fn list_block(lines: &[&str], start: usize, end: usize) -> Range<usize> {
    let end = end.min(lines.len());
    let mut last_list_line = None;

    for (i, line) in lines.iter().enumerate().take(end).skip(start) {
        if is_blank(line) {
            if last_list_line.is_some() {
                break;
            }
            continue;
        }
        let continuation = last_list_line.is_some() && line.starts_with([' ', '\t']);
        if LIST_ITEM_RE.is_match(line) || continuation {
            last_list_line = Some(i);
        } else {
            break;
        }
    }

    match last_list_line {
        Some(last) => start..last + 1,
        None => start..start,
    }
}

/// A line to be inserted, carrying a `\r` when the document uses CRLF.
fn with_eol(line: &str, crlf: bool) -> Cow<'_, str> {
    if crlf {
        Cow::Owned(format!("{line}\r"))
    } else {
        Cow::Borrowed(line)
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headings::extract_headings;

    fn locate(md: &str) -> TocLocation {
        let lines: Vec<&str> = md.split('\n').collect();
        locate_toc(&lines, &extract_headings(md))
    }

    #[test]
    fn recognizes_labels_case_insensitively() {
        assert!(is_toc_label("目次"));
        assert!(is_toc_label("table of contents"));
        assert!(is_toc_label("Toc"));
        assert!(is_toc_label("  TOC "));
        assert!(!is_toc_label("Contents"));
        assert!(!is_toc_label("目次 (auto)"));
    }

    #[test]
    fn finds_existing_toc_body() {
        assert_eq!(
            locate("## 目次\n- old\n## A\n"),
            TocLocation::Existing { header: 0, body: 1..2 }
        );
    }

    #[test]
    fn toc_at_any_level() {
        assert_eq!(
            locate("# T\n#### Table of Contents\n- a\n##### deeper\n"),
            TocLocation::Existing { header: 1, body: 2..3 }
        );
    }

    #[test]
    fn body_includes_leading_blanks_and_nested_items() {
        let md = "## TOC\n\n- a\n  - b\n## A\n";
        assert_eq!(locate(md), TocLocation::Existing { header: 0, body: 1..4 });
    }

    #[test]
    fn body_ends_at_blank_line_after_list() {
        let md = "# T\n\n## 目次\n\n- [A](#a)\n\n- keep me\n## A\n";
        assert_eq!(locate(md), TocLocation::Existing { header: 2, body: 3..5 });
    }

    #[test]
    fn body_stops_before_prose() {
        let md = "# T\n\n## 目次\n\n- a\n\nIntro paragraph.\n\n## A\n";
        assert_eq!(locate(md), TocLocation::Existing { header: 2, body: 3..5 });
    }

    #[test]
    fn empty_toc_yields_empty_range() {
        assert_eq!(
            locate("## 目次\n## A\n"),
            TocLocation::Existing { header: 0, body: 1..1 }
        );
        assert_eq!(
            locate("## 目次\nSee below.\n## A\n"),
            TocLocation::Existing { header: 0, body: 1..1 }
        );
    }

    #[test]
    fn toc_running_to_end_of_document() {
        assert_eq!(
            locate("# T\n## A\n## TOC\n1. one\n2. two\n"),
            TocLocation::Existing { header: 2, body: 3..5 }
        );
    }

    #[test]
    fn deeper_heading_does_not_end_toc_section() {
        // The ### line is inside the section but stops the list block.
        assert_eq!(
            locate("## TOC\n- a\n### Sub\n- b\n## A\n"),
            TocLocation::Existing { header: 0, body: 1..2 }
        );
    }

    #[test]
    fn existing_toc_wins_over_title() {
        assert_eq!(
            locate("## TOC\n- a\n# Title\n"),
            TocLocation::Existing { header: 0, body: 1..2 }
        );
    }

    #[test]
    fn toc_label_inside_code_fence_is_ignored() {
        assert_eq!(
            locate("# T\n```\n## TOC\n```\n## A\n"),
            TocLocation::Insert { at: 1 }
        );
    }

    #[test]
    fn inserts_after_title_and_blank_line() {
        assert_eq!(locate("# Title\n\n## A\n"), TocLocation::Insert { at: 2 });
        assert_eq!(locate("# Title\n## A\n"), TocLocation::Insert { at: 1 });
    }

    #[test]
    fn inserts_after_first_h1_even_when_not_first_heading() {
        assert_eq!(locate("## Intro\n# Main\n## A\n"), TocLocation::Insert { at: 2 });
    }

    #[test]
    fn inserts_at_top_without_h1() {
        assert_eq!(locate("## A\n## B\n"), TocLocation::Insert { at: 0 });
    }

    #[test]
    fn splice_replaces_existing_body() {
        let md = "## 目次\n- old\n## A\n";
        let loc = locate(md);
        assert_eq!(
            splice_toc(md, &loc, "- [A](#a)"),
            "## 目次\n\n- [A](#a)\n\n## A\n"
        );
    }

    #[test]
    fn splice_into_empty_toc_keeps_following_prose() {
        let md = "## TOC\nSee below.\n## A\n";
        let loc = locate(md);
        assert_eq!(
            splice_toc(md, &loc, "- [A](#a)"),
            "## TOC\n\n- [A](#a)\n\nSee below.\n## A\n"
        );
    }

    #[test]
    fn splice_inserts_fresh_block_after_title() {
        let md = "# Title\n\n## A\n";
        let loc = locate(md);
        assert_eq!(
            splice_toc(md, &loc, "- [A](#a)"),
            "# Title\n\n## 目次\n\n- [A](#a)\n\n## A\n"
        );
    }

    #[test]
    fn splice_separates_block_from_title_without_blank_line() {
        let md = "# Title\n## A";
        let loc = locate(md);
        assert_eq!(
            splice_toc(md, &loc, "- [A](#a)"),
            "# Title\n\n## 目次\n\n- [A](#a)\n\n## A"
        );
    }

    #[test]
    fn splice_at_document_start() {
        let md = "## A\n";
        let loc = locate(md);
        assert_eq!(
            splice_toc(md, &loc, "- [A](#a)"),
            "## 目次\n\n- [A](#a)\n\n## A\n"
        );
    }

    #[test]
    fn splice_is_stable_when_repeated() {
        let md = "# Title\n\nIntro.\n\n## A\n### A1\n";
        let rendered = "- [A](#a)\n  - [A1](#a1)";
        let once = splice_toc(md, &locate(md), rendered);
        let twice = splice_toc(&once, &locate(&once), rendered);
        assert_eq!(once, twice);
        assert!(twice.contains("Intro."));
    }

    #[test]
    fn splice_keeps_crlf_line_endings() {
        let md = "# T\r\n\r\n## A\r\n";
        let once = splice_toc(md, &locate(md), "- [A](#a)");
        assert_eq!(once, "# T\r\n\r\n## 目次\r\n\r\n- [A](#a)\r\n\r\n## A\r\n");
        assert!(!once.replace("\r\n", "").contains('\n'));

        let twice = splice_toc(&once, &locate(&once), "- [A](#a)");
        assert_eq!(once, twice);
    }
}
