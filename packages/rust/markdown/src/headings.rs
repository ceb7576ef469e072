//! ATX heading extraction with fenced-code awareness.

use std::sync::LazyLock;

use regex::Regex;

/// A markdown heading found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of leading `#` characters (1–6).
    pub level: u8,
    /// Heading text with trailing whitespace and closing `#` decoration removed.
    pub text: String,
    /// Zero-based line index in the source document.
    pub line: usize,
}

/// Matches an ATX heading: up to 3 spaces, 1–6 `#`, whitespace, then text.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.*)$").expect("heading regex")
});

/// Matches a code fence opener or closer: up to 3 spaces, then 3+ backticks or tildes.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(`{3,}|~{3,})(.*)$").expect("fence regex")
});

/// Matches an optional closing sequence of `#` preceded by whitespace.
static CLOSING_HASHES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[ \t]+)#+[ \t]*$").expect("closing hashes regex")
});

/// Extract every heading outside fenced code blocks, in document order.
pub fn extract_headings(text: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut fence = FenceTracker::default();

    for (line_no, raw) in text.split('\n').enumerate() {
        let line = raw.trim_end_matches('\r');

        if fence.consume(line) {
            continue;
        }

        if let Some(heading) = parse_heading(line, line_no) {
            headings.push(heading);
        }
    }

    headings
}

/// The document title: the first H1 heading, wherever it appears.
pub fn document_title(headings: &[Heading]) -> Option<&Heading> {
    headings.iter().find(|h| h.level == 1)
}

/// Parse a single line as an ATX heading. Fence state is the caller's concern.
pub(crate) fn parse_heading(line: &str, line_no: usize) -> Option<Heading> {
    let caps = HEADING_RE.captures(line)?;
    let level = caps[1].len() as u8;

    let rest = caps[2].trim_end();
    let text = CLOSING_HASHES_RE.replace(rest, "");
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    Some(Heading {
        level,
        text: text.to_string(),
        line: line_no,
    })
}

// ---------------------------------------------------------------------------
// Fence tracking
// ---------------------------------------------------------------------------

/// Tracks whether the scan is inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    /// Feed one line. Returns `true` if the line belongs to a fence
    /// (opener, body, or closer) and must not be read as markdown structure.
    pub(crate) fn consume(&mut self, line: &str) -> bool {
        match self.open {
            Some((marker, len)) => {
                if let Some(caps) = FENCE_RE.captures(line) {
                    let run = &caps[1];
                    let closes = run.starts_with(marker)
                        && run.chars().count() >= len
                        && caps[2].trim().is_empty();
                    if closes {
                        self.open = None;
                    }
                }
                true
            }
            None => {
                let Some(caps) = FENCE_RE.captures(line) else {
                    return false;
                };
                let run = &caps[1];
                let marker = run.chars().next().unwrap_or('`');
                // Backtick fences cannot carry backticks in their info string.
                if marker == '`' && caps[2].contains('`') {
                    return false;
                }
                self.open = Some((marker, run.chars().count()));
                true
            }
        }
    }
}
