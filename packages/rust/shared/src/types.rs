//! Core domain types shared across kibela-toc crates.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{KibelaTocError, Result};

/// Default maximum heading level included in a generated TOC.
pub const DEFAULT_DEPTH: u8 = 3;

/// Deepest heading level markdown supports.
pub const MAX_HEADING_LEVEL: u8 = 6;

// ---------------------------------------------------------------------------
// Depth
// ---------------------------------------------------------------------------

/// Maximum heading level (1–6) included in the generated TOC.
///
/// Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Depth(u8);

impl Depth {
    /// Validate a raw depth value.
    pub fn new(value: u8) -> Result<Self> {
        if (1..=MAX_HEADING_LEVEL).contains(&value) {
            Ok(Self(value))
        } else {
            Err(KibelaTocError::config(format!(
                "depth must be between 1 and {MAX_HEADING_LEVEL}, got {value}"
            )))
        }
    }

    /// The raw level.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self(DEFAULT_DEPTH)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Depth {
    type Err = KibelaTocError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u8 = s.trim().parse().map_err(|_| {
            KibelaTocError::config(format!(
                "depth must be an integer between 1 and {MAX_HEADING_LEVEL}, got '{s}'"
            ))
        })?;
        Self::new(value)
    }
}

// ---------------------------------------------------------------------------
// NoteRef
// ---------------------------------------------------------------------------

/// The public note number as it appears in a note URL (`/notes/<n>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteRef(String);

impl NoteRef {
    /// Build a reference from a digits-only string.
    pub fn new(number: impl Into<String>) -> Result<Self> {
        let number = number.into();
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(KibelaTocError::invalid_url(
                number,
                "note number must be a non-empty run of digits",
            ));
        }
        Ok(Self(number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// A note as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Note {
    /// Internal (GraphQL) identifier, used for updates.
    pub id: String,
    /// Note title.
    #[serde(default)]
    pub title: String,
    /// Raw markdown body.
    #[serde(default)]
    pub content: String,
}
