//! Shared types, error model, and configuration for kibela-toc.
//!
//! This crate is the foundation depended on by all other kibela-toc crates.
//! It provides:
//! - [`KibelaTocError`] and [`ApiError`] for the unified error types
//! - Domain types ([`Depth`], [`NoteRef`], [`Note`])
//! - Configuration ([`KibelaConfig`], read from the environment)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{ENDPOINT_ENV, KibelaConfig, TEAM_ENV, TOKEN_ENV};
pub use error::{ApiError, KibelaTocError, Result};
pub use types::{DEFAULT_DEPTH, Depth, MAX_HEADING_LEVEL, Note, NoteRef};
