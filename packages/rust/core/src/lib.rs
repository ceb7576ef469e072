//! Pipeline orchestration for kibela-toc.
//!
//! Ties URL parsing, the remote note store, and TOC generation into a single
//! run (see [`pipeline::run`]).

pub mod pipeline;
pub mod store;

pub use pipeline::{ProgressReporter, RunConfig, RunOutcome, SilentProgress, run};
pub use store::NoteStore;
