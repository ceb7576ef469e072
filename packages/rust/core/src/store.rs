//! The remote-document seam of the pipeline.

use kibela_toc_client::KibelaClient;
use kibela_toc_shared::{Note, NoteRef, Result};

/// Where notes are read from and written back to.
///
/// The pipeline only ever calls `fetch` once and `update` at most once.
#[allow(async_fn_in_trait)]
pub trait NoteStore {
    /// Load a note by its public number.
    async fn fetch(&self, note: &NoteRef) -> Result<Note>;

    /// Replace the full content of a note fetched by `number`.
    async fn update(&self, number: &NoteRef, note: &Note, new_content: &str) -> Result<()>;
}

impl NoteStore for KibelaClient {
    async fn fetch(&self, note: &NoteRef) -> Result<Note> {
        self.fetch_note(note).await
    }

    async fn update(&self, number: &NoteRef, note: &Note, new_content: &str) -> Result<()> {
        self.update_note_content(number, note, new_content).await
    }
}
