//! End-to-end run: URL → fetch → TOC → update (or dry-run).

use tracing::{debug, info, instrument, warn};

use kibela_toc_client::parse_note_url;
use kibela_toc_markdown::{TocAction, TocEdit, TocEntry, apply_toc};
use kibela_toc_shared::{Depth, Note, Result};

use crate::store::NoteStore;

/// Configuration for a single run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Note URL as given on the command line.
    pub url: String,
    /// Deepest heading level listed in the TOC.
    pub depth: Depth,
    /// Compute the result but never write it back.
    pub dry_run: bool,
    /// Configured team; a URL on another team's host only triggers a warning.
    pub team: Option<String>,
}

/// How a run ended. Every variant is a success.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The note has no headings that belong in a TOC.
    NoHeadings { note: Note },
    /// The note already carries the exact TOC that would be written.
    UpToDate { note: Note, entries: Vec<TocEntry> },
    /// Dry-run: the document that would have been written.
    DryRun {
        note: Note,
        content: String,
        entries: Vec<TocEntry>,
        action: TocAction,
    },
    /// The note was updated remotely.
    Updated {
        note: Note,
        entries: Vec<TocEntry>,
        action: TocAction,
    },
}

impl RunOutcome {
    /// The fetched note this outcome refers to.
    pub fn note(&self) -> &Note {
        match self {
            Self::NoHeadings { note }
            | Self::UpToDate { note, .. }
            | Self::DryRun { note, .. }
            | Self::Updated { note, .. } => note,
        }
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the run completes successfully.
    fn done(&self, outcome: &RunOutcome);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _outcome: &RunOutcome) {}
}

/// Run the full pipeline against `store`.
///
/// The new document is computed entirely in memory before the single write,
/// so a failure leaves the remote note untouched.
#[instrument(skip_all, fields(url = %config.url, depth = %config.depth, dry_run = config.dry_run))]
pub async fn run<S: NoteStore>(
    store: &S,
    config: &RunConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunOutcome> {
    progress.phase("Parsing URL");
    let target = parse_note_url(&config.url)?;
    if let Some(team) = config.team.as_deref() {
        if !target.belongs_to(team) {
            warn!(host = %target.host, team, "URL host does not match the configured team");
        }
    }
    info!(note = %target.note, "processing note");

    progress.phase("Fetching note");
    let note = store.fetch(&target.note).await?;

    let outcome = match apply_toc(&note.content, config.depth) {
        TocEdit::NoHeadings => {
            info!("no headings found, nothing to do");
            RunOutcome::NoHeadings { note }
        }
        TocEdit::Applied {
            content,
            entries,
            action,
        } if config.dry_run => {
            info!(entries = entries.len(), %action, "dry run, note left unchanged");
            RunOutcome::DryRun {
                note,
                content,
                entries,
                action,
            }
        }
        TocEdit::Applied {
            content, entries, ..
        } if content == note.content => {
            info!(entries = entries.len(), "TOC already up to date");
            RunOutcome::UpToDate { note, entries }
        }
        TocEdit::Applied {
            content,
            entries,
            action,
        } => {
            debug!(
                old_len = note.content.len(),
                new_len = content.len(),
                "writing note"
            );
            progress.phase("Updating note");
            store.update(&target.note, &note, &content).await?;
            info!(entries = entries.len(), %action, "note updated");
            RunOutcome::Updated {
                note,
                entries,
                action,
            }
        }
    };

    progress.done(&outcome);
    Ok(outcome)
}
