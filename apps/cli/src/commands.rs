//! CLI definition, tracing setup, and output rendering.

use std::io::Write;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use kibela_toc_client::KibelaClient;
use kibela_toc_core::{ProgressReporter, RunConfig, RunOutcome};
use kibela_toc_shared::{Depth, KibelaConfig};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Keep a Kibela note's table of contents in sync with its headings.
#[derive(Parser)]
#[command(
    name = "kibela-toc",
    version,
    about = "Generate or update the table of contents of a Kibela note.",
    long_about = None,
    after_help = "Environment:\n  \
        KIBELA_TOKEN     API access token (required)\n  \
        KIBELA_TEAM      team subdomain, as in <team>.kibe.la (required)\n  \
        KIBELA_ENDPOINT  GraphQL endpoint override (optional)\n\n\
        Examples:\n  \
        kibela-toc https://team.kibe.la/notes/123\n  \
        kibela-toc https://team.kibe.la/notes/123 --depth 2\n  \
        kibela-toc https://team.kibe.la/notes/123 --depth 4 --dry-run",
)]
pub(crate) struct Cli {
    /// Kibela note URL.
    pub url: String,

    /// Maximum heading depth to include (1-6).
    #[arg(short, long, default_value_t = Depth::default())]
    pub depth: Depth,

    /// Print the updated note to stdout instead of saving it.
    #[arg(long)]
    pub dry_run: bool,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so that
/// `--dry-run` output on stdout stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "kibela_toc=info",
        1 => "kibela_toc=debug",
        _ => "kibela_toc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Run the tool: load config, then fetch, rebuild the TOC, and update or print.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    // Configuration problems surface before any network traffic.
    let kibela = KibelaConfig::from_env()?;
    let client = KibelaClient::new(&kibela)?;

    let config = RunConfig {
        url: cli.url,
        depth: cli.depth,
        dry_run: cli.dry_run,
        team: Some(kibela.team.clone()),
    };

    info!(
        url = %config.url,
        depth = %config.depth,
        dry_run = config.dry_run,
        "generating table of contents"
    );

    let outcome = {
        let reporter = CliProgress::new();
        kibela_toc_core::run(&client, &config, &reporter).await?
    };

    print_outcome(&outcome)
}

fn print_outcome(outcome: &RunOutcome) -> Result<()> {
    let title = &outcome.note().title;

    match outcome {
        RunOutcome::NoHeadings { .. } => {
            println!("No headings found in \"{title}\". Nothing to do.");
        }
        RunOutcome::UpToDate { entries, .. } => {
            println!(
                "Table of contents of \"{title}\" is already up to date ({} entries).",
                entries.len()
            );
        }
        RunOutcome::DryRun { content, .. } => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| {
                    if content.ends_with('\n') {
                        Ok(())
                    } else {
                        stdout.write_all(b"\n")
                    }
                })
                .and_then(|()| stdout.flush())
                .wrap_err("failed to write preview to stdout")?;
        }
        RunOutcome::Updated {
            entries, action, ..
        } => {
            println!();
            println!("  Note updated!");
            println!("  Title:   {title}");
            println!("  Entries: {}", entries.len());
            println!("  Action:  {action}");
            println!();
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner on stderr.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _outcome: &RunOutcome) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        // Errors skip `done`; never leave a spinner behind.
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
