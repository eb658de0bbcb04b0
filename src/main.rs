//! dualsearch command line host
//!
//! Drives both providers from a terminal the way an editor would: one query,
//! two result sections, Ctrl-C as the cancellation token.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dualsearch::{
    host::{RecordingNotifier, SearchOutcome, FILE_SCHEME},
    search::SearchSection,
    AppState, BackendResult, Settings, TextSearchOptions, TextSearchQuery,
};
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

#[derive(Parser)]
#[command(name = "dualsearch", version, about = "Search code through keyword and semantic backends")]
struct Cli {
    /// Path to settings.yml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a search against both backends
    Search {
        pattern: String,
        /// Treat the pattern as a regular expression
        #[arg(long)]
        regex: bool,
        /// Only search files matching this glob (repeatable)
        #[arg(long = "include")]
        includes: Vec<String>,
        /// Skip files matching this glob (repeatable)
        #[arg(long = "exclude")]
        excludes: Vec<String>,
        /// Maximum results per backend
        #[arg(long)]
        max: Option<usize>,
        /// Workspace folder backend paths are relative to
        #[arg(long)]
        root: Option<PathBuf>,
        /// Query the semantic backend even if disabled in settings
        #[arg(long)]
        semantic: bool,
    },
    /// Check that both backends are up
    Health,
    /// Show index statistics from both backends
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = Settings::locate(cli.config.as_deref());
    let settings = Settings::load(settings_path.as_deref())?;
    init_logging(&settings);
    info!("Starting dualsearch v{}", dualsearch::VERSION);
    match &settings_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    let notifier = Arc::new(RecordingNotifier::new());
    let state = AppState::new(settings, notifier.clone())?;

    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Command::Search {
            pattern,
            regex,
            includes,
            excludes,
            max,
            root,
            semantic,
        } => {
            if semantic {
                state.settings.update(|s| s.semantic_server.enabled = true);
            }

            let query = TextSearchQuery {
                pattern,
                is_regex: regex,
            };
            let options = TextSearchOptions {
                folder: workspace_url(root)?,
                includes,
                excludes,
                max_results: max,
            };

            let results = state
                .search
                .execute(FILE_SCHEME, &query, &options, &token)
                .await;

            for section in &results.sections {
                print_section(section, &options.folder);
            }
            for message in notifier.messages() {
                eprintln!("warning: {}", message);
            }
        }
        Command::Health => {
            let (keyword, semantic) = state.health(&token).await;
            print_report("keyword", keyword, |h| format!("{} (v{})", h.status, h.version));
            print_report("semantic", semantic, |h| format!("{} (v{})", h.status, h.version));
        }
        Command::Stats => {
            let (keyword, semantic) = state.stats(&token).await;
            print_report("keyword", keyword, |s| {
                format!(
                    "{} files, {} bytes, {} trigrams, {} dependency edges",
                    s.num_files, s.total_size, s.num_trigrams, s.dependency_edges
                )
            });
            print_report("semantic", semantic, |s| {
                format!(
                    "{} files, {} chunks, dim {}, cache {}",
                    s.num_files, s.num_chunks, s.embedding_dim, s.cache_size
                )
            });
        }
    }

    Ok(())
}

fn init_logging(settings: &Settings) {
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Directory URL for the workspace root, defaulting to the current directory
fn workspace_url(root: Option<PathBuf>) -> Result<Url> {
    let cwd = std::env::current_dir()?;
    let root = match root {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd,
    };
    Url::from_directory_path(&root).map_err(|_| anyhow!("invalid workspace root: {}", root.display()))
}

fn print_section(section: &SearchSection, folder: &Url) {
    let Some(complete) = section.complete else {
        return;
    };

    let status = match complete.outcome {
        SearchOutcome::Completed if complete.limit_hit => "limit reached".to_string(),
        SearchOutcome::Completed => "done".to_string(),
        SearchOutcome::Cancelled => "cancelled".to_string(),
        SearchOutcome::Failed(backend) => format!("{} backend failed", backend),
    };
    println!("== {} ({}, {})", section.kind.title(), section.matches.len(), status);

    for m in &section.matches {
        let location = folder
            .make_relative(&m.uri)
            .unwrap_or_else(|| m.uri.to_string());
        let preview = m.preview_text.lines().next().unwrap_or_default().trim();
        if m.range.is_single_line() {
            println!(
                "{}:{}:{}: {}",
                location,
                m.range.start.line + 1,
                m.range.start.character + 1,
                preview
            );
        } else {
            println!(
                "{}:{}-{}: {}",
                location,
                m.range.start.line + 1,
                m.range.end.line + 1,
                preview
            );
        }
    }
}

fn print_report<T, F, D>(name: &str, result: BackendResult<T>, describe: F)
where
    F: FnOnce(&T) -> D,
    D: Display,
{
    match result {
        Ok(value) => println!("{:<9} {}", name, describe(&value)),
        Err(e) => println!("{:<9} error: {}", name, e),
    }
}
