//! Command-line interface module for tidybox.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing via clap derive
//! - Resolving the target directory from arguments or the config record
//! - Organization orchestration
//! - Outcome reporting and the summary table

use crate::classifier::Classifier;
use crate::config::{CONFIG_FILE, Config, exclusion_set};
use crate::organizer::{Organizer, Outcome};
use crate::output::OutputFormatter;
use clap::Parser;
use std::collections::HashMap;
use std::path::{Component, PathBuf};

/// Organize a directory into age- and type-based subfolders.
///
/// Files modified within the last seven days go to `recent/`; older files
/// are sorted by extension into fixed category folders. Re-running on an
/// unchanged tree moves nothing.
#[derive(Parser, Debug)]
#[command(name = "tidybox", version)]
pub struct Cli {
    /// Directory to organize; defaults to the path stored in the config record
    pub dir: Option<PathBuf>,

    /// Show what would be moved without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Config record to read (and write with --save-config)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Persist DIR as the default target for future runs
    #[arg(long, requires = "dir")]
    pub save_config: bool,
}

/// Runs the CLI application.
///
/// Resolves the target directory (explicit argument first, persisted config
/// record second), optionally persists it, then runs the organizer and
/// reports every outcome.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use tidybox::cli::{Cli, run};
///
/// let cli = Cli::parse_from(["tidybox", "/home/user/Downloads", "--dry-run"]);
/// if let Err(e) = run(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.dir {
        Some(dir) => Config::new(dir.clone()),
        None => Config::load(cli.config.as_deref()).map_err(|e| e.to_string())?,
    };
    config.validate().map_err(|e| e.to_string())?;

    if cli.save_config {
        let record = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        config.save(&record).map_err(|e| e.to_string())?;
        OutputFormatter::success(&format!("Saved target path to {}", record.display()));
    }

    OutputFormatter::info(&format!(
        "Organizing files in: {} ({})",
        config.path.display(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    if cli.dry_run {
        OutputFormatter::dry_run_notice("no files will be moved");
    }

    let organizer = Organizer::new(Classifier::default(), exclusion_set());

    let spinner = OutputFormatter::create_spinner("Scanning...");
    let result = organizer.organize(&config.path, cli.dry_run);
    spinner.finish_and_clear();

    let outcomes = result.map_err(|e| e.to_string())?;
    report(&outcomes, cli.dry_run);

    Ok(())
}

/// Prints one line per outcome, then a per-category summary.
fn report(outcomes: &[Outcome], dry_run: bool) {
    if outcomes.is_empty() {
        OutputFormatter::plain("Nothing to do; everything is already in place.");
        return;
    }

    let mut category_counts: HashMap<String, usize> = HashMap::new();
    let mut failures = 0usize;

    for outcome in outcomes {
        match outcome {
            Outcome::Moved { file, target } => {
                OutputFormatter::moved(file, target);
                *category_counts
                    .entry(category_of(target))
                    .or_insert(0) += 1;
            }
            Outcome::WouldMove { file, target } => {
                OutputFormatter::would_move(file, target);
                *category_counts
                    .entry(category_of(target))
                    .or_insert(0) += 1;
            }
            Outcome::Failed { file, reason } => {
                OutputFormatter::failed(file, reason);
                failures += 1;
            }
        }
    }

    let total: usize = category_counts.values().sum();
    if total > 0 {
        OutputFormatter::summary_table(&category_counts, total);
    }

    if failures > 0 {
        OutputFormatter::warning(&format!(
            "{} {} could not be organized.",
            failures,
            if failures == 1 { "file" } else { "files" }
        ));
    } else if dry_run {
        OutputFormatter::success("Dry run complete. No files were modified.");
    } else {
        OutputFormatter::success("Organization complete!");
    }
}

/// Category folder a reported (root-relative) target lives in.
fn category_of(target: &std::path::Path) -> String {
    match target.components().next() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        _ => String::new(),
    }
}
