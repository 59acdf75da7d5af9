//! Batch toggle: apply one request to a file or a directory and report per file.

use super::selector_for;
use crate::batch::run_batch;
use crate::cli::{FilterOptions, ModeArgs, TargetOptions, ToggleArgs};
use crate::config::Config;
use crate::report::{display_path, outcome_line};
use crate::types::Mode;
use anyhow::Result;
use std::path::Path;

pub fn run_toggle(args: &ToggleArgs, root: &Path) -> Result<()> {
    run_mode(args.mode, &args.target, &args.filter, root)
}

pub fn run_comment(args: &ModeArgs, root: &Path) -> Result<()> {
    run_mode(Mode::Comment, &args.target, &args.filter, root)
}

pub fn run_uncomment(args: &ModeArgs, root: &Path) -> Result<()> {
    run_mode(Mode::Uncomment, &args.target, &args.filter, root)
}

fn run_mode(mode: Mode, target: &TargetOptions, filter: &FilterOptions, root: &Path) -> Result<()> {
    // Rejected before any file is read
    let request = filter.request(mode)?;

    let config = Config::load(root);
    let selector = selector_for(target, &config, root);
    let files = selector.resolve()?;
    let is_dir = selector.root().is_dir();

    if files.is_empty() {
        tracing::debug!(extensions = ?selector.styles().supported_extensions(), "no file matched");
        println!("No supported files found in {}", selector.root().display());
        return Ok(());
    }

    tracing::debug!(mode = %mode, files = files.len(), dry_run = filter.dry_run, "running batch");
    if is_dir {
        println!("Processing {} file(s)...\n", files.len());
    }

    let report = run_batch(&files, selector.styles(), &request, filter.dry_run);

    for entry in &report.entries {
        let shown = display_path(selector.root(), &entry.path);
        println!("{}", outcome_line(&shown, &entry.result));
    }

    println!(
        "\n{}/{} files processed successfully",
        report.succeeded(),
        report.total()
    );

    if !report.is_success() {
        anyhow::bail!("{} file(s) failed to process", report.failed());
    }

    Ok(())
}
