use super::selector_for;
use crate::applier::scan_file;
use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::ToggleError;
use crate::report::{display_path, error_detail, error_line, TagSummary};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ListReport {
    files: usize,
    tags: TagSummary,
    errors: Vec<ListError>,
}

#[derive(Serialize)]
struct ListError {
    path: String,
    error: String,
}

/// Print every tag with its active/inactive counts across the target files.
pub fn run_list(args: &ListArgs, root: &Path) -> Result<()> {
    let config = Config::load(root);
    let selector = selector_for(&args.target, &config, root);
    let files = selector.resolve()?;

    let scans: Vec<_> = files
        .par_iter()
        .map(|path| {
            let result = match selector.styles().style_for(path) {
                Some(style) => scan_file(path, style),
                None => Err(ToggleError::UnsupportedFile(path.clone())),
            };
            (path, result)
        })
        .collect();

    let mut report = ListReport {
        files: files.len(),
        tags: TagSummary::new(),
        errors: Vec::new(),
    };
    for (path, result) in &scans {
        let shown = display_path(selector.root(), path);
        match result {
            Ok(regions) => report.tags.add_regions(regions),
            Err(e) => {
                if !args.json {
                    println!("{}", error_line(&shown, e));
                }
                report.errors.push(ListError {
                    path: shown,
                    error: error_detail(e),
                });
            }
        }
    }

    tracing::debug!(
        files = report.files,
        tags = report.tags.len(),
        errors = report.errors.len(),
        "scanned tags"
    );
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize tag summary")?;
        println!("{}", json);
    } else if report.tags.is_empty() {
        println!("No DEBUG blocks found in {} file(s)", report.files);
    } else {
        for line in report.tags.lines() {
            println!("{}", line);
        }
    }

    if !report.errors.is_empty() {
        anyhow::bail!("{} file(s) could not be scanned", report.errors.len());
    }

    Ok(())
}
