//! Human-readable reporting shared by the CLI commands and the watch session.

use crate::applier::{FileOutcome, FileStatus};
use crate::error::ToggleError;
use crate::types::{blocks, BlockState, Region};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Active/inactive block counts for one tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagCounts {
    pub active: usize,
    pub inactive: usize,
}

impl TagCounts {
    fn record(&mut self, state: BlockState) {
        match state {
            BlockState::Active => self.active += 1,
            BlockState::Inactive => self.inactive += 1,
        }
    }
}

impl fmt::Display for TagCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.active, self.inactive) {
            (active, 0) => write!(f, "{} active", active),
            (0, inactive) => write!(f, "{} inactive", inactive),
            (active, inactive) => write!(f, "{} active, {} inactive", active, inactive),
        }
    }
}

/// Distinct tags seen across a set of files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSummary {
    tags: BTreeMap<String, TagCounts>,
}

impl TagSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_regions(&mut self, regions: &[Region]) {
        for block in blocks(regions) {
            self.tags
                .entry(block.tag.as_str().to_string())
                .or_default()
                .record(block.state);
        }
    }

    pub fn get(&self, tag: &str) -> Option<TagCounts> {
        self.tags.get(tag).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// `tag: counts` lines, sorted by tag.
    pub fn lines(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|(tag, counts)| format!("{}: {}", tag, counts))
            .collect()
    }
}

/// Path shown to the user: relative to `root` when possible.
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}

/// One result line per file.
pub fn outcome_line(shown: &str, result: &Result<FileOutcome, ToggleError>) -> String {
    match result {
        Ok(outcome) => match outcome.status {
            FileStatus::Modified(n) => {
                format!("✓ Modified: {} ({} debug section(s) toggled)", shown, n)
            }
            FileStatus::WouldModify(n) => {
                format!("~ Would modify: {} ({} debug section(s))", shown, n)
            }
            FileStatus::Unchanged => format!("○ No changes needed: {}", shown),
        },
        Err(e) => error_line(shown, e),
    }
}

pub fn error_line(shown: &str, error: &ToggleError) -> String {
    format!("✗ Error processing {}: {}", shown, error_detail(error))
}

/// Error text without the path prefix when the error already carries it.
pub fn error_detail(error: &ToggleError) -> String {
    match error {
        ToggleError::Scan { error, .. } => error.to_string(),
        other => other.to_string(),
    }
}
