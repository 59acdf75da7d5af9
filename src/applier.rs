//! File applier: read a file, scan it, run the engine, write it back only if
//! something changed.
//!
//! Line endings are kept per line, so a file with `\r\n` (or a mix, or no
//! trailing newline) is written back byte-identical outside the toggled bodies.
//! A leading UTF-8 byte order mark is set aside before scanning and restored
//! on render.

use crate::engine;
use crate::error::ToggleError;
use crate::parser::{scan, CommentStyle};
use crate::types::{Region, ToggleRequest};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
    None,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::None => "",
        }
    }
}

/// File content split into lines, remembering each line's terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    bom: bool,
    lines: Vec<String>,
    endings: Vec<LineEnding>,
}

const BOM: char = '\u{feff}';

impl SourceText {
    pub fn parse(content: &str) -> Self {
        let (bom, content) = match content.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, content),
        };
        let mut lines = Vec::new();
        let mut endings = Vec::new();

        for chunk in content.split_inclusive('\n') {
            let (line, ending) = if let Some(line) = chunk.strip_suffix("\r\n") {
                (line, LineEnding::CrLf)
            } else if let Some(line) = chunk.strip_suffix('\n') {
                (line, LineEnding::Lf)
            } else {
                (chunk, LineEnding::None)
            };
            lines.push(line.to_string());
            endings.push(ending);
        }

        Self {
            bom,
            lines,
            endings,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Same terminators, new line contents.
    pub fn with_lines(&self, lines: Vec<String>) -> Self {
        let last = lines.len().saturating_sub(1);
        let endings = (0..lines.len())
            .map(|i| match self.endings.get(i) {
                Some(ending) => *ending,
                None if i == last => LineEnding::None,
                None => LineEnding::Lf,
            })
            .collect();
        Self {
            bom: self.bom,
            lines,
            endings,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }
        for (line, ending) in self.lines.iter().zip(&self.endings) {
            out.push_str(line);
            out.push_str(ending.as_str());
        }
        out
    }
}

/// Content hash used to tell external edits from our own writes.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Written back with this many blocks toggled
    Modified(usize),
    /// Dry run: would have toggled this many blocks
    WouldModify(usize),
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
    /// File content after the operation (what is on disk unless dry run)
    pub content: String,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self.status, FileStatus::Unchanged)
    }
}

pub fn read_source(path: &Path) -> Result<String, ToggleError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ToggleError::NotFound(path.to_path_buf()),
        _ => ToggleError::io("read", path, e),
    })
}

/// Scan already-loaded content, attributing errors to `path`.
pub fn scan_content(path: &Path, content: &str, style: &CommentStyle) -> Result<Vec<Region>, ToggleError> {
    let source = SourceText::parse(content);
    scan(source.lines(), style).map_err(|error| ToggleError::Scan {
        path: path.to_path_buf(),
        error,
    })
}

/// Read and scan a file without modifying it.
pub fn scan_file(path: &Path, style: &CommentStyle) -> Result<Vec<Region>, ToggleError> {
    let content = read_source(path)?;
    scan_content(path, &content, style)
}

pub fn apply_to_file(
    path: &Path,
    style: &CommentStyle,
    request: &ToggleRequest,
    dry_run: bool,
) -> Result<FileOutcome, ToggleError> {
    let original = read_source(path)?;
    let source = SourceText::parse(&original);
    let regions = scan(source.lines(), style).map_err(|error| ToggleError::Scan {
        path: path.to_path_buf(),
        error,
    })?;

    let rewrite = engine::apply(&regions, request, style);
    if !rewrite.changed {
        return Ok(FileOutcome {
            path: path.to_path_buf(),
            status: FileStatus::Unchanged,
            content: original,
        });
    }

    let content = source.with_lines(rewrite.lines).render();
    if dry_run {
        return Ok(FileOutcome {
            path: path.to_path_buf(),
            status: FileStatus::WouldModify(rewrite.blocks_changed),
            content: original,
        });
    }

    fs::write(path, &content).map_err(|e| ToggleError::io("write", path, e))?;
    tracing::debug!(path = %path.display(), blocks = rewrite.blocks_changed, "wrote file");

    Ok(FileOutcome {
        path: path.to_path_buf(),
        status: FileStatus::Modified(rewrite.blocks_changed),
        content,
    })
}
