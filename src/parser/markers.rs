//! Marker recognition and the per-line comment transforms.
//!
//! Markers are matched after stripping the file's comment marker, so the
//! patterns here are independent of the host language.

use crate::types::{BlockState, Tag};
use once_cell::sync::Lazy;
use regex::Regex;

static START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^DEBUG START(?:\s*\[([^\]]*)\])?$").expect("start marker pattern is valid")
});

static END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^DEBUG END$").expect("end marker pattern is valid"));

/// A line recognised as a block delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerLine {
    Start(Tag),
    End,
}

/// Classify a line as a start marker, an end marker, or neither.
pub fn classify(line: &str, marker: &str) -> Option<MarkerLine> {
    let rest = line.trim().strip_prefix(marker)?.trim();

    if let Some(caps) = START_RE.captures(rest) {
        let tag = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Some(MarkerLine::Start(Tag::new(tag)));
    }
    if END_RE.is_match(rest) {
        return Some(MarkerLine::End);
    }
    None
}

fn split_indent(line: &str) -> (&str, &str) {
    let content = line.trim_start();
    (&line[..line.len() - content.len()], content)
}

/// True if the line starts, after indentation, with the comment marker.
pub fn is_commented(line: &str, marker: &str) -> bool {
    line.trim_start().starts_with(marker)
}

/// `<indent><content>` becomes `<indent><marker> <content>`. Blank lines stay blank.
pub fn comment_line(line: &str, marker: &str) -> String {
    if line.trim().is_empty() {
        return line.to_string();
    }
    let (indent, content) = split_indent(line);
    format!("{indent}{marker} {content}")
}

/// Inverse of [`comment_line`]: drop the marker and at most one following space.
pub fn uncomment_line(line: &str, marker: &str) -> String {
    let (indent, content) = split_indent(line);
    match content.strip_prefix(marker) {
        Some(rest) => {
            let rest = rest.strip_prefix(' ').unwrap_or(rest);
            format!("{indent}{rest}")
        }
        None => line.to_string(),
    }
}

/// A body is inactive iff it has at least one non-blank line and every
/// non-blank line is commented. Any uncommented line makes it active.
pub fn derive_state<S: AsRef<str>>(body: &[S], marker: &str) -> BlockState {
    let mut saw_commented = false;
    for line in body.iter().map(AsRef::as_ref) {
        if line.trim().is_empty() {
            continue;
        }
        if !is_commented(line, marker) {
            return BlockState::Active;
        }
        saw_commented = true;
    }
    if saw_commented {
        BlockState::Inactive
    } else {
        BlockState::Active
    }
}
