//! Regions produced by the scanner.
//!
//! A file is a sequence of regions: runs of plain lines and tagged DEBUG
//! blocks. A block's activation state is recomputed from its body on every
//! scan and never stored anywhere else.

use serde::Serialize;
use std::fmt;

/// Name used for blocks whose start marker carries no tag (or an empty one).
pub const DEFAULT_TAG: &str = "default";

/// Tag attached to a `DEBUG START` marker.
///
/// Tags are case-sensitive and trimmed. Empty brackets, missing brackets and an
/// explicit `default` all collapse to the same default tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_TAG
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self(DEFAULT_TAG.to_string())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a block's body is compiled in or commented out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockState {
    Active,
    Inactive,
}

impl BlockState {
    pub fn flipped(self) -> Self {
        match self {
            BlockState::Active => BlockState::Inactive,
            BlockState::Inactive => BlockState::Active,
        }
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockState::Active => f.write_str("active"),
            BlockState::Inactive => f.write_str("inactive"),
        }
    }
}

/// A `DEBUG START` .. `DEBUG END` span, marker lines included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedBlock {
    pub tag: Tag,
    pub state: BlockState,
    /// 1-based line number of the start marker
    pub start_line: usize,
    /// 1-based line number of the end marker
    pub end_line: usize,
    pub start_marker: String,
    pub body: Vec<String>,
    pub end_marker: String,
}

impl TaggedBlock {
    /// All lines of the block in file order, markers included.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.start_marker.as_str())
            .chain(self.body.iter().map(String::as_str))
            .chain(std::iter::once(self.end_marker.as_str()))
    }
}

/// One contiguous span of a scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// Lines outside any block, passed through untouched
    Plain(Vec<String>),
    Tagged(TaggedBlock),
}

impl Region {
    pub fn as_block(&self) -> Option<&TaggedBlock> {
        match self {
            Region::Tagged(block) => Some(block),
            Region::Plain(_) => None,
        }
    }

    pub fn line_count(&self) -> usize {
        match self {
            Region::Plain(lines) => lines.len(),
            Region::Tagged(block) => block.body.len() + 2,
        }
    }
}

/// Iterate over the tagged blocks of a region sequence.
pub fn blocks(regions: &[Region]) -> impl Iterator<Item = &TaggedBlock> {
    regions.iter().filter_map(Region::as_block)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_normalization() {
        assert_eq!(Tag::new("  keep "), Tag::new("keep"));
        assert_eq!(Tag::new(""), Tag::default());
        assert_eq!(Tag::new("   "), Tag::default());
        assert_eq!(Tag::new("default"), Tag::default());
        assert!(Tag::new("").is_default());
        assert!(!Tag::new("keep").is_default());
    }

    #[test]
    fn test_tag_is_case_sensitive() {
        assert_ne!(Tag::new("Keep"), Tag::new("keep"));
    }

    #[test]
    fn test_block_state_flip() {
        assert_eq!(BlockState::Active.flipped(), BlockState::Inactive);
        assert_eq!(BlockState::Inactive.flipped(), BlockState::Active);
        assert_eq!(BlockState::Inactive.to_string(), "inactive");
    }

    #[test]
    fn test_block_lines_include_markers() {
        let block = TaggedBlock {
            tag: Tag::default(),
            state: BlockState::Active,
            start_line: 1,
            end_line: 3,
            start_marker: "// DEBUG START".to_string(),
            body: vec!["console.log(x);".to_string()],
            end_marker: "// DEBUG END".to_string(),
        };
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(
            lines,
            vec!["// DEBUG START", "console.log(x);", "// DEBUG END"]
        );
        assert_eq!(Region::Tagged(block).line_count(), 3);
    }
}
