//! Toggle requests: what to do (mode) and to which blocks (tag filter).

use crate::error::ToggleError;
use crate::types::block::{BlockState, Tag, TaggedBlock};
use clap::ValueEnum;
use std::collections::BTreeSet;
use std::fmt;

/// Pseudo-tag that selects every block, including the default tag.
pub const ALL_TAGS: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Comment out every selected active block
    Comment,
    /// Uncomment every selected inactive block
    Uncomment,
    /// Flip each selected block independently
    #[default]
    Toggle,
}

impl Mode {
    /// Parse an interactive keyword (case-insensitive).
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "comment" => Some(Mode::Comment),
            "uncomment" => Some(Mode::Uncomment),
            "toggle" => Some(Mode::Toggle),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Comment => f.write_str("comment"),
            Mode::Uncomment => f.write_str("uncomment"),
            Mode::Toggle => f.write_str("toggle"),
        }
    }
}

/// Which tags a request applies to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Only(BTreeSet<Tag>),
    Except(BTreeSet<Tag>),
}

impl TagFilter {
    pub fn matches(&self, tag: &Tag) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Only(tags) => tags.contains(tag),
            TagFilter::Except(tags) => !tags.contains(tag),
        }
    }
}

/// `all` in any letter case; real tags stay case-sensitive.
fn is_all_tags(tag: &Tag) -> bool {
    tag.as_str().eq_ignore_ascii_case(ALL_TAGS)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest {
    pub mode: Mode,
    pub filter: TagFilter,
}

impl ToggleRequest {
    /// Request touching every block regardless of tag.
    pub fn all(mode: Mode) -> Self {
        Self {
            mode,
            filter: TagFilter::All,
        }
    }

    /// Build a request from include/exclude tag lists. An empty list means the
    /// list was not given; giving both is a `FilterConflict`.
    pub fn new<I, E>(mode: Mode, only: I, except: E) -> Result<Self, ToggleError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let only: BTreeSet<Tag> = only.into_iter().map(|t| Tag::new(t.as_ref())).collect();
        let except: BTreeSet<Tag> = except
            .into_iter()
            .map(|t| Tag::new(t.as_ref()))
            .collect();

        if except.iter().any(is_all_tags) {
            return Err(ToggleError::ExcludeAll);
        }

        let filter = match (only.is_empty(), except.is_empty()) {
            (false, false) => return Err(ToggleError::FilterConflict),
            (true, true) => TagFilter::All,
            (false, true) if only.iter().any(is_all_tags) => TagFilter::All,
            (false, true) => TagFilter::Only(only),
            (true, false) => TagFilter::Except(except),
        };

        Ok(Self { mode, filter })
    }

    /// The state a block must be moved to, or `None` when it stays as is.
    pub fn target_state(&self, block: &TaggedBlock) -> Option<BlockState> {
        if !self.filter.matches(&block.tag) {
            return None;
        }
        match (self.mode, block.state) {
            (Mode::Comment, BlockState::Active) => Some(BlockState::Inactive),
            (Mode::Uncomment, BlockState::Inactive) => Some(BlockState::Active),
            (Mode::Toggle, state) => Some(state.flipped()),
            _ => None,
        }
    }
}
