//! Toggle engine: decides per block whether to comment or uncomment it and
//! emits the rewritten lines. Pure; the caller owns all I/O.
//!
//! The engine never inserts or removes lines, so the output always has the
//! same line count as the input and line endings can be restored per line.

use crate::parser::markers::{comment_line, uncomment_line};
use crate::parser::CommentStyle;
use crate::types::{BlockState, Region, ToggleRequest};

/// Output of one engine pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub lines: Vec<String>,
    /// True iff at least one emitted line differs from its input
    pub changed: bool,
    /// Number of blocks whose lines moved
    pub blocks_changed: usize,
}

pub fn apply(regions: &[Region], request: &ToggleRequest, style: &CommentStyle) -> Rewrite {
    let marker = style.marker();
    let mut lines = Vec::new();
    let mut blocks_changed = 0;

    for region in regions {
        let block = match region {
            Region::Plain(plain) => {
                lines.extend(plain.iter().cloned());
                continue;
            }
            Region::Tagged(block) => block,
        };

        lines.push(block.start_marker.clone());
        match request.target_state(block) {
            Some(target) => {
                let body: Vec<String> = block
                    .body
                    .iter()
                    .map(|line| match target {
                        BlockState::Inactive => comment_line(line, marker),
                        BlockState::Active => uncomment_line(line, marker),
                    })
                    .collect();
                if body != block.body {
                    blocks_changed += 1;
                }
                lines.extend(body);
            }
            None => lines.extend(block.body.iter().cloned()),
        }
        lines.push(block.end_marker.clone());
    }

    Rewrite {
        lines,
        changed: blocks_changed > 0,
        blocks_changed,
    }
}
