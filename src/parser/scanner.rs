use super::markers::{classify, derive_state, MarkerLine};
use super::{CommentStyle, ScanError};
use crate::types::{Region, Tag, TaggedBlock};

struct OpenBlock {
    tag: Tag,
    start_line: usize,
    start_marker: String,
    body: Vec<String>,
}

impl OpenBlock {
    fn close(self, end_line: usize, end_marker: &str, marker: &str) -> TaggedBlock {
        TaggedBlock {
            state: derive_state(&self.body, marker),
            tag: self.tag,
            start_line: self.start_line,
            end_line,
            start_marker: self.start_marker,
            body: self.body,
            end_marker: end_marker.to_string(),
        }
    }
}

fn flush_plain(regions: &mut Vec<Region>, plain: &mut Vec<String>) {
    if !plain.is_empty() {
        regions.push(Region::Plain(std::mem::take(plain)));
    }
}

/// Split a file's lines into plain runs and tagged blocks.
///
/// Single forward pass. Nested starts, stray ends and unterminated blocks are
/// reported with the 1-based line number of the offending marker.
pub fn scan<S: AsRef<str>>(lines: &[S], style: &CommentStyle) -> Result<Vec<Region>, ScanError> {
    let marker = style.marker();
    let mut regions = Vec::new();
    let mut plain: Vec<String> = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let line_no = idx + 1;

        match classify(line, marker) {
            Some(MarkerLine::Start(tag)) => {
                if let Some(block) = &open {
                    return Err(ScanError::MalformedNesting {
                        line: line_no,
                        open_line: block.start_line,
                    });
                }
                flush_plain(&mut regions, &mut plain);
                open = Some(OpenBlock {
                    tag,
                    start_line: line_no,
                    start_marker: line.to_string(),
                    body: Vec::new(),
                });
            }
            Some(MarkerLine::End) => {
                let block = open
                    .take()
                    .ok_or(ScanError::UnmatchedEnd { line: line_no })?;
                regions.push(Region::Tagged(block.close(line_no, line, marker)));
            }
            None => match open.as_mut() {
                Some(block) => block.body.push(line.to_string()),
                None => plain.push(line.to_string()),
            },
        }
    }

    if let Some(block) = open {
        return Err(ScanError::UnterminatedBlock {
            line: block.start_line,
        });
    }
    flush_plain(&mut regions, &mut plain);

    Ok(regions)
}
