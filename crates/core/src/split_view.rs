//! Regrouping "rule, prose, code" runs into split views.

use crate::blocks::{Block, SplitView};

/// Wraps every run that starts at a horizontal rule and ends at the next code
/// block into a [`Block::SplitView`].
///
/// The rule and the code block are consumed; the blocks in between become the
/// prose side in their original order. Scanning resumes right after the
/// wrapped run. A rule with no code block after it is left alone, along with
/// everything that follows it.
pub fn split_view(blocks: Vec<Block>) -> Vec<Block> {
    let mut output = Vec::with_capacity(blocks.len());
    let mut pending: Option<Vec<Block>> = None;

    for block in blocks {
        pending = match (pending, block) {
            (None, Block::Rule) => Some(Vec::new()),
            (None, other) => {
                output.push(other);
                None
            }
            (Some(copy), Block::Code(code)) => {
                output.push(Block::SplitView(SplitView { copy, code }));
                None
            }
            (Some(mut copy), other) => {
                copy.push(other);
                Some(copy)
            }
        };
    }

    if let Some(unmatched) = pending {
        output.push(Block::Rule);
        output.extend(unmatched);
    }

    output
}
