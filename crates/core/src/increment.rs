//! Shifting ATX heading levels of raw markdown text.
//!
//! A standalone README starts at `#`; documentation bodies start at `###`.
//! Lines inside fenced code are never touched.

/// Deepest ATX heading markdown knows about.
const MAX_ATX_DEPTH: usize = 6;

/// Fence state carried from line to line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Fence {
    #[default]
    Outside,
    Inside {
        marker: char,
        length: usize,
    },
}

impl Fence {
    /// Advances the state past `line`; returns the new state and whether the
    /// line belongs to a fence (opener, body, or closer).
    fn advance(self, line: &str) -> (Fence, bool) {
        let (indent, rest) = split_indent(line);
        match self {
            Fence::Outside => match fence_marker(rest) {
                Some((marker, length)) if indent <= 3 => (Fence::Inside { marker, length }, true),
                _ => (Fence::Outside, false),
            },
            Fence::Inside { marker, length } => {
                let closes = indent <= 3
                    && fence_marker(rest).is_some_and(|(m, len)| m == marker && len >= length)
                    && rest.trim_start_matches(marker).trim().is_empty();
                if closes {
                    (Fence::Outside, true)
                } else {
                    (self, true)
                }
            }
        }
    }
}

/// Returns (visual_columns, rest) for leading whitespace.
fn split_indent(line: &str) -> (usize, &str) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => col += 1,
            b'\t' => col += 4 - (col % 4),
            _ => break,
        }
        bytes += 1;
    }
    (col, &line[bytes..])
}

fn fence_marker(rest: &str) -> Option<(char, usize)> {
    let first = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let length = rest.chars().take_while(|c| *c == first).count();
    (length >= 3).then_some((first, length))
}

/// Depth of an ATX heading line, if it is one.
fn atx_depth(line: &str) -> Option<(usize, usize)> {
    let (indent, rest) = split_indent(line);
    if indent > 3 {
        return None;
    }
    let hashes = rest.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > MAX_ATX_DEPTH {
        return None;
    }
    match rest.as_bytes().get(hashes) {
        None | Some(b' ' | b'\t' | b'\r' | b'\n') => Some((line.len() - rest.len(), hashes)),
        _ => None,
    }
}

/// Adds `by` levels to every ATX heading outside fenced code, capped at six.
///
/// # Examples
///
/// ```
/// use docsmith_core::increment_headings;
///
/// let shifted = increment_headings("# svelte\n\n## Install\n", 2);
/// assert_eq!(shifted, "### svelte\n\n#### Install\n");
/// ```
pub fn increment_headings(input: &str, by: usize) -> String {
    let mut output = String::with_capacity(input.len() + by * 8);
    let mut fence = Fence::Outside;

    for line in input.split_inclusive('\n') {
        let (next, in_fence) = fence.advance(line);
        fence = next;

        match atx_depth(line).filter(|_| !in_fence) {
            Some((offset, depth)) => {
                let target = (depth + by).min(MAX_ATX_DEPTH);
                output.push_str(&line[..offset]);
                output.push_str(&"#".repeat(target));
                output.push_str(&line[offset + depth..]);
            }
            None => output.push_str(line),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_atx_headings() {
        assert_eq!(
            increment_headings("# A\ntext\n## B\n### C", 2),
            "### A\ntext\n#### B\n##### C"
        );
    }

    #[test]
    fn caps_at_six() {
        assert_eq!(increment_headings("##### Deep\n", 2), "###### Deep\n");
    }

    #[test]
    fn leaves_fenced_code_alone() {
        let input = "# Title\n\n```sh\n# comment\n```\n\n~~~~\n## not a heading\n~~~\n## still code\n~~~~\n## Heading\n";
        let expected = "### Title\n\n```sh\n# comment\n```\n\n~~~~\n## not a heading\n~~~\n## still code\n~~~~\n#### Heading\n";
        assert_eq!(increment_headings(input, 2), expected);
    }

    #[test]
    fn ignores_non_headings() {
        let input = "#hashtag\n    # indented code\n####### seven\n";
        assert_eq!(increment_headings(input, 2), input);
    }

    #[test]
    fn keeps_indentation_and_empty_headings() {
        assert_eq!(increment_headings("  ## Indented\n#\n", 1), "  ### Indented\n##\n");
    }

    #[test]
    fn zero_is_identity() {
        let input = "# A\n## B\n";
        assert_eq!(increment_headings(input, 0), input);
    }
}
