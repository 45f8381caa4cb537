use serde_json::Value as JsonValue;
use thiserror::Error;

/// YAML frontmatter split off the top of a document.
#[derive(Debug)]
pub struct Frontmatter<'a> {
    /// Parsed frontmatter as a JSON value (an empty object when absent).
    pub value: JsonValue,
    /// Markdown body following the closing fence.
    pub body: &'a str,
}

impl Frontmatter<'_> {
    /// The `title` key, if it is a non-empty string.
    pub fn title(&self) -> Option<&str> {
        self.value
            .get("title")
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }
}

/// Why a document's frontmatter was rejected.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// The block is not valid YAML.
    #[error("invalid frontmatter YAML: {0}")]
    Parse(String),
}

/// Splits leading YAML frontmatter from `input`.
///
/// Frontmatter opens with a `---` line at the very start of the input (after
/// an optional byte-order mark) and closes with the next `---` line. An
/// unclosed block, or one that is not a YAML mapping, is an ordinary
/// thematic break and the whole input stays the body.
pub fn split_frontmatter(input: &str) -> Result<Frontmatter<'_>, FrontmatterError> {
    let without_bom = input.strip_prefix('\u{feff}').unwrap_or(input);
    let no_frontmatter = || Frontmatter {
        value: JsonValue::Object(Default::default()),
        body: input,
    };

    let mut lines = LineCursor::new(without_bom);
    if !lines.next().is_some_and(is_yaml_fence) {
        return Ok(no_frontmatter());
    }

    let block_start = lines.offset;
    let (block, body_start) = loop {
        let line_start = lines.offset;
        match lines.next() {
            Some(line) if is_yaml_fence(line) => {
                break (&without_bom[block_start..line_start], lines.offset);
            }
            Some(_) => continue,
            None => return Ok(no_frontmatter()),
        }
    };

    Ok(match parse_yaml_block(block)? {
        Some(value) => Frontmatter {
            value,
            body: &without_bom[body_start..],
        },
        None => no_frontmatter(),
    })
}

/// Parses the fenced block; `None` when it is YAML but not a mapping.
fn parse_yaml_block(block: &str) -> Result<Option<JsonValue>, FrontmatterError> {
    let parse_error = |err: &dyn std::fmt::Display| FrontmatterError::Parse(err.to_string());

    let yaml: serde_yaml::Value = if block.trim().is_empty() {
        serde_yaml::Value::Null
    } else {
        serde_yaml::from_str(block).map_err(|err| parse_error(&err))?
    };

    match serde_json::to_value(yaml).map_err(|err| parse_error(&err))? {
        JsonValue::Null => Ok(Some(JsonValue::Object(Default::default()))),
        mapping @ JsonValue::Object(_) => Ok(Some(mapping)),
        _ => Ok(None),
    }
}

struct LineCursor<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }

    fn next(&mut self) -> Option<&'a str> {
        if self.offset >= self.input.len() {
            return None;
        }
        let rest = &self.input[self.offset..];
        match rest.find('\n') {
            Some(pos) => {
                self.offset += pos + 1;
                Some(&rest[..pos])
            }
            None => {
                self.offset = self.input.len();
                Some(rest)
            }
        }
    }
}

fn is_yaml_fence(line: &str) -> bool {
    line.trim_end_matches('\r') == "---"
}
