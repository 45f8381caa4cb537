use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::DocsmithError;

/// Separator used for heading slugs.
pub const HEADING_SEPARATOR: &str = "-";
/// Separator used for document title slugs.
pub const TITLE_SEPARATOR: &str = "_";

/// Transliterates a Latin letter with diacritics into plain ASCII.
fn transliterate(ch: char) -> Option<&'static str> {
    let ascii = match ch {
        '&' => " and ",
        '♥' => " love ",
        '🦄' => " unicorn ",
        'À' | 'Á' | 'Â' | 'Ã' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'à' | 'á' | 'â' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'Ä' | 'Æ' => "Ae",
        'ä' | 'æ' => "ae",
        'Ç' | 'Ć' | 'Č' => "C",
        'ç' | 'ć' | 'č' => "c",
        'Ð' | 'Ď' | 'Đ' => "D",
        'ð' | 'ď' | 'đ' => "d",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ę' | 'Ě' => "E",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'Ğ' => "G",
        'ğ' => "g",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'İ' => "I",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'Ł' => "L",
        'ł' => "l",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ñ' | 'ń' | 'ň' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ø' | 'Ō' | 'Ő' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ø' | 'ō' | 'ő' => "o",
        'Ö' => "Oe",
        'ö' => "oe",
        'Œ' => "OE",
        'œ' => "oe",
        'Ř' => "R",
        'ř' => "r",
        'Ś' | 'Ş' | 'Š' => "S",
        'ś' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'Ť' => "T",
        'ť' => "t",
        'Þ' => "TH",
        'þ' => "th",
        'Ù' | 'Ú' | 'Û' | 'Ū' | 'Ů' | 'Ű' => "U",
        'ù' | 'ú' | 'û' | 'ū' | 'ů' | 'ű' => "u",
        'Ü' => "Ue",
        'ü' => "ue",
        'Ý' | 'Ÿ' => "Y",
        'ý' | 'ÿ' => "y",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(ascii)
}

/// URL-safe slug strategy.
///
/// Case is preserved. Every run of characters outside `[a-zA-Z0-9]` becomes a
/// single `separator`, and separators at either end are trimmed. `$` and `-`
/// are protected so identifiers such as `$destroy` and hyphenated words
/// survive whatever separator is configured.
///
/// # Examples
///
/// ```
/// use docsmith_core::slug::url_safe;
///
/// assert_eq!(url_safe("Template syntax", "_"), "Template_syntax");
/// assert_eq!(url_safe("$destroy()", "-"), "$destroy");
/// assert_eq!(url_safe("on:event-name", "_"), "on_event-name");
/// ```
pub fn url_safe(input: &str, separator: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;
    let mut push = |ch: char, slug: &mut String| {
        if ch.is_ascii_alphanumeric() || is_protected(ch) {
            if pending_separator && !slug.is_empty() {
                slug.push_str(separator);
            }
            pending_separator = false;
            slug.push(ch);
        } else {
            pending_separator = true;
        }
    };

    for ch in input.chars() {
        match transliterate(ch) {
            Some(ascii) => ascii.chars().for_each(|c| push(c, &mut slug)),
            None => push(ch, &mut slug),
        }
    }

    slug
}

// `$` marks store/reactive identifiers and `-` may differ from the separator,
// so neither is folded into a separator run.
fn is_protected(ch: char) -> bool {
    ch == '$' || ch == '-'
}

fn is_passthrough(ch: char) -> bool {
    !ch.is_ascii_alphanumeric() && ch.is_alphabetic()
}

/// Unicode-safe slug strategy.
///
/// Runs of non-ASCII letters are kept verbatim; everything between them goes
/// through [`url_safe`]. Non-empty runs are joined with `separator`.
///
/// # Examples
///
/// ```
/// use docsmith_core::slug::unicode_safe;
///
/// assert_eq!(unicode_safe("Hello, 世界!", "_"), "Hello_世界");
/// ```
pub fn unicode_safe(input: &str, separator: &str) -> String {
    let mut runs: Vec<(bool, String)> = Vec::new();
    for ch in input.chars() {
        let passthrough = is_passthrough(ch);
        match runs.last_mut() {
            Some((kind, run)) if *kind == passthrough => run.push(ch),
            _ => runs.push((passthrough, ch.to_string())),
        }
    }

    runs.into_iter()
        .map(|(passthrough, run)| {
            if passthrough {
                run
            } else {
                url_safe(&run, separator)
            }
        })
        .filter(|run| !run.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Which slug strategy a session applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugStrategy {
    /// [`url_safe`]
    UrlSafe,
    /// [`unicode_safe`]
    UnicodeSafe,
}

impl SlugStrategy {
    /// Applies the strategy to `input`.
    pub fn apply(self, input: &str, separator: &str) -> String {
        match self {
            SlugStrategy::UrlSafe => url_safe(input, separator),
            SlugStrategy::UnicodeSafe => unicode_safe(input, separator),
        }
    }
}

/// Options for a [`SlugSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugOptions {
    /// Keep runs of non-Latin letters untouched.
    #[serde(default)]
    pub preserve_unicode: bool,
    /// Separator placed between slug words.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    TITLE_SEPARATOR.to_string()
}

impl SlugOptions {
    /// Defaults for heading slugs (`-`).
    pub fn heading() -> Self {
        Self {
            preserve_unicode: false,
            separator: HEADING_SEPARATOR.to_string(),
        }
    }

    /// Defaults for document title slugs (`_`).
    pub fn title() -> Self {
        Self {
            preserve_unicode: false,
            separator: TITLE_SEPARATOR.to_string(),
        }
    }

    /// Returns the strategy these options select.
    pub fn strategy(&self) -> SlugStrategy {
        if self.preserve_unicode {
            SlugStrategy::UnicodeSafe
        } else {
            SlugStrategy::UrlSafe
        }
    }
}

impl Default for SlugOptions {
    fn default() -> Self {
        Self::title()
    }
}

/// Slug generator that refuses to emit the same slug twice.
///
/// One session spans every document that ends up on the same page. The seen
/// set sits behind a mutex so a session can be shared across threads.
#[derive(Debug)]
pub struct SlugSession {
    options: SlugOptions,
    seen: Mutex<HashSet<String>>,
}

impl SlugSession {
    /// Creates a session with an empty seen set.
    pub fn new(options: SlugOptions) -> Self {
        Self {
            options,
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the options this session was built with.
    pub fn options(&self) -> &SlugOptions {
        &self.options
    }

    /// Slugifies `input` without recording it.
    pub fn preview(&self, input: &str) -> String {
        self.options
            .strategy()
            .apply(input, &self.options.separator)
    }

    /// Slugifies `input` and records the result.
    ///
    /// Fails with [`DocsmithError::DuplicateSlug`] when the slug was already
    /// emitted by this session.
    pub fn slug(&self, input: &str) -> Result<String, DocsmithError> {
        let slug = self.preview(input);

        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if !seen.insert(slug.clone()) {
            return Err(DocsmithError::DuplicateSlug { slug });
        }
        Ok(slug)
    }

    /// Returns true if `slug` was already emitted.
    pub fn contains(&self, slug: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(slug)
    }

    /// Number of slugs emitted so far.
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true if nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_safe_basic() {
        assert_eq!(url_safe("Hello World", "-"), "Hello-World");
        assert_eq!(url_safe("Template syntax", "_"), "Template_syntax");
    }

    #[test]
    fn url_safe_preserves_case() {
        assert_eq!(url_safe("getContext API", "-"), "getContext-API");
    }

    #[test]
    fn url_safe_collapses_and_trims() {
        assert_eq!(url_safe("  a ,. b  ", "_"), "a_b");
        assert_eq!(url_safe("(props)", "-"), "props");
        assert_eq!(url_safe("!!!", "-"), "");
    }

    #[test]
    fn url_safe_protects_dollar() {
        assert_eq!(url_safe("$destroy", "_"), "$destroy");
        assert_eq!(url_safe("component.$set(props)", "-"), "component-$set-props");
    }

    #[test]
    fn url_safe_protects_hyphen_from_separator() {
        assert_eq!(url_safe("svelte:self-closing", "_"), "svelte_self-closing");
        assert_eq!(url_safe("a--b", "_"), "a--b");
    }

    #[test]
    fn url_safe_transliterates() {
        assert_eq!(url_safe("Crème brûlée", "-"), "Creme-brulee");
        assert_eq!(url_safe("Größe", "-"), "Groesse");
        assert_eq!(url_safe("Tom & Jerry", "-"), "Tom-and-Jerry");
    }

    #[test]
    fn url_safe_drops_non_latin() {
        assert_eq!(url_safe("安装 Installation", "-"), "Installation");
    }

    #[test]
    fn url_safe_is_idempotent() {
        for input in [
            "Template syntax",
            "$destroy()",
            "svelte:self-closing",
            "on:event   name!",
            "Größe & Crème",
        ] {
            for separator in ["-", "_"] {
                let once = url_safe(input, separator);
                assert_eq!(url_safe(&once, separator), once, "{input:?} / {separator:?}");
            }
        }
    }

    #[test]
    fn url_safe_never_emits_raw_punctuation() {
        let slug = url_safe("a.b,c;d:e'f\"g(h)i[j]k{l}m/n\\o", "_");
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '$'),
            "{slug}"
        );
    }

    #[test]
    fn unicode_safe_keeps_cjk_segment() {
        assert_eq!(
            unicode_safe("Getting started 入门指南", "_"),
            "Getting_started_入门指南"
        );
        assert_eq!(unicode_safe("入门指南: Setup!", "_"), "入门指南_Setup");
    }

    #[test]
    fn unicode_safe_drops_empty_runs() {
        assert_eq!(unicode_safe("— 入门 —", "-"), "入门");
        assert_eq!(unicode_safe("", "-"), "");
    }

    #[test]
    fn unicode_safe_uses_separator_inside_processed_runs() {
        assert_eq!(unicode_safe("hello world 世界", "-"), "hello-world-世界");
        assert_eq!(unicode_safe("使用 getContext API 指南", "-"), "使用-getContext-API-指南");
    }

    #[test]
    fn session_rejects_duplicates() {
        let session = SlugSession::new(SlugOptions::title());
        assert_eq!(session.slug("Template syntax").unwrap(), "Template_syntax");
        let err = session.slug("Template  syntax!").unwrap_err();
        assert!(matches!(err, DocsmithError::DuplicateSlug { ref slug } if slug == "Template_syntax"));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn preview_records_nothing() {
        let session = SlugSession::new(SlugOptions::title());
        assert_eq!(session.preview("Template syntax"), "Template_syntax");
        assert!(session.is_empty());
    }

    #[test]
    fn independent_sessions_do_not_share_state() {
        let first = SlugSession::new(SlugOptions::heading());
        let second = SlugSession::new(SlugOptions::heading());
        assert_eq!(first.slug("Intro").unwrap(), "Intro");
        assert_eq!(second.slug("Intro").unwrap(), "Intro");
        assert!(first.contains("Intro"));
    }

    #[test]
    fn session_selects_unicode_strategy() {
        let session = SlugSession::new(SlugOptions {
            preserve_unicode: true,
            separator: "_".into(),
        });
        assert_eq!(session.slug("Intro 介绍").unwrap(), "Intro_介绍");
    }

    #[test]
    fn session_is_shareable_across_threads() {
        let session = SlugSession::new(SlugOptions::heading());
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| session.slug("shared heading").is_ok()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results.iter().filter(|ok| **ok).count(), 1);
    }
}
