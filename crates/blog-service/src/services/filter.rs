//! User content sanitiser
//!
//! Comments and guestbook messages are rendered as HTML by the front end, so
//! everything except images is reduced to text before it is stored:
//!
//! 1. `<script>`/`<style>` blocks and HTML comments are removed with their content
//! 2. every tag other than `<img>` is stripped, keeping the text around it
//! 3. inline `on*=` event handlers are stripped from surviving tags
//! 4. sensitive words are masked with one `*` per character
//! 5. `<img>` tags are rebuilt from an attribute allow-list, dropping unsafe `src` schemes
//! 6. stray `<` and `>` in text are escaped

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use blog_core::DomainError;
use regex::{Regex, RegexBuilder};
use tracing::{debug, info};

static BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->")
        .expect("block pattern is valid")
});

/// An HTML tag, allowing `>` inside quoted attribute values
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[/!]?[a-zA-Z][^<>"']*(?:(?:"[^"]*"|'[^']*')[^<>"']*)*>"#)
        .expect("tag pattern is valid")
});

static IMG_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<img[\s/>]").expect("img pattern is valid"));

static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)[\s/]on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
        .expect("handler pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+))"#)
        .expect("attribute pattern is valid")
});

/// Attributes kept on `<img>`, in output order
const IMG_ATTRIBUTES: [&str; 5] = ["src", "alt", "title", "width", "height"];

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Sanitiser for user submitted HTML fragments
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    sensitive: Option<Regex>,
}

impl ContentFilter {
    /// Build a filter masking `words` (case-insensitive, longest match first)
    pub fn new<I, S>(words: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty() && seen.insert(w.to_lowercase()))
            .collect();

        if words.is_empty() {
            return Ok(Self::default());
        }

        words.sort_by_key(|w| std::cmp::Reverse(w.chars().count()));
        let pattern = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        let sensitive = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()?;

        debug!(words = words.len(), "Sensitive word filter compiled");
        Ok(Self {
            sensitive: Some(sensitive),
        })
    }

    /// Load a newline separated word list; blank lines and `#` comments are skipped
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading sensitive words from {}", path.display()))?;

        let words: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        let filter = Self::new(&words).context("compiling sensitive word list")?;
        info!(path = %path.display(), words = words.len(), "Loaded sensitive word list");
        Ok(filter)
    }

    /// Whether sensitive word masking is active
    pub fn has_word_list(&self) -> bool {
        self.sensitive.is_some()
    }

    /// Sanitise `input`, returning possibly empty output
    pub fn sanitize(&self, input: &str) -> String {
        let cleaned = BLOCKS.replace_all(input, "");
        let mut out = String::with_capacity(cleaned.len());
        let mut last = 0;

        for tag in TAG.find_iter(&cleaned) {
            out.push_str(&self.clean_text(&cleaned[last..tag.start()]));
            if let Some(img) = rebuild_img(tag.as_str()) {
                out.push_str(&img);
            }
            last = tag.end();
        }
        out.push_str(&self.clean_text(&cleaned[last..]));

        out.trim().to_string()
    }

    /// Sanitise `input`, rejecting content with nothing left
    pub fn filter(&self, input: &str) -> Result<String, DomainError> {
        let sanitized = self.sanitize(input);
        if sanitized.is_empty() {
            return Err(DomainError::EmptyContent);
        }
        Ok(sanitized)
    }

    fn clean_text(&self, text: &str) -> String {
        let masked = match &self.sensitive {
            Some(re) => re
                .replace_all(text, |caps: &regex::Captures<'_>| {
                    "*".repeat(caps[0].chars().count())
                })
                .into_owned(),
            None => text.to_string(),
        };
        escape_angles(&masked)
    }
}

fn escape_angles(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_angles(&value.replace('&', "&amp;").replace('"', "&quot;"))
}

fn is_safe_src(src: &str) -> bool {
    // Browsers ignore whitespace and control characters inside the scheme
    let normalized: String = src
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    !normalized.is_empty()
        && !UNSAFE_SCHEMES
            .iter()
            .any(|scheme| normalized.starts_with(scheme))
}

/// Absolute http(s) URL with a host, safe to render as an image source
pub fn is_web_url(url: &str) -> bool {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));

    match rest {
        Some(rest) => {
            !rest.is_empty()
                && !rest.starts_with('/')
                && !url
                    .chars()
                    .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '<' | '>'))
        }
        None => false,
    }
}

/// Rebuild an `<img>` tag from allowed attributes; `None` drops the tag
fn rebuild_img(tag: &str) -> Option<String> {
    if !IMG_OPEN.is_match(tag) {
        return None;
    }

    let without_handlers = EVENT_HANDLER.replace_all(&tag[4..], " ");

    let mut kept: [Option<String>; 5] = Default::default();
    for caps in ATTRIBUTE.captures_iter(&without_handlers) {
        let name = caps[1].to_ascii_lowercase();
        let Some(slot) = IMG_ATTRIBUTES.iter().position(|a| *a == name) else {
            continue;
        };
        if kept[slot].is_some() {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str())
            .trim();
        kept[slot] = Some(value.to_string());
    }

    let src = kept[0].as_deref()?;
    if !is_safe_src(src) {
        debug!(src, "Dropping image with unsafe source");
        return None;
    }

    let mut out = String::from("<img");
    for (name, value) in IMG_ATTRIBUTES.iter().zip(&kept) {
        if let Some(value) = value {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(value));
            out.push('"');
        }
    }
    out.push('>');
    Some(out)
}
