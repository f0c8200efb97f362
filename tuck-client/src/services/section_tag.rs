//! Leading section tag extraction
//!
//! Findings may start with a bracketed section tag such as `[COVER]` or
//! `[ERROR]`. The tag is split off so the presentation can show it apart
//! from the message body.

use once_cell::sync::Lazy;
use regex::Regex;

/// `[TAG]` at the very start, plus any whitespace after it
static LEADING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s*").expect("section tag pattern is valid")
});

/// Result of [`extract`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTag {
    pub tag: Option<String>,
    pub body: String,
}

/// Split a leading `[TAG]` off `text`
///
/// Without a leading tag the body is `text` unchanged. Brackets later in the
/// text are never treated as a tag.
pub fn extract(text: &str) -> SectionTag {
    match LEADING_TAG.captures(text) {
        Some(caps) => {
            // Group 0 always matches at offset 0 here
            let prefix_len = caps.get(0).map_or(0, |m| m.end());
            SectionTag {
                tag: caps.get(1).map(|m| m.as_str().to_string()),
                body: text[prefix_len..].to_string(),
            }
        }
        None => SectionTag {
            tag: None,
            body: text.to_string(),
        },
    }
}
