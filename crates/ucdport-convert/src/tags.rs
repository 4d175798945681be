//! Tag token parsing.
//!
//! Source tags are flat tokens such as `env:prod` or `critical`. They are
//! folded into a key/value mapping where later tokens win. Keys keep the
//! position of their first occurrence.

use indexmap::IndexMap;
use ucdport_common::constants::{DEFAULT_TAG_KEY, DEFAULT_TAG_VALUE};

/// Parsed tags keyed by tag name, in first-seen order.
pub type TagMap = IndexMap<String, String>;

/// Splits one token into its key and value.
///
/// `key:value` splits on the first colon; blank halves fall back to `tag`
/// and `true`. A bare token maps to `true`.
#[must_use]
pub fn split_tag(token: &str) -> (String, String) {
    match token.split_once(':') {
        Some((key, value)) => {
            let key = key.trim();
            let value = value.trim();
            (
                if key.is_empty() { DEFAULT_TAG_KEY } else { key }.to_owned(),
                if value.is_empty() { DEFAULT_TAG_VALUE } else { value }.to_owned(),
            )
        }
        None => (token.trim().to_owned(), DEFAULT_TAG_VALUE.to_owned()),
    }
}

/// Parses tokens in order into a mapping, skipping blank tokens.
pub fn parse_tags<I, S>(tokens: I) -> TagMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = TagMap::new();
    for token in tokens {
        let token = token.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        let (key, value) = split_tag(token);
        let _ = map.insert(key, value);
    }
    map
}

/// Merges `overlay` into `base`; keys present in both take the overlay value.
pub fn merge_tags(base: &mut TagMap, overlay: &TagMap) {
    for (key, value) in overlay {
        let _ = base.insert(key.clone(), value.clone());
    }
}

/// Renders tags as space-separated `key:value` pairs.
#[must_use]
pub fn render_tags(tags: &TagMap) -> String {
    tags.iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(" ")
}
