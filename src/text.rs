// SPDX-License-Identifier: MPL-2.0

//! Hashtag detection in captions and story text.
//!
//! Splits text into plain runs and `#tag` runs so a renderer can link each
//! tag to its hashtag page.

use regex::Regex;
use std::sync::LazyLock;

// ASCII word characters only: "#café" links "#caf" and leaves "é" as text.
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z0-9_]+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    /// Tag name without the leading '#', as written.
    Hashtag(&'a str),
}

impl Segment<'_> {
    /// Route for a hashtag segment. Tags are case-insensitive.
    pub fn route(&self) -> Option<String> {
        match self {
            Segment::Text(_) => None,
            Segment::Hashtag(tag) => Some(format!("/hashtag/{}", tag.to_lowercase())),
        }
    }
}

/// Split `text` into alternating plain and hashtag segments, in order.
/// Concatenating the segments (with '#' restored) gives back `text`.
pub fn split_hashtags(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in HASHTAG_RE.captures_iter(text) {
        let (Some(full), Some(tag)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if full.start() > last {
            segments.push(Segment::Text(&text[last..full.start()]));
        }
        segments.push(Segment::Hashtag(tag.as_str()));
        last = full.end();
    }

    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }

    segments
}

/// Distinct lowercased tags in order of first appearance.
pub fn hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for segment in split_hashtags(text) {
        if let Segment::Hashtag(tag) = segment {
            let tag = tag.to_lowercase();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(
            split_hashtags("Hello world"),
            vec![Segment::Text("Hello world")]
        );
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert!(split_hashtags("").is_empty());
    }

    #[test]
    fn test_hashtags_split_in_order() {
        let segments = split_hashtags("Beach day #Sunset and #sea!");
        assert_eq!(
            segments,
            vec![
                Segment::Text("Beach day "),
                Segment::Hashtag("Sunset"),
                Segment::Text(" and "),
                Segment::Hashtag("sea"),
                Segment::Text("!"),
            ]
        );
        assert_eq!(segments[1].route().as_deref(), Some("/hashtag/sunset"));
        assert_eq!(segments[0].route(), None);
    }

    #[test]
    fn test_adjacent_and_leading_tags() {
        let segments = split_hashtags("#a#b");
        assert_eq!(segments, vec![Segment::Hashtag("a"), Segment::Hashtag("b")]);
    }

    #[test]
    fn test_lone_hash_is_text() {
        assert_eq!(split_hashtags("# nope"), vec![Segment::Text("# nope")]);
    }

    #[test]
    fn test_hashtags_dedup_case_insensitive() {
        assert_eq!(
            hashtags("#Rust is #fun, #rust forever #café"),
            vec!["rust", "fun", "caf"]
        );
    }

    #[test]
    fn test_tag_stops_at_non_ascii() {
        assert_eq!(
            split_hashtags("#café au lait"),
            vec![Segment::Hashtag("caf"), Segment::Text("é au lait")]
        );
        assert_eq!(split_hashtags("#日本"), vec![Segment::Text("#日本")]);
    }
}
