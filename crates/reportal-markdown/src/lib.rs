//! Markdown snippet segmentation for report rendering.
//!
//! Report strings carry a deliberately small markdown-like syntax: inline
//! code spans and absolute links. This crate splits such a snippet into an
//! ordered segment list that a renderer turns into exactly one node per
//! segment. It is not a markdown grammar — emphasis, headings, lists and
//! nesting are out of scope, and anything that does not form a complete
//! span stays plain text.
//!
//! # Example
//!
//! ```
//! use reportal_markdown::{LinkSegment, split_links};
//!
//! let segments = split_links("See the [docs](https://web.dev/lcp).");
//! assert_eq!(
//!     segments,
//!     vec![
//!         LinkSegment::Plain("See the ".to_owned()),
//!         LinkSegment::Link {
//!             text: "docs".to_owned(),
//!             href: "https://web.dev/lcp".to_owned(),
//!         },
//!         LinkSegment::Plain(".".to_owned()),
//!     ],
//! );
//! ```

mod segment;

pub use segment::{CodeSegment, LinkSegment};

use std::sync::LazyLock;

use regex::Regex;

/// Matches `[text](destination)` spans with an http(s) destination.
///
/// Destinations with any other scheme do not form links and stay plain text.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+?)\]\((https?://.*?)\)").unwrap());

/// Matches `` `code` `` spans.
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

/// Split a snippet into an ordered plain/link segment list.
///
/// Plain runs between links are emitted only when non-empty, so adjacent
/// links produce adjacent [`LinkSegment::Link`] entries with nothing in
/// between.
#[must_use]
pub fn split_links(text: &str) -> Vec<LinkSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for caps in LINK_RE.captures_iter(text) {
        let (Some(span), Some(label), Some(href)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if span.start() > cursor {
            segments.push(LinkSegment::Plain(text[cursor..span.start()].to_owned()));
        }
        segments.push(LinkSegment::Link {
            text: label.as_str().to_owned(),
            href: href.as_str().to_owned(),
        });
        cursor = span.end();
    }
    if cursor < text.len() {
        segments.push(LinkSegment::Plain(text[cursor..].to_owned()));
    }
    segments
}

/// Split a snippet into an ordered plain/code segment list.
///
/// Empty code spans (` `` `) are consumed but emit no segment. Plain runs
/// are emitted only when non-empty.
#[must_use]
pub fn split_code(text: &str) -> Vec<CodeSegment> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for caps in CODE_RE.captures_iter(text) {
        let (Some(span), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if span.start() > cursor {
            segments.push(CodeSegment::Plain(text[cursor..span.start()].to_owned()));
        }
        if !code.as_str().is_empty() {
            segments.push(CodeSegment::Code(code.as_str().to_owned()));
        }
        cursor = span.end();
    }
    if cursor < text.len() {
        segments.push(CodeSegment::Plain(text[cursor..].to_owned()));
    }
    segments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain_link(text: &str) -> LinkSegment {
        LinkSegment::Plain(text.to_owned())
    }

    fn link(text: &str, href: &str) -> LinkSegment {
        LinkSegment::Link {
            text: text.to_owned(),
            href: href.to_owned(),
        }
    }

    #[test]
    fn test_split_links_interleaves_plain_and_links() {
        assert_eq!(
            split_links("See [docs](https://web.dev/x) and [more](http://example.com)."),
            vec![
                plain_link("See "),
                link("docs", "https://web.dev/x"),
                plain_link(" and "),
                link("more", "http://example.com"),
                plain_link("."),
            ]
        );
    }

    #[test]
    fn test_split_links_only_link() {
        assert_eq!(
            split_links("[docs](https://web.dev)"),
            vec![link("docs", "https://web.dev")]
        );
    }

    #[test]
    fn test_split_links_no_links() {
        assert_eq!(split_links("just text"), vec![plain_link("just text")]);
    }

    #[test]
    fn test_split_links_empty_input() {
        assert_eq!(split_links(""), Vec::new());
    }

    #[test]
    fn test_split_links_non_http_scheme_stays_plain() {
        assert_eq!(
            split_links("[run](javascript:alert(1))"),
            vec![plain_link("[run](javascript:alert(1))")]
        );
    }

    #[test]
    fn test_split_links_unterminated_stays_plain() {
        assert_eq!(
            split_links("[docs](https://web.dev"),
            vec![plain_link("[docs](https://web.dev")]
        );
    }

    #[test]
    fn test_split_links_adjacent_links() {
        assert_eq!(
            split_links("[a](https://a.example)[b](https://b.example)"),
            vec![link("a", "https://a.example"), link("b", "https://b.example")]
        );
    }

    #[test]
    fn test_split_code_interleaves_plain_and_code() {
        assert_eq!(
            split_code("Run `npm install` then `npm start`."),
            vec![
                CodeSegment::Plain("Run ".to_owned()),
                CodeSegment::Code("npm install".to_owned()),
                CodeSegment::Plain(" then ".to_owned()),
                CodeSegment::Code("npm start".to_owned()),
                CodeSegment::Plain(".".to_owned()),
            ]
        );
    }

    #[test]
    fn test_split_code_unterminated_stays_plain() {
        assert_eq!(
            split_code("an `unterminated span"),
            vec![CodeSegment::Plain("an `unterminated span".to_owned())]
        );
    }

    #[test]
    fn test_split_code_empty_span_emits_nothing() {
        assert_eq!(
            split_code("before `` after"),
            vec![
                CodeSegment::Plain("before ".to_owned()),
                CodeSegment::Plain(" after".to_owned()),
            ]
        );
    }

    #[test]
    fn test_split_code_no_code() {
        assert_eq!(
            split_code("plain text"),
            vec![CodeSegment::Plain("plain text".to_owned())]
        );
    }
}
