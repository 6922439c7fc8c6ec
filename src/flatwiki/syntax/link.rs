//! Reference links of the form `[text][ref]`, `[ref][]` and `[ref] []`.
//!
//! The pattern is a single regular expression. It does not understand nested
//! brackets, so any adjacent pair of bracketed spans is taken for a link;
//! rewriting is harmless for those because unresolvable references are
//! emitted unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;

pub static PAGE_LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[]+)\]( ?)\[([^\[]*)\]").expect("page link pattern is valid")
});

/// A reference link parsed out of page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Display text; empty for the `[ref][]` form.
    pub text: String,
    /// Page id or title, depending on which form the text is in.
    pub reference: String,
    /// Separator seen between the bracket pairs, kept verbatim.
    pub space: String,
}

impl PageLink {
    pub fn from_captures(caps: &Captures<'_>) -> Self {
        let text = caps.get(1).map_or("", |m| m.as_str());
        let space = caps.get(2).map_or("", |m| m.as_str());
        let reference = caps.get(3).map_or("", |m| m.as_str());

        if reference.is_empty() {
            Self {
                text: String::new(),
                reference: text.to_string(),
                space: space.to_string(),
            }
        } else {
            Self {
                text: text.to_string(),
                reference: reference.to_string(),
                space: space.to_string(),
            }
        }
    }

    /// Parse a string holding exactly one link.
    pub fn parse(link: &str) -> Option<Self> {
        let caps = PAGE_LINK_PATTERN.captures(link)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 || whole.end() != link.len() {
            return None;
        }
        Some(Self::from_captures(&caps))
    }
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "[{}]{}[]", self.reference, self.space)
        } else {
            write!(f, "[{}]{}[{}]", self.text, self.space, self.reference)
        }
    }
}

/// Rewrite every link in `text`, handing each parsed link to `rewrite`.
pub fn rewrite_links<'t, F>(text: &'t str, mut rewrite: F) -> Cow<'t, str>
where
    F: FnMut(PageLink) -> PageLink,
{
    PAGE_LINK_PATTERN.replace_all(text, |caps: &Captures<'_>| {
        rewrite(PageLink::from_captures(caps)).to_string()
    })
}

/// Drop the separating space of the links `collapse` accepts, so `[a] [b]`
/// reads as `[a][b]`. `collapse` gets the byte offset of the match and the
/// parsed link; links it rejects are written back unchanged.
pub fn collapse_link_spacing<'t, F>(text: &'t str, mut collapse: F) -> Cow<'t, str>
where
    F: FnMut(usize, &PageLink) -> bool,
{
    PAGE_LINK_PATTERN.replace_all(text, |caps: &Captures<'_>| {
        let start = caps.get(0).map_or(0, |m| m.start());
        let mut link = PageLink::from_captures(caps);
        if !link.space.is_empty() && collapse(start, &link) {
            link.space.clear();
        }
        link.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str, reference: &str, space: &str) -> PageLink {
        PageLink {
            text: text.into(),
            reference: reference.into(),
            space: space.into(),
        }
    }

    #[test]
    fn parses_text_and_reference() {
        assert_eq!(
            PageLink::parse("[the second page][abc123]"),
            Some(link("the second page", "abc123", ""))
        );
    }

    #[test]
    fn empty_reference_takes_the_bracketed_text() {
        assert_eq!(PageLink::parse("[Foo][]"), Some(link("", "Foo", "")));
        assert_eq!(PageLink::parse("[Foo] []"), Some(link("", "Foo", " ")));
    }

    #[test]
    fn keeps_separating_space() {
        assert_eq!(
            PageLink::parse("[text] [ref]"),
            Some(link("text", "ref", " "))
        );
    }

    #[test]
    fn rejects_partial_matches() {
        assert_eq!(PageLink::parse("x [a][b]"), None);
        assert_eq!(PageLink::parse("[a]  [b]"), None);
        assert_eq!(PageLink::parse("[a](http://example.net/)"), None);
    }

    #[test]
    fn serializes_back_to_the_same_text() {
        for source in ["[a][b]", "[a] [b]", "[a][]", "[a] []", "[Page #1][]"] {
            let parsed = PageLink::parse(source).unwrap();
            assert_eq!(parsed.to_string(), source);
        }
    }

    #[test]
    fn never_serializes_empty_text_bracket() {
        assert_eq!(link("", "ref", "").to_string(), "[ref][]");
    }

    #[test]
    fn rewrite_links_visits_every_link() {
        let mut seen = Vec::new();
        let out = rewrite_links("[a][] and [b] [c], not [d]", |l| {
            seen.push(l.reference.clone());
            l
        });
        assert_eq!(out, "[a][] and [b] [c], not [d]");
        assert_eq!(seen, vec!["a", "c"]);
    }

    #[test]
    fn rewrite_links_replaces_reference() {
        let out = rewrite_links("see [x][old] and [old][]", |mut l| {
            if l.reference == "old" {
                l.reference = "new".into();
            }
            l
        });
        assert_eq!(out, "see [x][new] and [new][]");
    }

    #[test]
    fn text_without_links_is_borrowed() {
        let out = rewrite_links("plain *markdown*", |l| l);
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn adjacent_brackets_misfire_as_links() {
        // Known limitation of the dialect: any two adjacent bracket spans match.
        let parsed = PageLink::parse("[x] [y]");
        assert_eq!(parsed, Some(link("x", "y", " ")));
    }

    #[test]
    fn collapse_link_spacing_only_touches_links() {
        assert_eq!(
            collapse_link_spacing("[a] [b], [c] [] and [d] (e)", |_, _| true),
            "[a][b], [c][] and [d] (e)"
        );
    }

    #[test]
    fn collapse_link_spacing_keeps_rejected_links() {
        let mut offsets = Vec::new();
        let out = collapse_link_spacing("[a] [b] and [c] []", |start, link| {
            offsets.push(start);
            link.reference == "c"
        });
        assert_eq!(out, "[a] [b] and [c][]");
        assert_eq!(offsets, vec![0, 12]);
    }
}
