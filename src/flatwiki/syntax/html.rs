//! Markdown to sanitized HTML, with a hook that lets the caller resolve
//! reference links the document itself does not define.

use super::link::collapse_link_spacing;
use ammonia::{Builder, UrlRelative};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, BrokenLink, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use std::borrow::Cow;
use std::collections::HashSet;
use std::ops::Range;

/// Target substituted for a reference by the override hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTarget {
    pub url: String,
    pub title: String,
}

static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .add_tags(["input"])
        .add_tag_attributes("a", ["title"])
        .add_tag_attributes("input", ["type", "checked", "disabled"])
        .link_rel(Some("nofollow"))
        .url_relative(UrlRelative::Custom(Box::new(reject_protocol_relative)));
    for heading in ["h1", "h2", "h3", "h4", "h5", "h6"] {
        builder.add_tag_attributes(heading, ["id"]);
    }
    builder
});

fn reject_protocol_relative(url: &str) -> Option<Cow<'_, str>> {
    if url.starts_with("//") {
        None
    } else {
        Some(Cow::Borrowed(url))
    }
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_DEFINITION_LIST);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Render `body` as sanitized HTML.
///
/// `override_reference` is called with the label of every reference link
/// without a matching definition. Returning a target turns it into a link;
/// the target title becomes the `title` attribute and, for `[ref][]` and
/// `[ref]`, also the link text. Returning `None` leaves the converter's
/// default output (the literal brackets) in place.
pub fn render_markdown<F>(body: &str, mut override_reference: F) -> String
where
    F: FnMut(&str) -> Option<ReferenceTarget>,
{
    let source = join_resolvable_links(body, &mut override_reference);
    let callback = |link: BrokenLink<'_>| {
        override_reference(&*link.reference)
            .map(|target| (CowStr::from(target.url), CowStr::from(target.title)))
    };
    let parser =
        Parser::new_with_broken_link_callback(source.as_ref(), markdown_options(), Some(callback));

    let mut events = Vec::new();
    let mut replacing_text = false;
    for event in parser {
        match event {
            Event::Start(Tag::Link {
                link_type: LinkType::CollapsedUnknown | LinkType::ShortcutUnknown,
                ref title,
                ..
            }) if !title.is_empty() => {
                let text = title.clone();
                events.push(event);
                events.push(Event::Text(text));
                replacing_text = true;
            }
            Event::End(TagEnd::Link) => {
                replacing_text = false;
                events.push(event);
            }
            _ if replacing_text => {}
            other => events.push(other),
        }
    }

    let mut unsafe_html = String::new();
    html::push_html(&mut unsafe_html, events.into_iter());
    SANITIZER.clean(&unsafe_html).to_string()
}

/// CommonMark does not accept a space between the two bracket pairs of a
/// reference link, the dialect does. Remove that space, but only for links
/// outside code whose reference is defined in the document or resolved by
/// the hook; everything else reaches the converter as written.
fn join_resolvable_links<'t, F>(body: &'t str, resolve: &mut F) -> Cow<'t, str>
where
    F: FnMut(&str) -> Option<ReferenceTarget>,
{
    if !body.contains("] [") {
        return Cow::Borrowed(body);
    }

    let mut code: Vec<Range<usize>> = Vec::new();
    let mut offsets = Parser::new_ext(body, markdown_options()).into_offset_iter();
    for (event, range) in offsets.by_ref() {
        if matches!(event, Event::Code(_) | Event::Start(Tag::CodeBlock(_))) {
            code.push(range);
        }
    }
    let definitions = offsets.reference_definitions();

    let mut resolved = HashSet::new();
    collapse_link_spacing(body, |start, link| {
        if code.iter().any(|range| range.contains(&start)) {
            return false;
        }
        if definitions.get(&link.reference).is_some() || resolved.contains(&link.reference) {
            return true;
        }
        if resolve(&link.reference).is_some() {
            resolved.insert(link.reference.clone());
            return true;
        }
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_pages(_: &str) -> Option<ReferenceTarget> {
        None
    }

    fn one_page(reference: &str) -> Option<ReferenceTarget> {
        (reference == "abc123").then(|| ReferenceTarget {
            url: "/view/abc123".into(),
            title: "Home".into(),
        })
    }

    #[test]
    fn renders_plain_markdown() {
        assert_eq!(
            render_markdown("Some text with *markdown*.", no_pages),
            "<p>Some text with <em>markdown</em>.</p>\n"
        );
    }

    #[test]
    fn regular_links_get_nofollow() {
        let body = "Some text with *markdown*, an [inline link](http://example1.net/), \
                    a [reference link] [1], and another [REF LINK][].\n\
                    [1]: http://example2.net/\n\
                    [REF LINK]: http://example3.net/ \"Optional title\" \n";
        assert_eq!(
            render_markdown(body, no_pages),
            "<p>Some text with <em>markdown</em>, an <a href=\"http://example1.net/\" rel=\"nofollow\">inline link</a>, \
             a <a href=\"http://example2.net/\" rel=\"nofollow\">reference link</a>, \
             and another <a href=\"http://example3.net/\" title=\"Optional title\" rel=\"nofollow\">REF LINK</a>.</p>\n"
        );
    }

    #[test]
    fn override_uses_title_as_text_for_collapsed_links() {
        assert_eq!(
            render_markdown("See [abc123][].", one_page),
            "<p>See <a href=\"/view/abc123\" title=\"Home\" rel=\"nofollow\">Home</a>.</p>\n"
        );
    }

    #[test]
    fn override_keeps_explicit_text() {
        assert_eq!(
            render_markdown("See [the start][abc123].", one_page),
            "<p>See <a href=\"/view/abc123\" title=\"Home\" rel=\"nofollow\">the start</a>.</p>\n"
        );
    }

    #[test]
    fn override_accepts_spaced_form() {
        assert_eq!(
            render_markdown("See [abc123] [].", one_page),
            "<p>See <a href=\"/view/abc123\" title=\"Home\" rel=\"nofollow\">Home</a>.</p>\n"
        );
    }

    #[test]
    fn declined_override_keeps_literal_brackets() {
        assert_eq!(
            render_markdown("See [fff000][].", one_page),
            "<p>See [fff000][].</p>\n"
        );
    }

    #[test]
    fn dangling_spaced_links_keep_their_space() {
        assert_eq!(
            render_markdown("See [fff000] [] and [x] [y].", no_pages),
            "<p>See [fff000] [] and [x] [y].</p>\n"
        );
    }

    #[test]
    fn code_keeps_spaced_brackets() {
        let inline = render_markdown("Use `m[0] [1]` here.", |_| {
            Some(ReferenceTarget {
                url: "/view/x".into(),
                title: "X".into(),
            })
        });
        assert!(inline.contains("<code>m[0] [1]</code>"), "{}", inline);

        let fenced = render_markdown("```\na[i] [j]\n```\n", one_page);
        assert!(fenced.contains("a[i] [j]"), "{}", fenced);
    }

    #[test]
    fn safe_raw_html_is_kept() {
        assert_eq!(
            render_markdown("Some <b>bold</b> text.", no_pages),
            "<p>Some <b>bold</b> text.</p>\n"
        );
    }

    #[test]
    fn unsafe_raw_html_is_removed() {
        let rendered = render_markdown(
            "Hello<script>alert(1)</script> <img src=\"x.png\" onerror=\"alert(2)\">",
            no_pages,
        );
        assert!(!rendered.contains("<script"), "{}", rendered);
        assert!(!rendered.contains("alert"), "{}", rendered);
        assert!(rendered.contains("<img src=\"x.png\">"), "{}", rendered);
    }

    #[test]
    fn javascript_links_are_neutralized() {
        let rendered = render_markdown("[bad](javascript:alert(1))", no_pages);
        assert!(!rendered.contains("javascript:"), "{}", rendered);
        assert!(rendered.contains("bad</a>"), "{}", rendered);
    }

    #[test]
    fn protocol_relative_links_are_dropped() {
        let rendered = render_markdown("[away](//evil.example/)", no_pages);
        assert!(!rendered.contains("evil.example"), "{}", rendered);
    }

    #[test]
    fn email_autolinks_get_mailto() {
        assert_eq!(
            render_markdown("Mail <foo@example.com>.", no_pages),
            "<p>Mail <a href=\"mailto:foo@example.com\" rel=\"nofollow\">foo@example.com</a>.</p>\n"
        );
    }

    #[test]
    fn definition_lists_are_rendered() {
        let rendered = render_markdown("Term\n: Definition\n", no_pages);
        assert!(rendered.contains("<dt>Term</dt>"), "{}", rendered);
        assert!(rendered.contains("<dd>Definition</dd>"), "{}", rendered);
    }

    #[test]
    fn heading_ids_are_kept() {
        let rendered = render_markdown("# Intro {#intro}\n", no_pages);
        assert!(rendered.contains("<h1 id=\"intro\">Intro</h1>"), "{}", rendered);
    }
}
