//! Markdown to HTML rendering that is safe to embed in a page.
//!
//! Backend answers are untrusted: raw HTML inside the markdown is emitted as
//! escaped text and link/image destinations are restricted to a small set of
//! schemes.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const SAFE_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Render markdown into sanitized HTML.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options).map(sanitize_event);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: neutralize(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn neutralize(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// True for relative URLs and for absolute URLs with an allowed scheme.
///
/// Whitespace and control characters are ignored the way browsers ignore
/// them when resolving a scheme, so `java\tscript:` is still rejected.
pub fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match cleaned.find([':', '/', '?', '#']) {
        Some(pos) if cleaned[pos..].starts_with(':') => SAFE_SCHEMES.contains(&&cleaned[..pos]),
        _ => true,
    }
}

/// Escape text for use in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
