//! Allow-list text extraction.
//!
//! Every allowed element under `<body>` is re-emitted as `<tag>text</tag>`,
//! in document order. Nested matches are emitted too, so a `<p>` inside a
//! `<div>` shows up once on its own and once as part of the div's text.
//! Attributes never survive.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

const ALLOWED_TAGS: &[&str] = &[
    // headings
    "h1", "h2", "h3", "h4", "h5", "h6",
    // paragraph-like blocks
    "p", "blockquote", "pre", "div",
    // inline styling
    "em", "strong", "i", "b", "mark", "small", "sub", "sup", "u", "s", "strike",
    // links
    "a",
    // lists
    "ul", "ol", "li",
    // containers
    "span", "section", "article", "main",
    // quotations
    "q", "cite",
    // line breaks
    "br", "hr",
    // code
    "code", "var",
];

const VOID_TAGS: &[&str] = &["br", "hr"];

/// Subtrees whose text is never visible to a reader.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("valid selector"));

static ALLOWED: Lazy<Selector> =
    Lazy::new(|| Selector::parse(&ALLOWED_TAGS.join(", ")).expect("valid selector"));

/// Returns the empty string when the body holds no visible text at all.
pub fn extract_tagged_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Some(body) = document.select(&BODY).next() else {
        return String::new();
    };

    let mut out = String::new();
    let mut has_text = false;

    for element in body.select(&ALLOWED) {
        if is_hidden(element) {
            continue;
        }

        let name = element.value().name();
        if VOID_TAGS.contains(&name) {
            out.push('<');
            out.push_str(name);
            out.push('>');
            continue;
        }

        let mut raw = String::new();
        push_visible_text(element, &mut raw);
        let text = collapse_whitespace(&raw);
        if text.is_empty() {
            continue;
        }

        has_text = true;
        out.push('<');
        out.push_str(name);
        out.push('>');
        push_escaped(&text, &mut out);
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    if has_text { out } else { String::new() }
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| HIDDEN_TAGS.contains(&el.name()))
    })
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.text),
            Node::Element(el) if HIDDEN_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    push_visible_text(child, out);
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_escaped(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
