use std::fs;

use crate::extractor::walker::extract_tagged_text;

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_article_fixture() {
    let text = extract_tagged_text(&fixture("article.html"));

    assert!(text.contains("<h1>Sample Article</h1>"));
    assert!(text.contains("<p>This is the first paragraph.</p>"));
    assert!(text.contains("<strong>first</strong>"));
    assert!(text.contains("<a>related link</a>"));
    assert!(text.contains("<cite>Someone</cite>"));
    assert!(text.contains("<code>let x = 1 &amp;&amp; y &lt; 2;</code>"));
    assert!(text.contains("<small>Copyright</small>"));
}

#[test]
fn test_article_fixture_loses_scripts_and_attributes() {
    let text = extract_tagged_text(&fixture("article.html"));

    assert!(!text.contains("analytics"));
    assert!(!text.contains("injected"));
    assert!(!text.contains("onclick"));
    assert!(!text.contains("href"));
    assert!(!text.contains("class="));
    assert!(!text.contains("<img"));
    // The page title lives in <head> and is not part of the body
    assert!(!text.contains("News Site"));
}

#[test]
fn test_article_fixture_keeps_document_order() {
    let text = extract_tagged_text(&fixture("article.html"));

    let nav = text.find("<li>Home</li>").expect("nav list item");
    let headline = text.find("<h1>").expect("headline");
    let footer = text.find("<small>").expect("footer");
    assert!(nav < headline);
    assert!(headline < footer);
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken</title><body><p>Unclosed tags<div>More content";
    let text = extract_tagged_text(html);

    assert!(text.contains("<p>Unclosed tags</p>"));
    assert!(text.contains("<div>More content</div>"));
}

#[test]
fn test_body_without_allowed_elements_is_empty() {
    let html = "<html><body><table><tr><td>only a table</td></tr></table></body></html>";
    assert_eq!(extract_tagged_text(html), "");
}
