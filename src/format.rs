//! Markdown-subset renderer for answer text.
//!
//! Sequential text substitutions, not a structural parse: headings 1-3,
//! bold, italic, unordered list items, inline code spans, and line breaks.
//! Nested or overlapping emphasis, loose multi-line lists, and code spans
//! containing literal backticks are out of scope. Input is HTML-escaped
//! before substitution, so the output is safe to emit as markup.

use std::sync::LazyLock;

use regex::Regex;

static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

/// Escape HTML-significant characters for safe interpolation into markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the supported markdown subset to HTML.
///
/// Pure and synchronous; substitutions apply in precedence order (headings,
/// bold, italic, list items, code spans, line breaks).
#[must_use]
pub fn render_markdown(text: &str) -> String {
    let html = escape_html(text);
    let html = H3.replace_all(&html, r#"<h3 class="answer-h3">$1</h3>"#);
    let html = H2.replace_all(&html, r#"<h2 class="answer-h2">$1</h2>"#);
    let html = H1.replace_all(&html, r#"<h1 class="answer-h1">$1</h1>"#);
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "<em>$1</em>");
    let html = LIST_ITEM.replace_all(&html, r#"<li class="answer-li">$1</li>"#);
    let html = CODE.replace_all(&html, r#"<code class="answer-code">$1</code>"#);
    html.replace('\n', "<br />")
}
