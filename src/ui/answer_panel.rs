//! Answer panel: question heading plus answer, error, or loading body.

use url::Url;

use crate::engine::{Answer, GroundingSource};
use crate::format::{escape_html, render_markdown};
use crate::session::SessionSnapshot;

pub(super) fn answer_panel(snapshot: &SessionSnapshot) -> String {
    let Some(current) = &snapshot.current else {
        return hero().to_string();
    };

    let body = if snapshot.loading {
        skeleton().to_string()
    } else if let Some(error) = &snapshot.error {
        error_banner(error)
    } else if let Some(answer) = &current.answer {
        answer_body(answer)
    } else {
        skeleton().to_string()
    };

    query_card(&current.question, &body)
}

fn hero() -> &'static str {
    r#"<div class="hero">
        <div class="hero-mark">?</div>
        <h2 class="hero-title">How can I help you today?</h2>
        <p class="hero-sub">Ask any complex question and get a research-backed answer
            using advanced NLP techniques.</p>
    </div>"#
}

fn query_card(question: &str, body: &str) -> String {
    format!(
        r#"<div class="query-card">
        <div class="query-label">User Question</div>
        <h1 class="query-question">{question}</h1>
        <div class="query-divider"></div>
        {body}
    </div>"#,
        question = escape_html(question),
    )
}

fn skeleton() -> &'static str {
    r#"<div class="thinking visible">
        <span class="skeleton-line w-75"></span>
        <span class="skeleton-line w-100"></span>
        <span class="skeleton-line w-85"></span>
        <span class="skeleton-line w-60"></span>
    </div>"#
}

fn error_banner(message: &str) -> String {
    format!(
        r#"<div class="error-banner" role="alert">{}</div>"#,
        escape_html(message)
    )
}

fn answer_body(answer: &Answer) -> String {
    let sources = if answer.sources.is_empty() {
        String::new()
    } else {
        sources_grid(&answer.sources)
    };

    format!(
        r#"<div class="answer">
        <div class="answer-label">NLP Engine Output</div>
        <div class="answer-text">{text}</div>
        {sources}
    </div>"#,
        text = render_markdown(&answer.text),
    )
}

fn sources_grid(sources: &[GroundingSource]) -> String {
    let cards: String = sources.iter().map(source_card).collect();
    format!(
        r#"<div class="sources">
        <h4 class="sources-title">Sources &amp; Grounding</h4>
        <div class="sources-grid">{cards}</div>
    </div>"#
    )
}

fn source_card(source: &GroundingSource) -> String {
    format!(
        r#"<a class="source-card" href="{uri}" target="_blank" rel="noopener noreferrer">
        <span class="source-title">{title}</span>
        <span class="source-host">{host}</span>
    </a>"#,
        uri = escape_html(&source.uri),
        title = escape_html(&source.title),
        host = escape_html(&source_hostname(&source.uri)),
    )
}

fn source_hostname(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|url| url.host_str().map(ToString::to_string))
        .unwrap_or_default()
}
