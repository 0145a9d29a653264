//! History sidebar: past questions, newest first, click to re-display.

use crate::format::escape_html;
use crate::session::{HistoryItem, SessionSnapshot};

pub(super) fn history_sidebar(snapshot: &SessionSnapshot) -> String {
    let body = if snapshot.history.is_empty() {
        empty_history().to_string()
    } else {
        let entries: String = snapshot
            .history
            .iter()
            .map(|item| history_entry(&snapshot.id, item))
            .collect();
        format!(r#"<div class="history-list">{entries}</div>"#)
    };

    format!(
        r#"<h3 class="sidebar-title">Search History</h3>
    {body}"#
    )
}

fn empty_history() -> &'static str {
    r#"<div class="history-empty">
        <p>Recent queries will appear here</p>
    </div>"#
}

fn history_entry(session_id: &str, item: &HistoryItem) -> String {
    let sources_badge = if item.sources.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="history-sources">{} sources</span>"#,
            item.sources.len()
        )
    };

    // Selecting an entry scrolls the viewport back to the answer.
    format!(
        r##"<button class="history-item" hx-post="/select/{id}" hx-target="#workspace"
            hx-swap="innerHTML show:window:top" hx-vals='{{"session_id": "{session_id}"}}'>
        <span class="history-question">{question}</span>
        <span class="history-meta">
            <span class="history-time">{time}</span>
            {sources_badge}
        </span>
    </button>"##,
        id = item.id,
        question = escape_html(&item.question),
        time = item.timestamp.format("%H:%M"),
    )
}
