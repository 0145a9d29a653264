//! Site header with brand mark and the new-query action.

pub(super) fn header(session_id: &str) -> String {
    format!(
        r##"<header class="site-header">
    <div class="brand">
        <span class="brand-mark">N</span>
        <span class="brand-name">Nexus NLP</span>
    </div>
    <button class="new-query" hx-post="/reset" hx-target="#workspace" hx-swap="innerHTML"
            hx-vals='{{"session_id": "{session_id}"}}'>
        + New Query
    </button>
</header>"##
    )
}
