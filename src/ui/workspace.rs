//! Workspace region: the HTMX swap target.

use crate::session::SessionSnapshot;

use super::answer_panel::answer_panel;
use super::history_sidebar::history_sidebar;
use super::question_form::question_form;

/// Render the workspace (sidebar, answer panel, loading indicator, form).
///
/// Every fragment route returns this for the session's fresh snapshot, so a
/// single swap keeps all regions consistent.
#[must_use]
pub fn workspace(snapshot: &SessionSnapshot) -> String {
    format!(
        r#"<div class="layout">
    <aside class="sidebar">{sidebar}</aside>
    <section class="content">
        {panel}
        {thinking}
        {form}
    </section>
</div>"#,
        sidebar = history_sidebar(snapshot),
        panel = answer_panel(snapshot),
        thinking = thinking_indicator(),
        form = question_form(&snapshot.id),
    )
}

/// Hidden skeleton shown by HTMX while an ask request is in flight.
fn thinking_indicator() -> &'static str {
    r#"<div id="thinking" class="thinking" aria-hidden="true">
        <span class="skeleton-line w-75"></span>
        <span class="skeleton-line w-100"></span>
        <span class="skeleton-line w-85"></span>
        <span class="skeleton-line w-60"></span>
    </div>"#
}
