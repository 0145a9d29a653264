//! Document shell.

use crate::session::SessionSnapshot;

use super::header::header;
use super::workspace::workspace;

/// Render the full page for a session.
#[must_use]
pub fn page(snapshot: &SessionSnapshot) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Grounded question answering">
    <title>Nexus NLP</title>

    <script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js"></script>
    <script defer src="https://unpkg.com/alpinejs@3.14.9/dist/cdn.min.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div id="app-shell">
        {header}
        <main id="workspace" class="workspace">{content}</main>
    </div>
</body>
</html>"#,
        header = header(&snapshot.id),
        content = workspace(snapshot),
    )
}
