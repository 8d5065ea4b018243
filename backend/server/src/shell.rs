//! # Shell
//!
//! HTML document for every GET that is neither an API route nor a static
//! asset. The client bundle renders into `#app` and reads
//! `window.initialState` on boot, nothing is rendered on the server.
use axum::{http::Uri, response::Html};
use serde_json::{Value, json};

pub const ROOT_TITLE: &str = "Server side Rendering";
pub const DEFAULT_TITLE: &str = "Dashboard";

pub async fn render_shell(uri: Uri) -> Html<String> {
    if uri.path() == "/" {
        return Html(document(ROOT_TITLE, "", None));
    }

    let location = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |path| path.as_str());

    Html(document(
        DEFAULT_TITLE,
        "",
        Some(&json!({ "location": location })),
    ))
}

fn document(title: &str, body: &str, initial_state: Option<&Value>) -> String {
    let state_script = initial_state
        .map(|state| {
            format!(
                "\n    <script>window.initialState = {};</script>",
                escape_script(&state.to_string())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/css/main.css">
  </head>
  <body>
    <div id="app">{body}</div>{state_script}
    <script src="/js/main.bundle.js"></script>
  </body>
</html>
"#
    )
}

/// Keeps serialized JSON from closing the surrounding `<script>` element.
fn escape_script(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());

    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }

    escaped
}
