use std::fmt::Write;

use crate::markup::escape_html;
use crate::{AppViewModel, EntryBody, FileRow, Role, SourceCitation, TranscriptEntry};

const DOCUMENT_STYLE: &str = r#"
body { background: #0d1117; color: #c9d1d9; font-family: sans-serif; margin: 2em; }
.status { color: #8b949e; }
.message { display: flex; gap: 0.75em; margin: 1em 0; }
.message.user .content { background: #161b22; }
.avatar { font-weight: bold; min-width: 3em; }
.content { padding: 0.5em 1em; border: 1px solid #30363d; border-radius: 6px; flex: 1; }
.sources-list { margin-top: 0.75em; border-top: 1px solid #30363d; padding-top: 0.5em; }
.source-item { display: flex; justify-content: space-between; }
.source-type { color: #00f0ff; font-size: 0.8em; }
"#;

/// Render one transcript entry as an HTML fragment.
///
/// Markdown bodies are already sanitized; every other piece of text is escaped.
pub fn render_entry_html(entry: &TranscriptEntry) -> String {
    let (role_class, avatar) = match entry.role {
        Role::User => ("user", "You"),
        Role::Bot => ("bot", "Bot"),
    };

    let mut content = match (&entry.body, entry.loading) {
        (body, true) => format!("<i>{}</i>", escape_html(body.source_text())),
        (EntryBody::Markdown { html, .. }, false) => html.clone(),
        (EntryBody::Text(text), false) => format!("<p>{}</p>", escape_html(text)),
    };

    if !entry.sources.is_empty() {
        content.push_str(&render_sources(&entry.sources));
    }

    format!(
        "<div class=\"message {role_class}\" id=\"msg-{id}\">\
         <div class=\"avatar\">{avatar}</div>\
         <div class=\"content\">{content}</div></div>\n",
        id = entry.id,
    )
}

fn render_sources(sources: &[SourceCitation]) -> String {
    let mut out = String::from("<div class=\"sources-list\"><small>SOURCES:</small>");
    for source in sources {
        let _ = write!(
            out,
            "<div class=\"source-item\"><span>{}</span><span class=\"source-type\">{}</span></div>",
            escape_html(&source.display_name()),
            escape_html(&source.kind),
        );
    }
    out.push_str("</div>");
    out
}

/// Render a standalone HTML page with the status, file list and transcript.
pub fn render_transcript_document(view: &AppViewModel, generated_at: &str) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>RagDesk transcript</title>\n<style>");
    out.push_str(DOCUMENT_STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(
        out,
        "<p class=\"status\">{} &middot; exported {}</p>",
        escape_html(&view.status_line()),
        escape_html(generated_at)
    );

    out.push_str("<ul class=\"file-list\">\n");
    for row in &view.files {
        match row {
            FileRow::File(name) => {
                let _ = writeln!(out, "<li>{}</li>", escape_html(name));
            }
            FileRow::Placeholder => {
                let _ = writeln!(out, "<li><small>{}</small></li>", escape_html(row.label()));
            }
        }
    }
    out.push_str("</ul>\n<div id=\"chat-history\">\n");

    for entry in &view.transcript {
        out.push_str(&render_entry_html(entry));
    }

    out.push_str("</div>\n</body>\n</html>\n");
    out
}
