use colored::Colorize;
use ragdesk_core::{
    AppViewModel, BackendStatus, EntryBody, EntryId, FileRow, Role, SourceCitation,
    TranscriptEntry, UploadStatus,
};

use super::markdown::{markdown_to_terminal, strip_controls};

/// Projects view models onto an append-only terminal.
///
/// A scrolling terminal cannot take lines back, so each region is printed
/// again only when its content changed, and transcript entries are printed
/// once, in id order, up to the scroll anchor. Removed loading entries simply
/// stop mattering.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    last_status: Option<String>,
    last_files: Option<Vec<FileRow>>,
    last_upload: Option<UploadStatus>,
    last_highlight: bool,
    last_printed: EntryId,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut out = Vec::new();

        let status = view.status_line();
        if self.last_status.as_ref() != Some(&status) {
            out.push(match view.backend {
                BackendStatus::Online { .. } => format!("{} {}", "●".green(), status),
                BackendStatus::Offline => format!("{} {}", "●".red(), status.red()),
                BackendStatus::Unknown => format!("{} {}", "○".dimmed(), status.dimmed()),
            });
            self.last_status = Some(status);
        }

        if self.last_files.as_ref() != Some(&view.files) {
            out.extend(render_files(&view.files));
            self.last_files = Some(view.files.clone());
        }

        if view.drop_zone_highlighted && !self.last_highlight {
            out.push("⇣ receiving dropped files".cyan().to_string());
        }
        self.last_highlight = view.drop_zone_highlighted;

        if self.last_upload.as_ref() != Some(&view.upload) {
            out.extend(render_upload(view));
            self.last_upload = Some(view.upload.clone());
        }

        if let Some(anchor) = view.scroll_anchor {
            for entry in &view.transcript {
                if entry.id > self.last_printed && entry.id <= anchor {
                    out.extend(render_entry(entry));
                    self.last_printed = entry.id;
                }
            }
        }

        out
    }
}

fn render_files(files: &[FileRow]) -> Vec<String> {
    let mut out = vec!["Indexed files:".bold().to_string()];
    for row in files {
        out.push(match row {
            FileRow::File(name) => format!("  • {}", strip_controls(name)),
            FileRow::Placeholder => format!("  {}", row.label().dimmed()),
        });
    }
    out
}

fn render_upload(view: &AppViewModel) -> Vec<String> {
    let Some(line) = view.upload_line() else {
        return Vec::new();
    };
    let mut out = vec![match &view.upload {
        UploadStatus::InProgress { .. } => line.cyan().to_string(),
        UploadStatus::Finished { .. } => line.green().to_string(),
        UploadStatus::Failed => line.red().to_string(),
        UploadStatus::Idle => line,
    }];
    if let UploadStatus::Finished { rejected, .. } = &view.upload {
        for file in rejected {
            let detail = file.detail.as_deref().unwrap_or("not indexed");
            out.push(format!(
                "  {} {}: {}",
                "✗".red(),
                strip_controls(&file.filename),
                strip_controls(detail).dimmed()
            ));
        }
    }
    out
}

fn render_entry(entry: &TranscriptEntry) -> Vec<String> {
    let label = match entry.role {
        Role::User => "you".bright_green().bold(),
        Role::Bot => "bot".bright_magenta().bold(),
    };

    if entry.loading {
        let text = strip_controls(entry.body.source_text());
        return vec![format!("{label} {}", text.italic().dimmed())];
    }

    let body = match &entry.body {
        EntryBody::Markdown { source, .. } => markdown_to_terminal(source),
        EntryBody::Text(text) => strip_controls(text).lines().map(str::to_string).collect(),
    };

    let mut out = vec![label.to_string()];
    out.extend(body.into_iter().map(|line| format!("  {line}")));
    if !entry.sources.is_empty() {
        out.push(format!("  {}", "SOURCES:".dimmed()));
        out.extend(entry.sources.iter().flat_map(render_citation));
    }
    out
}

fn render_citation(source: &SourceCitation) -> Vec<String> {
    let mut out = vec![format!(
        "    {}  {}",
        strip_controls(&source.display_name()),
        format!("[{}]", strip_controls(&source.kind)).cyan()
    )];
    if let Some(preview) = &source.content_preview {
        let preview = strip_controls(preview).replace('\n', " ");
        let preview: String = preview.chars().take(100).collect();
        out.push(format!("      {}", preview.dimmed()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragdesk_core::{update, AppState, ChatReply, Effect, Msg};

    fn plain() {
        colored::control::set_override(false);
    }

    fn ask(state: AppState, text: &str) -> (AppState, EntryId) {
        let (state, _) = update(state, Msg::InputChanged(text.to_string()));
        let (state, effects) = update(state, Msg::EnterPressed { shift: false });
        match effects.as_slice() {
            [Effect::AskQuestion { loading_id, .. }] => (state, *loading_id),
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn regions_print_only_when_changed() {
        plain();
        let mut renderer = TerminalRenderer::new();
        let (state, _) = update(AppState::new(), Msg::HealthChecked(Ok(3)));

        let first = renderer.render(&state.view());
        assert_eq!(
            first,
            vec!["● Backend: Online (Docs: 3)", "Indexed files:", "  No files loaded."]
        );
        assert!(renderer.render(&state.view()).is_empty());

        let (state, _) = update(state, Msg::HealthChecked(Err("down".to_string())));
        assert_eq!(renderer.render(&state.view()), vec!["● Backend: Offline"]);
    }

    #[test]
    fn round_trip_prints_question_loading_and_answer_once() {
        plain();
        let mut renderer = TerminalRenderer::new();
        let (state, loading_id) = ask(AppState::new(), "What is the range?");

        let lines = renderer.render(&state.view());
        assert!(lines.contains(&"you".to_string()));
        assert!(lines.contains(&"  What is the range?".to_string()));
        assert!(lines.contains(&"bot Analyzing vehicle data...".to_string()));

        let (state, _) = update(
            state,
            Msg::ChatAnswered {
                loading_id,
                result: Ok(ChatReply {
                    answer: Some("300 miles".to_string()),
                    error: None,
                    sources: Vec::new(),
                }),
            },
        );
        assert_eq!(renderer.render(&state.view()), vec!["bot", "  300 miles"]);
    }

    #[test]
    fn citations_are_listed_under_the_answer() {
        plain();
        let mut renderer = TerminalRenderer::new();
        let (state, loading_id) = ask(AppState::new(), "pressure?");
        renderer.render(&state.view());

        let (state, _) = update(
            state,
            Msg::ChatAnswered {
                loading_id,
                result: Ok(ChatReply {
                    answer: Some("36 psi".to_string()),
                    error: None,
                    sources: vec![SourceCitation {
                        filename: "a.pdf".to_string(),
                        page: Some(3),
                        kind: "doc".to_string(),
                        content_preview: Some("Tyre\npressure table".to_string()),
                    }],
                }),
            },
        );

        assert_eq!(
            renderer.render(&state.view()),
            vec![
                "bot",
                "  36 psi",
                "  SOURCES:",
                "    a.pdf (p.3)  [doc]",
                "      Tyre pressure table",
            ]
        );
    }

    #[test]
    fn upload_summary_lists_rejected_files() {
        plain();
        let mut renderer = TerminalRenderer::new();
        let (state, _) = update(
            AppState::new(),
            Msg::UploadFinished {
                submitted: 2,
                result: Ok(vec![
                    ragdesk_core::UploadResult {
                        filename: Some("a.pdf".to_string()),
                        status: "indexed".to_string(),
                        detail: None,
                    },
                    ragdesk_core::UploadResult {
                        filename: Some("b.pdf".to_string()),
                        status: "failed".to_string(),
                        detail: None,
                    },
                ]),
            },
        );

        let lines = renderer.render(&state.view());
        assert!(lines.contains(&"Success: 1/2".to_string()));
        assert!(lines.contains(&"  ✗ b.pdf: failed".to_string()));
    }
}
