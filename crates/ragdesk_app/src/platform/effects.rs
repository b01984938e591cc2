use std::sync::{mpsc, Arc};

use desk_logging::{desk_info, desk_warn};
use ragdesk_core::{ChatReply, Effect, Msg, SourceCitation, UploadResult};
use ragdesk_engine::{ApiError, ApiSettings, Citation, EngineEvent, EngineHandle, EventSink};

use super::app::Command;

const UNKNOWN: &str = "unknown";

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &ApiSettings, cmd_tx: mpsc::Sender<Command>) -> Result<Self, ApiError> {
        let sink = Arc::new(MsgSink { cmd_tx });
        let engine = EngineHandle::connect(settings, sink)?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CheckHealth => self.engine.check_health(),
                Effect::ListFiles => self.engine.list_files(),
                Effect::UploadFiles { files } => {
                    desk_info!("UploadFiles count={}", files.len());
                    self.engine.upload(files);
                }
                Effect::AskQuestion {
                    loading_id,
                    question,
                } => {
                    desk_info!(
                        "AskQuestion loading_id={} question_len={}",
                        loading_id,
                        question.len()
                    );
                    self.engine.ask(loading_id, question);
                }
            }
        }
    }
}

/// Feeds engine completions back into the dispatcher as messages.
struct MsgSink {
    cmd_tx: mpsc::Sender<Command>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.cmd_tx.send(Command::Dispatch(map_event(event)));
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthChecked(result) => Msg::HealthChecked(
            result
                .map(|report| {
                    if report.google_genai.as_deref() == Some("missing_key") {
                        desk_warn!("backend reports no Google GenAI key configured");
                    }
                    report.faiss_index_size
                })
                .map_err(|err| {
                    desk_warn!("health check failed: {}", err);
                    err.to_string()
                }),
        ),
        EngineEvent::FilesListed(result) => Msg::FilesListed(
            result.map(|listing| listing.files).map_err(|err| {
                desk_warn!("file listing failed: {}", err);
                err.to_string()
            }),
        ),
        EngineEvent::UploadCompleted { submitted, result } => Msg::UploadFinished {
            submitted,
            result: result
                .map(|report| {
                    report
                        .results
                        .into_iter()
                        .map(|file| UploadResult {
                            filename: file.filename,
                            status: file.status,
                            detail: file.detail,
                        })
                        .collect()
                })
                .map_err(|err| {
                    desk_warn!("upload of {} file(s) failed: {}", submitted, err);
                    err.to_string()
                }),
        },
        EngineEvent::ChatAnswered { loading_id, result } => Msg::ChatAnswered {
            loading_id,
            result: result
                .map(|response| ChatReply {
                    answer: response.answer,
                    error: response.error,
                    sources: response
                        .sources
                        .unwrap_or_default()
                        .into_iter()
                        .map(map_citation)
                        .collect(),
                })
                .map_err(|err| {
                    desk_warn!("chat request {} failed: {}", loading_id, err);
                    err.to_string()
                }),
        },
    }
}

fn map_citation(citation: Citation) -> SourceCitation {
    SourceCitation {
        filename: citation.filename.unwrap_or_else(|| UNKNOWN.to_string()),
        page: citation.page,
        kind: citation.kind.unwrap_or_else(|| UNKNOWN.to_string()),
        content_preview: citation.content_preview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragdesk_engine::{
        ChatResponse, FailureKind, FileListing, HealthReport, UploadFileResult, UploadReport,
    };

    #[test]
    fn health_maps_to_index_size() {
        let event = EngineEvent::HealthChecked(Ok(HealthReport {
            faiss_index_size: 42,
            status: Some("ok".to_string()),
            ollama: None,
            google_genai: Some("missing_key".to_string()),
        }));
        assert_eq!(map_event(event), Msg::HealthChecked(Ok(42)));
    }

    #[test]
    fn listing_maps_to_names() {
        let event = EngineEvent::FilesListed(Ok(FileListing {
            files: vec!["a.pdf".to_string()],
        }));
        assert_eq!(map_event(event), Msg::FilesListed(Ok(vec!["a.pdf".to_string()])));
    }

    #[test]
    fn upload_results_keep_status_and_detail() {
        let event = EngineEvent::UploadCompleted {
            submitted: 2,
            result: Ok(UploadReport {
                results: vec![
                    UploadFileResult {
                        filename: Some("a.pdf".to_string()),
                        status: "indexed".to_string(),
                        chunks: Some(12),
                        detail: None,
                    },
                    UploadFileResult {
                        filename: None,
                        status: "failed".to_string(),
                        chunks: None,
                        detail: Some("unreadable".to_string()),
                    },
                ],
            }),
        };

        let Msg::UploadFinished { submitted, result } = map_event(event) else {
            panic!("expected UploadFinished");
        };
        assert_eq!(submitted, 2);
        assert_eq!(
            result.unwrap(),
            vec![
                UploadResult {
                    filename: Some("a.pdf".to_string()),
                    status: "indexed".to_string(),
                    detail: None,
                },
                UploadResult {
                    filename: None,
                    status: "failed".to_string(),
                    detail: Some("unreadable".to_string()),
                },
            ]
        );
    }

    #[test]
    fn citations_fall_back_to_unknown() {
        let event = EngineEvent::ChatAnswered {
            loading_id: 7,
            result: Ok(ChatResponse {
                answer: Some("Yes".to_string()),
                sources: Some(vec![Citation {
                    filename: None,
                    page: Some(2),
                    kind: None,
                    content_preview: None,
                }]),
                ..ChatResponse::default()
            }),
        };

        let Msg::ChatAnswered { loading_id, result } = map_event(event) else {
            panic!("expected ChatAnswered");
        };
        assert_eq!(loading_id, 7);
        let reply = result.unwrap();
        assert_eq!(reply.answer.as_deref(), Some("Yes"));
        assert_eq!(reply.sources[0].filename, "unknown");
        assert_eq!(reply.sources[0].kind, "unknown");
        assert_eq!(reply.sources[0].page, Some(2));
    }

    #[test]
    fn transport_failure_becomes_message_text() {
        let event = EngineEvent::ChatAnswered {
            loading_id: 3,
            result: Err(ApiError {
                kind: FailureKind::Timeout,
                message: "no reply in 30s".to_string(),
            }),
        };

        let Msg::ChatAnswered { result, .. } = map_event(event) else {
            panic!("expected ChatAnswered");
        };
        let message = result.unwrap_err();
        assert!(message.contains("no reply in 30s"));
    }
}
