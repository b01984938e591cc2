use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use desk_logging::{desk_debug, desk_info};

use crate::{ApiError, ApiSettings, Backend, EngineEvent, ReqwestBackend};

/// Receives completions from the engine's worker tasks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    CheckHealth,
    ListFiles,
    Upload { files: Vec<PathBuf> },
    Ask { loading_id: u64, question: String },
}

/// Runs backend requests on a background tokio runtime.
///
/// Every command becomes its own task, so requests overlap freely and
/// complete in whatever order the network delivers them.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(backend: Arc<dyn Backend>, sink: Arc<dyn EventSink>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("ragdesk-engine")
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let event = handle_command(backend.as_ref(), command).await;
                    sink.emit(event);
                });
            }
            desk_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx })
    }

    /// Engine backed by the HTTP client.
    pub fn connect(settings: &ApiSettings, sink: Arc<dyn EventSink>) -> Result<Self, ApiError> {
        let backend = ReqwestBackend::new(settings)?;
        desk_info!("engine targeting {}", backend.base_url());
        Self::new(Arc::new(backend), sink).map_err(|err| {
            ApiError::new(crate::FailureKind::Network, format!("runtime: {err}"))
        })
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn list_files(&self) {
        self.send(EngineCommand::ListFiles);
    }

    pub fn upload(&self, files: Vec<PathBuf>) {
        self.send(EngineCommand::Upload { files });
    }

    pub fn ask(&self, loading_id: u64, question: impl Into<String>) {
        self.send(EngineCommand::Ask {
            loading_id,
            question: question.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(backend: &dyn Backend, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::CheckHealth => EngineEvent::HealthChecked(backend.health().await),
        EngineCommand::ListFiles => EngineEvent::FilesListed(backend.list_uploaded().await),
        EngineCommand::Upload { files } => EngineEvent::UploadCompleted {
            submitted: files.len(),
            result: backend.upload(&files).await,
        },
        EngineCommand::Ask {
            loading_id,
            question,
        } => EngineEvent::ChatAnswered {
            loading_id,
            result: backend.chat(&question).await,
        },
    }
}
