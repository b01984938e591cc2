use std::path::Path;

use chrono::Utc;
use desk_logging::{desk_error, desk_info};
use ragdesk_core::{render_transcript_document, AppViewModel};
use ragdesk_engine::{write_atomically, PersistError};

/// Save the transcript as a standalone HTML page.
pub(crate) fn export_transcript(view: &AppViewModel, target: &Path) -> Result<(), PersistError> {
    let generated_at = Utc::now().to_rfc3339();
    let document = render_transcript_document(view, &generated_at);
    match write_atomically(target, &document) {
        Ok(()) => {
            desk_info!(
                "Exported {} transcript entries to {:?}",
                view.transcript.len(),
                target
            );
            Ok(())
        }
        Err(err) => {
            desk_error!("Failed to export transcript to {:?}: {}", target, err);
            Err(err)
        }
    }
}
