pub mod config;
pub mod nudge;
pub mod preview;
pub mod retime;
pub mod segment;
pub mod show;
pub mod transcribe;

use std::path::Path;

use cuesmith_audio_ai::subtitles::load_cue_file;
use cuesmith_audio_ai::transcription::{Transcript, TranscriptionProvider, TranscriptionRequest};
use cuesmith_common::config::AppConfig;
use cuesmith_common::error::{CuesmithError, CuesmithResult};
use cuesmith_cue_model::cue::CueId;
use cuesmith_editor_core::auth::StaticAuth;
use cuesmith_editor_core::media::SimulatedPlayback;
use cuesmith_editor_core::EditorController;

/// Provider for commands that work on existing text and never call a service.
struct Offline;

#[async_trait::async_trait]
impl TranscriptionProvider for Offline {
    async fn transcribe(&self, _: &TranscriptionRequest) -> CuesmithResult<Transcript> {
        Err(CuesmithError::transcription(
            "no transcription service in offline mode",
        ))
    }
}

/// Controller signed in as the local user, with a simulated surface that
/// reports `duration` once attached.
pub(crate) fn offline_editor(config: &AppConfig, duration: Option<f64>) -> EditorController {
    let mut editor = EditorController::new(config, Box::new(StaticAuth::local()), Box::new(Offline));
    let mut surface = SimulatedPlayback::new();
    if let Some(d) = duration {
        surface.load_metadata(d);
    }
    editor.attach_surface(Box::new(surface));
    editor
}

/// Open a cue file in an offline editor. Without an explicit duration the
/// end of the last cue stands in for the media length.
pub(crate) fn open_cue_file(
    config: &AppConfig,
    path: &Path,
    duration: Option<f64>,
) -> anyhow::Result<EditorController> {
    let cues = load_cue_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let span_end = cues.iter().map(|c| c.end).fold(0.0, f64::max);
    let duration = duration.or((span_end > 0.0).then_some(span_end));

    let mut editor = offline_editor(config, duration);
    editor.replace_cues(cues)?;
    Ok(editor)
}

/// Resolve a 1-based cue number, counted in start order as `show` prints it.
pub(crate) fn cue_at(editor: &EditorController, number: u64) -> anyhow::Result<CueId> {
    let index = number
        .checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Cue numbers start at 1"))?;
    editor
        .cues()
        .as_slice()
        .get(index as usize)
        .map(|c| c.id)
        .ok_or_else(|| anyhow::anyhow!("No cue {number}; the file has {}", editor.cues().len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuesmith_cue_model::cue::Cue;

    #[test]
    fn test_cue_numbers_follow_start_order() {
        let mut editor = offline_editor(&AppConfig::default(), Some(10.0));
        editor
            .replace_cues(vec![
                Cue::new(0, 4.0, 6.0, "later in file order first"),
                Cue::new(1, 0.0, 2.0, "earliest"),
                Cue::new(2, 2.0, 4.0, "middle"),
            ])
            .unwrap();

        assert_eq!(cue_at(&editor, 1).unwrap(), CueId(1));
        assert_eq!(cue_at(&editor, 2).unwrap(), CueId(2));
        assert_eq!(cue_at(&editor, 3).unwrap(), CueId(0));
        assert!(cue_at(&editor, 0).is_err());
        assert!(cue_at(&editor, 4).is_err());
    }
}
