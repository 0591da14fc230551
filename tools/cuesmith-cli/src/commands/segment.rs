//! Segment an existing transcript into cues.

use std::path::PathBuf;

use cuesmith_audio_ai::subtitles::export_filename;
use cuesmith_common::config::AppConfig;
use cuesmith_editor_core::controller::TranscriptOutcome;
use cuesmith_editor_core::export::MemoryExportSink;

use super::offline_editor;

pub fn run(
    config: &AppConfig,
    transcript: PathBuf,
    duration: f64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&transcript)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", transcript.display()))?;

    if !(duration.is_finite() && duration > 0.0) {
        anyhow::bail!("Duration must be a positive number of seconds, got {duration}");
    }

    let mut editor = offline_editor(config, Some(duration));
    let cues = match editor.apply_transcript(text)? {
        TranscriptOutcome::Segmented { cues } => cues,
        TranscriptOutcome::AwaitingDuration => anyhow::bail!("Media duration unavailable"),
    };

    let mut sink = MemoryExportSink::default();
    editor.export(&mut sink)?;
    let content = sink
        .files
        .pop()
        .map(|f| f.content)
        .unwrap_or_default();

    let output_path = output.unwrap_or_else(|| {
        let name = transcript.file_name().and_then(|n| n.to_str());
        transcript.with_file_name(export_filename(name))
    });
    std::fs::write(&output_path, content)?;

    println!("Segmented {} into {cues} cue(s)", transcript.display());
    println!("  Duration: {duration:.3}s");
    println!("  Output: {}", output_path.display());
    Ok(())
}
