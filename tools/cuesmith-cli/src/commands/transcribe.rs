//! Transcribe an audio file with the hosted service and export its cues.

use std::io::Write;
use std::path::{Path, PathBuf};

use cuesmith_audio_ai::transcription::{AudioUpload, HttpTranscriber};
use cuesmith_common::config::AppConfig;
use cuesmith_editor_core::auth::StaticAuth;
use cuesmith_editor_core::controller::{EditorController, TranscriptOutcome};
use cuesmith_editor_core::export::DirectoryExportSink;
use cuesmith_editor_core::media::SimulatedPlayback;

pub async fn run(
    config: &AppConfig,
    audio: PathBuf,
    duration: f64,
    lang: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Transcribing: {}", audio.display());

    let upload = AudioUpload::from_path(&audio)?;
    let provider = HttpTranscriber::from_config(&config.transcription)?;

    let mut editor =
        EditorController::new(config, Box::new(StaticAuth::local()), Box::new(provider));
    editor.load_audio(upload)?;
    let mut surface = SimulatedPlayback::new();
    surface.load_metadata(duration);
    editor.attach_surface(Box::new(surface));

    let language = lang.unwrap_or_else(|| config.transcription.language.clone());
    let report = |percent: u8| {
        print!("\r  Progress: {percent:>3}%  ");
        std::io::stdout().flush().ok();
    };

    let outcome = match editor.transcribe(&language, Some(&report)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("\nTranscription failed: {e}");
            println!("Nothing was written; run the command again to retry.");
            return Err(e.into());
        }
    };
    println!();

    match outcome {
        TranscriptOutcome::Segmented { cues } => println!("  Cues: {cues}"),
        TranscriptOutcome::AwaitingDuration => {
            anyhow::bail!("Duration {duration} is not usable for segmentation")
        }
    }

    let dir = output.unwrap_or_else(|| {
        audio
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let mut sink = DirectoryExportSink::new(&dir);
    let file_name = editor.export(&mut sink)?;
    println!("Exported: {}", dir.join(file_name).display());

    Ok(())
}
