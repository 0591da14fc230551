//! List the cues in a file.

use std::path::PathBuf;

use cuesmith_audio_ai::subtitles::format_time;
use cuesmith_common::config::AppConfig;

use super::open_cue_file;

pub fn run(config: &AppConfig, path: PathBuf, at: Option<f64>, json: bool) -> anyhow::Result<()> {
    let mut editor = open_cue_file(config, &path, None)?;

    if let Some(t) = at {
        if let Some(surface) = editor.surface_mut() {
            surface.seek(t);
        }
        editor.pump_media_events();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&editor.snapshot())?);
        return Ok(());
    }

    let active = editor.active_cue().map(|c| c.id);
    println!("Cues in {}: {}", path.display(), editor.cues().len());
    for (i, cue) in editor.cues().iter().enumerate() {
        let marker = if Some(cue.id) == active { ">" } else { " " };
        println!(
            "{marker} {:>4}  {} --> {}  {}",
            i + 1,
            format_time(cue.start),
            format_time(cue.end),
            cue.text.replace('\n', " / ")
        );
    }

    if at.is_some() {
        let position = format_time(editor.playback().position);
        match editor.active_cue() {
            Some(cue) => println!("\nActive at {position}: {}", cue.text),
            None => println!("\nNo cue active at {position}"),
        }
    }

    Ok(())
}
