//! Shift one cue bound by a single nudge step.

use std::path::PathBuf;

use cuesmith_audio_ai::subtitles::{format_time, save_cue_file};
use cuesmith_common::config::AppConfig;
use cuesmith_cue_model::cue::TimeBound;

use super::{cue_at, open_cue_file};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    cue: u64,
    bound: TimeBound,
    later: bool,
    duration: Option<f64>,
) -> anyhow::Result<()> {
    let mut editor = open_cue_file(config, &path, duration)?;
    let id = cue_at(&editor, cue)?;

    let (start, end) = editor
        .nudge(id, bound, later)
        .map_err(|e| anyhow::anyhow!("Cue {cue} unchanged: {e}"))?;
    save_cue_file(editor.cues().as_slice(), &path)?;

    println!(
        "Cue {cue}: {} --> {}",
        format_time(start),
        format_time(end)
    );
    Ok(())
}
