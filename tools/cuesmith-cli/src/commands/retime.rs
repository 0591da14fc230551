//! Set a cue bound from a typed time.

use std::path::PathBuf;

use cuesmith_audio_ai::subtitles::{format_time, save_cue_file, try_parse_time};
use cuesmith_common::config::AppConfig;
use cuesmith_cue_model::cue::TimeBound;

use super::{cue_at, open_cue_file};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    cue: u64,
    bound: TimeBound,
    time: String,
    duration: Option<f64>,
) -> anyhow::Result<()> {
    if try_parse_time(&time).is_none() {
        tracing::warn!(input = %time, "Time is not MM:SS.mmm; reading it as 00:00.000");
    }

    let mut editor = open_cue_file(config, &path, duration)?;
    let id = cue_at(&editor, cue)?;
    let (start, end) = editor
        .commit_time_entry(id, bound, &time)
        .map_err(|e| anyhow::anyhow!("Cue {cue} unchanged: {e}"))?;
    save_cue_file(editor.cues().as_slice(), &path)?;

    println!(
        "Cue {cue}: {} --> {}",
        format_time(start),
        format_time(end)
    );
    Ok(())
}
