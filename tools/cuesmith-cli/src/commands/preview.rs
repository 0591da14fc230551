//! Simulated playback of a cue file.

use std::path::PathBuf;
use std::time::Duration;

use cuesmith_audio_ai::subtitles::format_time;
use cuesmith_common::clock::{RateController, SessionClock};
use cuesmith_common::config::AppConfig;

use super::open_cue_file;

/// Wall-clock interval between playback ticks.
const TICK: Duration = Duration::from_millis(100);

pub async fn run(config: &AppConfig, path: PathBuf, speed: f64) -> anyhow::Result<()> {
    if !(speed.is_finite() && speed > 0.0) {
        anyhow::bail!("Speed must be positive, got {speed}");
    }

    let mut editor = open_cue_file(config, &path, None)?;
    if editor.cues().is_empty() {
        println!("No cues in {}", path.display());
        return Ok(());
    }

    let total = editor.playback().duration.unwrap_or_default();
    println!("Previewing {} ({}) at {speed}x", path.display(), format_time(total));

    if let Some(surface) = editor.surface_mut() {
        surface.play();
    }
    editor.pump_media_events();

    let clock = SessionClock::start();
    let mut status = RateController::new(1);
    let mut ticker = tokio::time::interval(TICK);
    let mut last_active = None;
    while editor.playback().playing {
        ticker.tick().await;
        let position = editor.playback().position + TICK.as_secs_f64() * speed;
        if let Some(surface) = editor.surface_mut() {
            surface.seek(position);
            if position >= total {
                surface.pause();
            }
        }
        editor.pump_media_events();

        if status.should_tick(clock.elapsed_ns()) {
            tracing::debug!(
                position = editor.playback().position,
                wall_secs = clock.elapsed_secs(),
                "Preview position"
            );
        }

        let active = editor.active_cue().map(|c| (c.id, c.text.clone()));
        if active.as_ref().map(|(id, _)| *id) != last_active {
            last_active = active.as_ref().map(|(id, _)| *id);
            match active {
                Some((_, text)) => println!("[{}] {}", format_time(editor.playback().position), text),
                None => println!("[{}] ...", format_time(editor.playback().position)),
            }
        }
    }

    println!("Done.");
    Ok(())
}
