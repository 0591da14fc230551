//! Transcript segmentation.
//!
//! The hosted transcription service returns plain text without timestamps.
//! Segmentation groups words into fixed-size windows, estimates a
//! word-length-weighted timing for each window, and then spreads the
//! resulting cues uniformly over the audio duration.
//!
//! The weighted estimate only decides how many windows fit before the
//! estimate runs past the end of the audio; the uniform pass overwrites
//! every window's bounds. Words in windows that do not fit are dropped.
//! Both behaviors are user-visible in exported files and are kept as-is.

use cuesmith_common::config::SegmentationConfig;
use cuesmith_common::error::{CuesmithError, CuesmithResult};
use cuesmith_cue_model::cue::Cue;

/// A word window with its weighted timing estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionalWindow {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Output of the windowing step, before uniform redistribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowPlan {
    pub windows: Vec<ProvisionalWindow>,

    /// Words that fell after the estimated end of the audio.
    pub dropped_words: usize,
}

/// Turns a flat transcript into timed cues.
#[derive(Debug, Clone, Default)]
pub struct SegmentationEngine {
    config: SegmentationConfig,
}

impl SegmentationEngine {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment `transcript` into cues covering `[0, total_duration]`.
    ///
    /// Returns an empty list for a transcript without words. Fails with
    /// [`CuesmithError::InvalidDuration`] when the duration is not yet known
    /// (zero, negative, or NaN).
    pub fn segment(&self, transcript: &str, total_duration: f64) -> CuesmithResult<Vec<Cue>> {
        let plan = self.plan_windows(transcript, total_duration)?;

        if plan.dropped_words > 0 {
            tracing::warn!(
                dropped_words = plan.dropped_words,
                total_duration,
                "Transcript tail does not fit the audio duration and was dropped"
            );
        }

        let mut cues: Vec<Cue> = plan
            .windows
            .into_iter()
            .enumerate()
            .map(|(i, w)| Cue::new(i as u64, w.start, w.end, w.text))
            .collect();

        redistribute(&mut cues, total_duration);

        tracing::info!(cues = cues.len(), total_duration, "Transcript segmented");
        Ok(cues)
    }

    /// Group words into windows and estimate each window's timing.
    pub fn plan_windows(&self, transcript: &str, total_duration: f64) -> CuesmithResult<WindowPlan> {
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(CuesmithError::InvalidDuration {
                duration: total_duration,
            });
        }

        let words: Vec<&str> = transcript.split_whitespace().collect();
        let mut plan = WindowPlan::default();
        let cfg = &self.config;
        let per_cue = cfg.words_per_cue.max(1);

        for (i, window) in words.chunks(per_cue).enumerate() {
            let start = i as f64 * cfg.base_cue_secs;
            if start >= total_duration {
                plan.dropped_words = words.len() - i * per_cue;
                break;
            }

            let total_chars: usize = window.iter().map(|w| w.chars().count()).sum();
            let avg_word_length = total_chars as f64 / window.len() as f64;
            let multiplier = (avg_word_length / cfg.avg_word_length_divisor)
                .clamp(cfg.min_duration_multiplier, cfg.max_duration_multiplier);
            let duration = (cfg.base_cue_secs * multiplier).min(total_duration - start);
            let end = (start + duration).min(total_duration);

            tracing::debug!(window = i, start, end, multiplier, "Provisional cue window");

            plan.windows.push(ProvisionalWindow {
                start,
                end,
                text: window.join(" "),
            });
        }

        Ok(plan)
    }
}

/// Overwrite cue bounds with a uniform partition of `[0, total_duration]`.
///
/// A pure function of the cue count and the duration, so applying it twice
/// yields identical bounds.
pub fn redistribute(cues: &mut [Cue], total_duration: f64) {
    let n = cues.len();
    if n == 0 {
        return;
    }
    let span = total_duration / n as f64;
    for (k, cue) in cues.iter_mut().enumerate() {
        cue.start = k as f64 * span;
        cue.end = ((k + 1) as f64 * span).min(total_duration);
    }
    // Guard against float drift so the list always ends on the duration.
    if let Some(last) = cues.last_mut() {
        last.end = total_duration;
    }
}
