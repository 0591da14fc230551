//! Single-step adjustment of one cue bound.
//!
//! A nudged start stays within `[0, end - min_gap]`; a nudged end stays
//! within `[start + min_gap, total_duration]`. Neighboring cues are not
//! consulted, so nudging can create overlaps.
//!
//! Both ranges are inclusive: an end may land exactly on `start + min_gap`.

use cuesmith_cue_model::cue::{Cue, TimeBound};

/// Compute the `(start, end)` pair after moving `bound` by `delta` seconds.
///
/// Returns `None` when the allowed range for `bound` is empty, e.g. an end
/// nudge on a cue that starts less than `min_gap` before the media end.
/// When `total_duration` is unknown the end has no upper clamp.
pub fn nudge_bound(
    cue: &Cue,
    bound: TimeBound,
    delta: f64,
    total_duration: Option<f64>,
    min_gap: f64,
) -> Option<(f64, f64)> {
    match bound {
        TimeBound::Start => {
            let upper = cue.end - min_gap;
            if !(upper >= 0.0) {
                return None;
            }
            Some(((cue.start + delta).max(0.0).min(upper), cue.end))
        }
        TimeBound::End => {
            let lower = cue.start + min_gap;
            let end = match total_duration {
                Some(total) if lower > total => return None,
                Some(total) => (cue.end + delta).max(lower).min(total),
                None => (cue.end + delta).max(lower),
            };
            Some((cue.start, end))
        }
    }
}
