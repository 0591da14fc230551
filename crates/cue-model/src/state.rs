//! Playback, selection, and snapshot state records.

use serde::{Deserialize, Serialize};

use crate::cue::{CueId, CueList};

/// Playback position as reported by the media surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Current position in seconds. May jump on seek.
    pub position: f64,

    /// Total duration in seconds; unknown until media metadata loads.
    pub duration: Option<f64>,

    pub playing: bool,
}

impl PlaybackState {
    /// Duration if it is known and usable for segmentation.
    pub fn known_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }
}

/// Which cue the user is editing and which one playback is inside.
///
/// The two are independent and frequently differ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected: Option<CueId>,
    pub active: Option<CueId>,
}

/// Serializable record of the whole editor state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSnapshot {
    /// File name of the loaded audio, if any.
    pub source_name: Option<String>,

    pub cues: CueList,
    pub playback: PlaybackState,
    pub selection: SelectionState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::Cue;

    #[test]
    fn test_known_duration_filters_unloaded_metadata() {
        let mut playback = PlaybackState::default();
        assert_eq!(playback.known_duration(), None);
        playback.duration = Some(f64::NAN);
        assert_eq!(playback.known_duration(), None);
        playback.duration = Some(0.0);
        assert_eq!(playback.known_duration(), None);
        playback.duration = Some(12.5);
        assert_eq!(playback.known_duration(), Some(12.5));
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = EditorSnapshot {
            source_name: Some("talk.mp3".to_string()),
            cues: CueList::from(vec![Cue::new(0, 0.0, 5.0, "hello there")]),
            playback: PlaybackState {
                position: 1.25,
                duration: Some(5.0),
                playing: true,
            },
            selection: SelectionState {
                selected: None,
                active: Some(CueId(0)),
            },
        };

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let parsed: EditorSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
