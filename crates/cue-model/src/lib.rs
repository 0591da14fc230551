//! Cuesmith Cue Model
//!
//! Defines the core data contracts shared by the segmentation engine and
//! the editor:
//! - **Cue:** One timed subtitle entry with a stable id
//! - **CueList:** Cues ordered by start time, with active-cue lookup
//! - **State:** Playback position, selection, and the serializable editor snapshot
//!
//! All times are seconds as `f64` measured from the start of the audio.

pub mod cue;
pub mod state;

pub use cue::*;
pub use state::*;
