//! Cuesmith Audio Intelligence
//!
//! Everything between an uploaded audio file and a list of timed cues:
//! - **Transcription:** Hosted speech-to-text returning a flat transcript
//! - **Segmentation:** Transcript-to-cue timing heuristic
//! - **Subtitle Output:** `MM:SS.mmm` cue file generation and parsing
//! - **Progress:** Cosmetic progress estimate while a transcription runs

pub mod progress;
pub mod segmentation;
pub mod subtitles;
pub mod transcription;

pub use progress::TranscriptionProgress;
pub use segmentation::SegmentationEngine;
pub use subtitles::*;
pub use transcription::*;
