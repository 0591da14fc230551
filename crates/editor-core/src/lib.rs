//! Cuesmith Editor Core
//!
//! The state side of the editor:
//! - **Store:** Cue list, selection, text and timing edits
//! - **Nudge:** Clamped single-step adjustments of a cue bound
//! - **Media / Auth / Export:** Contracts for the collaborators around the editor
//! - **Controller:** Single owner of the editor state; every command goes through it
//!
//! There is no I/O here apart from what the collaborators do.

pub mod auth;
pub mod controller;
pub mod export;
pub mod media;
pub mod nudge;
pub mod store;

pub use controller::EditorController;
pub use store::CueStore;
