//! Core game components
//!
//! The story engine drives the narrator; the transcript records and
//! exports everything shown to the player.

mod engine;
mod transcript;

pub use engine::{Completion, EngineSettings, SessionState, StoryEngine, Submission};
pub use transcript::{default_export_path, DisplayEntry, DisplaySink, ExportOutcome};
