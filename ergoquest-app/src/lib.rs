//! ErgoQuest application library
//!
//! The pieces of the `ergoquest` binary that are worth testing on their own:
//!
//! - `lessons`: the lesson catalogue and the scenarios behind each lesson
//! - `progress`: XP, levels and achievements behind a pluggable store
//! - `paths`: platform default locations for config and progress files

pub mod lessons;
pub mod paths;
pub mod progress;

pub use lessons::{catalogue, find_lesson, run_lesson, Lesson, LessonReport, LessonSettings};
pub use progress::{
    level_for_xp, Achievement, CompletionOutcome, JsonFileProgressStore, MemoryProgressStore, ProgressState,
    ProgressStore, ProgressTracker,
};
