//! Lesson progress, XP and achievements
//!
//! Progress is persisted through a [`ProgressStore`] handed to the
//! [`ProgressTracker`]; nothing in this module keeps global state. Two stores
//! ship with the crate:
//!
//! - [`JsonFileProgressStore`]: a JSON document on disk, written atomically
//! - [`MemoryProgressStore`]: an in-process store for tests and dry runs
//!
//! # Example
//!
//! ```
//! use ergoquest_lib::lessons::find_lesson;
//! use ergoquest_lib::progress::{MemoryProgressStore, ProgressTracker};
//!
//! let tracker = ProgressTracker::new(MemoryProgressStore::new());
//! let lesson = find_lesson("basic-transfer").unwrap();
//!
//! let first = tracker.complete_lesson(lesson).unwrap();
//! assert_eq!(first.xp_awarded, lesson.xp);
//!
//! // Repeating a lesson is recorded but earns nothing
//! let again = tracker.complete_lesson(lesson).unwrap();
//! assert_eq!(again.xp_awarded, 0);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use ergoquest_common::error::{progress_error_with_source, with_io_context, QuestError, QuestResult};
use ergoquest_common::logging::{log_progress, LogLevel};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::lessons::{catalogue, Lesson, DEFI_LESSON_ID};

/// XP needed to reach each level, starting at level 1
const LEVEL_THRESHOLDS: [u64; 5] = [0, 100, 300, 600, 1_000];

/// XP per level once the table runs out
const XP_PER_LEVEL_AFTER_TABLE: u64 = 500;

/// Level reached with `xp` experience points
pub fn level_for_xp(xp: u64) -> u32 {
    let table_level = LEVEL_THRESHOLDS.iter().filter(|threshold| xp >= **threshold).count() as u32;
    let last = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    if xp < last {
        return table_level;
    }
    table_level + ((xp - last) / XP_PER_LEVEL_AFTER_TABLE) as u32
}

/// Unlockable achievements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Achievement {
    /// Completed any lesson
    FirstSteps,
    /// Completed the swap lesson
    DefiExplorer,
    /// Reached 500 XP
    Apprentice,
    /// Reached 1000 XP
    Expert,
    /// Completed every lesson in the catalogue
    Graduate,
}

impl Achievement {
    /// Every achievement, in unlock order
    pub const ALL: [Achievement; 5] = [
        Achievement::FirstSteps,
        Achievement::DefiExplorer,
        Achievement::Apprentice,
        Achievement::Expert,
        Achievement::Graduate,
    ];

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            Achievement::FirstSteps => "First Steps",
            Achievement::DefiExplorer => "DeFi Explorer",
            Achievement::Apprentice => "Apprentice (500 XP)",
            Achievement::Expert => "Expert (1000 XP)",
            Achievement::Graduate => "Graduate",
        }
    }

    fn is_earned(&self, state: &ProgressState) -> bool {
        match self {
            Achievement::FirstSteps => !state.completed_lessons.is_empty(),
            Achievement::DefiExplorer => state.completed_lessons.contains(DEFI_LESSON_ID),
            Achievement::Apprentice => state.xp >= 500,
            Achievement::Expert => state.xp >= 1_000,
            Achievement::Graduate => catalogue()
                .iter()
                .all(|lesson| state.completed_lessons.contains(lesson.id)),
        }
    }
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One lesson completion, repeats included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub lesson_id: String,
    pub xp_awarded: u64,
    pub completed_at: DateTime<Utc>,
}

/// Everything persisted about a learner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub completed_lessons: BTreeSet<String>,
    #[serde(default)]
    pub achievements: BTreeSet<Achievement>,
    #[serde(default)]
    pub history: Vec<CompletionRecord>,
}

impl ProgressState {
    /// Current level
    pub fn level(&self) -> u32 {
        level_for_xp(self.xp)
    }

    /// Whether `lesson_id` has been completed at least once
    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id)
    }
}

/// Storage for [`ProgressState`]
pub trait ProgressStore {
    /// Load the stored state, or a fresh one if nothing was stored yet
    fn load(&self) -> QuestResult<ProgressState>;

    /// Replace the stored state
    fn save(&self, state: &ProgressState) -> QuestResult<()>;
}

/// Progress kept as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileProgressStore {
    path: PathBuf,
}

impl JsonFileProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "progress.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ProgressStore for JsonFileProgressStore {
    fn load(&self) -> QuestResult<ProgressState> {
        if !self.path.exists() {
            return Ok(ProgressState::default());
        }

        let content = with_io_context(
            fs::read_to_string(&self.path),
            format!("reading {}", self.path.display()),
        )?;
        serde_json::from_str(&content)
            .map_err(|e| progress_error_with_source(format!("corrupt progress file {}", self.path.display()), e))
    }

    fn save(&self, state: &ProgressState) -> QuestResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                with_io_context(
                    fs::create_dir_all(parent),
                    format!("creating {}", parent.display()),
                )?;
            }
        }

        let content = serde_json::to_string_pretty(state)?;

        // Readers never observe a partially written file
        let temp = self.temp_path();
        with_io_context(fs::write(&temp, content), format!("writing {}", temp.display()))?;
        with_io_context(
            fs::rename(&temp, &self.path),
            format!("replacing {}", self.path.display()),
        )
    }
}

/// Progress kept in memory
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    state: Mutex<ProgressState>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing state
    pub fn with_state(state: ProgressState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> QuestResult<ProgressState> {
        let state = self.state.lock().map_err(|_| QuestError::Progress {
            context: "progress lock poisoned".to_string(),
            source: None,
        })?;
        Ok(state.clone())
    }

    fn save(&self, state: &ProgressState) -> QuestResult<()> {
        let mut stored = self.state.lock().map_err(|_| QuestError::Progress {
            context: "progress lock poisoned".to_string(),
            source: None,
        })?;
        *stored = state.clone();
        Ok(())
    }
}

/// What a single completion changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub lesson_id: String,
    /// Zero when the lesson had been completed before
    pub xp_awarded: u64,
    pub total_xp: u64,
    pub level: u32,
    pub leveled_up: bool,
    pub new_achievements: Vec<Achievement>,
}

/// Awards XP and achievements, persisting through a [`ProgressStore`]
pub struct ProgressTracker<S: ProgressStore> {
    store: S,
}

impl<S: ProgressStore> ProgressTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current persisted state
    pub fn state(&self) -> QuestResult<ProgressState> {
        self.store.load()
    }

    /// Record a completion of `lesson`
    ///
    /// XP is awarded only the first time; every completion is appended to
    /// the history.
    pub fn complete_lesson(&self, lesson: &Lesson) -> QuestResult<CompletionOutcome> {
        let mut state = self.store.load()?;
        let level_before = state.level();

        let first_time = state.completed_lessons.insert(lesson.id.to_string());
        let xp_awarded = if first_time { lesson.xp } else { 0 };
        state.xp += xp_awarded;

        state.history.push(CompletionRecord {
            lesson_id: lesson.id.to_string(),
            xp_awarded,
            completed_at: Utc::now(),
        });

        let mut new_achievements = Vec::new();
        for achievement in Achievement::ALL {
            if !state.achievements.contains(&achievement) && achievement.is_earned(&state) {
                state.achievements.insert(achievement);
                new_achievements.push(achievement);
            }
        }

        self.store.save(&state)?;

        let level = state.level();
        log_progress(
            LogLevel::Info,
            "lesson completed",
            Some(json!({
                "lesson": lesson.id,
                "xp_awarded": xp_awarded,
                "total_xp": state.xp,
                "level": level,
                "new_achievements": new_achievements.iter().map(|a| a.title()).collect::<Vec<_>>(),
            })),
        );

        Ok(CompletionOutcome {
            lesson_id: lesson.id.to_string(),
            xp_awarded,
            total_xp: state.xp,
            level,
            leveled_up: level > level_before,
            new_achievements,
        })
    }

    /// Forget all progress
    pub fn reset(&self) -> QuestResult<()> {
        log_progress(LogLevel::Warn, "progress reset", None);
        self.store.save(&ProgressState::default())
    }
}
