use crate::achievements::{self, Achievement};
use crate::store::{lock_file, lock_path_for, write_atomic};
use anyhow::{Context, Result};
use gitquest_objectives::Scenario;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::OffsetDateTime;

pub const LEVEL_SCORE: u32 = 100;
pub const ACHIEVEMENT_SCORE: u32 = 50;
pub const COMMAND_SCORE: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelProgress {
    pub id: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub unlocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AchievementState {
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub unlocked_at: Option<OffsetDateTime>,
}

impl AchievementState {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }
}

/// Everything that survives between play sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameProgress {
    pub current_level: u32,
    pub levels: Vec<LevelProgress>,
    pub achievements: Vec<AchievementState>,
    #[serde(default)]
    pub total_score: u32,
    /// Distinct expected commands the player has run successfully.
    #[serde(default)]
    pub completed_commands: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_played_at: OffsetDateTime,
}

impl GameProgress {
    /// Fresh progress: first level unlocked, nothing earned.
    pub fn new(scenarios: &[Scenario]) -> Self {
        let mut ids: Vec<u32> = scenarios.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        let now = OffsetDateTime::now_utc();
        Self {
            current_level: ids.first().copied().unwrap_or(1),
            levels: ids
                .iter()
                .enumerate()
                .map(|(i, id)| LevelProgress {
                    id: *id,
                    completed: false,
                    unlocked: i == 0,
                })
                .collect(),
            achievements: achievements::ACHIEVEMENTS
                .iter()
                .map(|a| AchievementState {
                    id: a.id.to_string(),
                    unlocked_at: None,
                })
                .collect(),
            total_score: 0,
            completed_commands: Vec::new(),
            started_at: now,
            last_played_at: now,
        }
    }

    pub fn level(&self, id: u32) -> Option<&LevelProgress> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn is_unlocked(&self, id: u32) -> bool {
        self.level(id).is_some_and(|l| l.unlocked)
    }

    pub fn is_completed(&self, id: u32) -> bool {
        self.level(id).is_some_and(|l| l.completed)
    }

    /// Make `id` the current level. Locked or unknown levels are refused.
    pub fn start_level(&mut self, id: u32) -> bool {
        if !self.is_unlocked(id) {
            return false;
        }
        self.current_level = id;
        self.last_played_at = OffsetDateTime::now_utc();
        true
    }

    /// First unlocked level after `id`, in id order.
    pub fn next_level(&self, id: u32) -> Option<u32> {
        self.levels
            .iter()
            .filter(|l| l.id > id && l.unlocked)
            .map(|l| l.id)
            .min()
    }

    /// Mark `id` completed, unlock `id + 1` and grant the level's achievement.
    ///
    /// Completing an already completed level changes nothing. Returns the
    /// achievements unlocked by this call.
    pub fn complete_level(&mut self, id: u32) -> Vec<&'static Achievement> {
        let Some(level) = self.levels.iter_mut().find(|l| l.id == id) else {
            return Vec::new();
        };
        if level.completed {
            return Vec::new();
        }
        level.completed = true;
        if let Some(next) = self.levels.iter_mut().find(|l| l.id == id + 1) {
            next.unlocked = true;
        }
        self.total_score += LEVEL_SCORE;
        self.last_played_at = OffsetDateTime::now_utc();
        tracing::info!(level = id, score = self.total_score, "level completed");

        achievements::for_level(id)
            .and_then(|a| self.unlock_achievement(a))
            .into_iter()
            .collect()
    }

    /// Unlock one achievement (+50). Unknown or already unlocked ids return `None`.
    pub fn unlock_achievement(&mut self, id: &str) -> Option<&'static Achievement> {
        let achievement = achievements::find(id)?;
        if self.is_achievement_unlocked(id) {
            return None;
        }
        let now = Some(OffsetDateTime::now_utc());
        match self.achievements.iter_mut().find(|a| a.id == id) {
            Some(state) => state.unlocked_at = now,
            // Saved by an older catalog.
            None => self.achievements.push(AchievementState {
                id: id.to_string(),
                unlocked_at: now,
            }),
        }
        self.total_score += ACHIEVEMENT_SCORE;
        tracing::info!(achievement = id, "achievement unlocked");
        Some(achievement)
    }

    pub fn is_achievement_unlocked(&self, id: &str) -> bool {
        self.achievements
            .iter()
            .any(|a| a.id == id && a.is_unlocked())
    }

    pub fn unlocked_achievements(&self) -> impl Iterator<Item = &'static Achievement> + '_ {
        self.achievements
            .iter()
            .filter(|a| a.is_unlocked())
            .filter_map(|a| achievements::find(&a.id))
    }

    /// Count a distinct command once (+10). Returns whether it was new.
    pub fn record_command(&mut self, command: &str) -> bool {
        if self.completed_commands.iter().any(|c| c == command) {
            return false;
        }
        self.completed_commands.push(command.to_string());
        self.total_score += COMMAND_SCORE;
        true
    }
}

// ── Persistence ──

/// Load progress from disk. Returns None if the file doesn't exist.
pub fn load_progress(path: &Path) -> Result<Option<GameProgress>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading progress: {}", path.display()))?;
    let progress: GameProgress = serde_json::from_str(&content)
        .with_context(|| format!("parsing progress: {}", path.display()))?;
    Ok(Some(progress))
}

/// Save progress atomically under an exclusive lock.
pub fn save_progress(path: &Path, progress: &GameProgress) -> Result<()> {
    let _lock = lock_file(&lock_path_for(path))?;
    let data = serde_json::to_string_pretty(progress)?;
    write_atomic(path, data.as_bytes())
        .with_context(|| format!("saving progress: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "progress saved");
    Ok(())
}

/// Delete saved progress. Returns whether a file was removed.
pub fn reset_progress(path: &Path) -> Result<bool> {
    let _lock = lock_file(&lock_path_for(path))?;
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)
        .with_context(|| format!("removing progress: {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitquest_objectives::builtin_scenarios;

    fn fresh() -> GameProgress {
        GameProgress::new(&builtin_scenarios().unwrap())
    }

    #[test]
    fn new_progress_unlocks_only_first_level() {
        let p = fresh();
        assert_eq!(p.current_level, 1);
        assert_eq!(p.levels.len(), 5);
        assert!(p.is_unlocked(1));
        assert!(!p.is_unlocked(2));
        assert_eq!(p.achievements.len(), 10);
        assert_eq!(p.total_score, 0);
    }

    #[test]
    fn locked_level_cannot_start() {
        let mut p = fresh();
        assert!(!p.start_level(3));
        assert!(!p.start_level(42));
        assert_eq!(p.current_level, 1);
    }

    #[test]
    fn completing_level_scores_and_unlocks() {
        let mut p = fresh();
        let earned = p.complete_level(1);
        assert_eq!(earned.len(), 1);
        assert_eq!(earned[0].id, "first-steps");
        assert!(p.is_completed(1));
        assert!(p.is_unlocked(2));
        assert_eq!(p.total_score, 150);
        assert_eq!(p.next_level(1), Some(2));
        assert!(p.start_level(2));
    }

    #[test]
    fn completing_twice_is_a_noop() {
        let mut p = fresh();
        p.complete_level(1);
        let earned = p.complete_level(1);
        assert!(earned.is_empty());
        assert_eq!(p.total_score, 150);
    }

    #[test]
    fn level_without_achievement() {
        let mut p = fresh();
        assert!(p.complete_level(2).is_empty());
        assert_eq!(p.total_score, 100);
        assert!(p.is_unlocked(3));
    }

    #[test]
    fn achievements_unlock_once() {
        let mut p = fresh();
        assert!(p.unlock_achievement("explorer").is_some());
        assert!(p.unlock_achievement("explorer").is_none());
        assert!(p.unlock_achievement("no-such-badge").is_none());
        assert_eq!(p.total_score, 50);
        assert!(p.is_achievement_unlocked("explorer"));
        assert_eq!(p.unlocked_achievements().count(), 1);
    }

    #[test]
    fn distinct_commands_score_once() {
        let mut p = fresh();
        assert!(p.record_command("git init"));
        assert!(!p.record_command("git init"));
        assert!(p.record_command("git status"));
        assert_eq!(p.total_score, 20);
    }

    #[test]
    fn load_nonexistent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_progress(&dir.path().join("git-quest-progress.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git-quest-progress.json");
        let mut p = fresh();
        p.complete_level(1);
        p.record_command("git init");

        save_progress(&path, &p).unwrap();
        let loaded = load_progress(&path).unwrap().unwrap();
        assert_eq!(loaded.total_score, 160);
        assert!(loaded.is_completed(1));
        assert!(loaded.is_achievement_unlocked("first-steps"));
        assert_eq!(loaded.completed_commands, vec!["git init".to_string()]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git-quest-progress.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_progress(&path).unwrap_err();
        assert!(err.to_string().contains("parsing progress"));
    }

    #[test]
    fn reset_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git-quest-progress.json");
        assert!(!reset_progress(&path).unwrap());
        save_progress(&path, &fresh()).unwrap();
        assert!(reset_progress(&path).unwrap());
        assert!(load_progress(&path).unwrap().is_none());
    }
}
