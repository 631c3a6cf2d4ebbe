use anyhow::Context;
use gitquest_objectives::{builtin_scenarios, Evaluator, Scenario};
use gitquest_session::achievements::{Achievement, EXPLORER, PERFECTIONIST};
use gitquest_session::store::{config_path, progress_path};
use gitquest_session::{
    hint_for, load_progress, reset_progress, save_progress, GameProgress, Session, Settings,
};
use gitquest_sim::SHELL_HELP;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PROMPT: &str = "timeline-project:~$ ";

const GAME_HELP: &str = "Game commands:
  :hint [command]  - Explain a command, or list every hint for this level
  :objectives      - Show what this level asks for
  :progress        - Show level progress and score
  :restart         - Restart the current level
  :help            - Show this help
  :quit            - Save and leave";

/// What the loop should do with one handled line.
#[derive(Debug, Default)]
pub struct Reply {
    pub text: String,
    /// The text is a command result and gets the presentation delay.
    pub delayed: bool,
    pub quit: bool,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// One play-through: the live session plus saved progress.
pub struct Game {
    evaluator: Evaluator,
    progress: GameProgress,
    progress_path: PathBuf,
    settings: Settings,
    session: Session,
    /// Completion already announced for the current level attempt.
    level_done: bool,
}

impl Game {
    pub fn open(store: &Path, level: Option<u32>, fresh: bool) -> anyhow::Result<Self> {
        let scenarios = builtin_scenarios()?;
        let progress_path = progress_path(store);
        if fresh && reset_progress(&progress_path)? {
            tracing::info!("saved progress discarded");
        }
        let mut progress =
            load_progress(&progress_path)?.unwrap_or_else(|| GameProgress::new(&scenarios));
        let settings = Settings::load(&config_path(store))?;

        if let Some(id) = level {
            if !progress.start_level(id) {
                anyhow::bail!("level {id} is locked or does not exist. Run `gitquest levels` to see what is open.");
            }
        }

        let evaluator = Evaluator::new(scenarios);
        let scenario = evaluator
            .scenario(progress.current_level)
            .with_context(|| format!("no level {} in the catalog", progress.current_level))?;
        let session = Session::for_scenario(scenario);
        Ok(Self {
            evaluator,
            progress,
            progress_path,
            settings,
            session,
            level_done: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn scenario(&self) -> anyhow::Result<&Scenario> {
        let id = self.progress.current_level;
        self.evaluator
            .scenario(id)
            .with_context(|| format!("no level {id} in the catalog"))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        save_progress(&self.progress_path, &self.progress)
    }

    pub fn intro(&self) -> anyhow::Result<String> {
        Ok(format!(
            "Welcome to Git Quest. The timeline is broken and only git can fix it.\n\n{}\nType :help for help.",
            self.level_header()?
        ))
    }

    fn level_header(&self) -> anyhow::Result<String> {
        let scenario = self.scenario()?;
        let mut out = format!("Level {}: {}\n", scenario.id, scenario.title);
        for objective in &scenario.objectives {
            out.push_str(&format!("  - {objective}\n"));
        }
        Ok(out)
    }

    /// Handle one input line: a game command (`:`-prefixed) or a terminal command.
    pub fn handle(&mut self, line: &str) -> anyhow::Result<Reply> {
        let line = line.trim();
        match line.strip_prefix(':') {
            Some(meta) => self.meta(meta),
            None => self.run_command(line),
        }
    }

    fn meta(&mut self, meta: &str) -> anyhow::Result<Reply> {
        let (name, arg) = match meta.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (meta, ""),
        };
        match name {
            "quit" | "q" => {
                self.save()?;
                Ok(Reply {
                    text: "Progress saved. The timeline will wait for you.".into(),
                    quit: true,
                    ..Reply::default()
                })
            }
            "help" => Ok(Reply::say(format!("{SHELL_HELP}\n\n{GAME_HELP}"))),
            "hint" => self.hint(arg),
            "objectives" => self.objectives(),
            "progress" => self.progress_line().map(Reply::say),
            "restart" => {
                let initial = self.scenario()?.initial_repository.clone();
                self.session.reset(initial);
                self.level_done = false;
                Ok(Reply::say(format!("Level restarted.\n\n{}", self.level_header()?)))
            }
            other => Ok(Reply::say(format!(
                "Unknown game command: :{other}. Type :help for the list."
            ))),
        }
    }

    fn hint(&mut self, arg: &str) -> anyhow::Result<Reply> {
        let scenario = self.scenario()?;
        let mut text = if arg.is_empty() {
            scenario
                .hints
                .iter()
                .map(|(cmd, hint)| format!("{cmd}: {hint}"))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            hint_for(scenario, arg)
                .map(str::to_string)
                .unwrap_or_else(|| format!("No hint for '{arg}' in this level."))
        };

        if let Some(a) = self.progress.unlock_achievement(EXPLORER) {
            text.push_str(&announce(a));
            self.save()?;
        }
        Ok(Reply::say(text))
    }

    fn objectives(&self) -> anyhow::Result<Reply> {
        let mut text = self.level_header()?;
        if let Some(report) = self.evaluator.report(
            self.progress.current_level,
            self.session.repository(),
            self.session.history(),
        ) {
            let missing: Vec<&str> = report.missing().collect();
            if !missing.is_empty() {
                text.push_str("\nStill missing:\n");
                for m in missing {
                    text.push_str(&format!("  - {m}\n"));
                }
            }
        }
        Ok(Reply::say(text.trim_end().to_string()))
    }

    fn progress_line(&self) -> anyhow::Result<String> {
        let id = self.progress.current_level;
        let pct = self
            .evaluator
            .progress(id, self.session.repository(), self.session.history());
        Ok(format!(
            "Level {id}: {pct}% complete. Score: {}",
            self.progress.total_score
        ))
    }

    fn run_command(&mut self, line: &str) -> anyhow::Result<Reply> {
        let Some(record) = self.session.submit(line) else {
            return Ok(Reply::default());
        };
        let mut text = record.output.clone();
        let success = record.success;

        let id = self.progress.current_level;
        let mut dirty = false;
        if success {
            let expected = self.scenario()?.expected_commands.clone();
            for cmd in expected.iter().filter(|c| matches_expected(line, c)) {
                dirty |= self.progress.record_command(cmd);
            }
        }

        let complete = self
            .evaluator
            .is_complete(id, self.session.repository(), self.session.history());
        if complete && !self.level_done {
            self.level_done = true;
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(&self.finish_level(id)?);
            dirty = true;
        } else {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&format!("[{}]", self.progress_line()?));
        }

        if dirty {
            self.save()?;
        }
        Ok(Reply {
            text,
            delayed: true,
            quit: false,
        })
    }

    fn finish_level(&mut self, id: u32) -> anyhow::Result<String> {
        let title = self.scenario()?.title.clone();
        let mut earned = self.progress.complete_level(id);
        if self.session.failed_count() == 0 {
            earned.extend(self.progress.unlock_achievement(PERFECTIONIST));
        }

        let mut out = format!("\u{1F389} Level {id} complete: {title}!");
        for a in earned {
            out.push_str(&announce(a));
        }

        match self.progress.next_level(id) {
            Some(next) if self.settings.auto_advance => {
                self.progress.start_level(next);
                let scenario = self
                    .evaluator
                    .scenario(next)
                    .with_context(|| format!("no level {next} in the catalog"))?;
                self.session = Session::for_scenario(scenario);
                self.level_done = false;
                out.push_str(&format!("\n\n{}", self.level_header()?.trim_end()));
            }
            Some(next) => out.push_str(&format!(
                "\nLevel {next} unlocked. Run `gitquest play --level {next}` to continue."
            )),
            None => out.push_str(&format!(
                "\nAll levels complete. The timeline is restored. Final score: {}",
                self.progress.total_score
            )),
        }
        Ok(out)
    }
}

fn announce(a: &Achievement) -> String {
    format!("\nAchievement unlocked: {} {}", a.icon, a.title)
}

/// `line` starts with every word of the expected command.
fn matches_expected(line: &str, expected: &str) -> bool {
    let mut words = line.split_whitespace();
    expected
        .split_whitespace()
        .all(|want| words.next().is_some_and(|got| got.eq_ignore_ascii_case(want)))
}

/// `gitquest play [--level N] [--fresh]`
pub fn execute(store: &Path, level: Option<u32>, fresh: bool) -> anyhow::Result<()> {
    let mut game = Game::open(store, level, fresh)?;
    println!("{}\n", game.intro()?);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            game.save()?;
            println!();
            break;
        }

        let reply = game.handle(&line)?;
        let delay = game.settings().delay_ms;
        if reply.delayed && delay > 0 {
            std::thread::sleep(Duration::from_millis(delay));
        }
        if !reply.text.is_empty() {
            println!("{}", reply.text);
        }
        if reply.quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL_ONE: &[&str] = &[
        "git init",
        "git config --global user.name \"Ada\"",
        "git config --global user.email \"ada@example.com\"",
        "git status",
    ];

    #[test]
    fn expected_command_matching_is_word_wise() {
        assert!(matches_expected("git config --global user.name x", "git config"));
        assert!(matches_expected("GIT init", "git init"));
        assert!(!matches_expected("git initialize", "git init"));
        assert!(!matches_expected("git", "git init"));
    }

    #[test]
    fn completing_level_one_saves_and_advances() {
        let tmp = tempfile::tempdir().unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();

        let mut last = Reply::default();
        for line in LEVEL_ONE {
            last = game.handle(line).unwrap();
            assert!(last.delayed);
        }
        assert!(last.text.contains("Level 1 complete"), "{}", last.text);
        assert!(last.text.contains("First Steps"));
        assert!(last.text.contains("Perfectionist"));
        assert!(last.text.contains("Level 2:"));

        assert_eq!(game.progress().current_level, 2);
        // 3 commands, 1 level, 2 achievements.
        assert_eq!(game.progress().total_score, 30 + 100 + 100);

        let saved = load_progress(&progress_path(tmp.path())).unwrap().unwrap();
        assert!(saved.is_completed(1));
        assert!(saved.is_unlocked(2));
        assert_eq!(saved.current_level, 2);
    }

    #[test]
    fn progress_is_shown_until_completion() {
        let tmp = tempfile::tempdir().unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();
        let reply = game.handle("git init").unwrap();
        assert!(reply.text.ends_with("[Level 1: 25% complete. Score: 10]"), "{}", reply.text);
    }

    #[test]
    fn failed_command_blocks_perfectionist() {
        let tmp = tempfile::tempdir().unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();
        game.handle("git status").unwrap();
        for line in LEVEL_ONE {
            game.handle(line).unwrap();
        }
        assert!(game.progress().is_completed(1));
        assert!(!game.progress().is_achievement_unlocked(PERFECTIONIST));
    }

    #[test]
    fn hint_unlocks_explorer_once() {
        let tmp = tempfile::tempdir().unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();
        let first = game.handle(":hint git init").unwrap();
        assert!(first.text.starts_with("This command creates a new Git repository"));
        assert!(first.text.contains("Achievement unlocked"));
        let second = game.handle(":hint").unwrap();
        assert!(second.text.contains("git status: "));
        assert!(!second.text.contains("Achievement unlocked"));
        assert!(!second.delayed);
    }

    #[test]
    fn restart_resets_repository_and_history() {
        let tmp = tempfile::tempdir().unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();
        game.handle("git init").unwrap();
        assert!(game.session().repository().initialized);
        let reply = game.handle(":restart").unwrap();
        assert!(reply.text.starts_with("Level restarted."));
        assert!(!game.session().repository().initialized);
        assert!(game.session().history().is_empty());
    }

    #[test]
    fn locked_level_is_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Game::open(tmp.path(), Some(4), false).err().unwrap();
        assert!(err.to_string().contains("level 4 is locked"));
    }

    #[test]
    fn without_auto_advance_level_stays() {
        let tmp = tempfile::tempdir().unwrap();
        gitquest_session::settings::set_value(&config_path(tmp.path()), "auto_advance", "false")
            .unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();
        let mut last = Reply::default();
        for line in LEVEL_ONE {
            last = game.handle(line).unwrap();
        }
        assert!(last.text.contains("gitquest play --level 2"));
        assert_eq!(game.progress().current_level, 1);
    }

    #[test]
    fn meta_commands() {
        let tmp = tempfile::tempdir().unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();
        assert!(game.handle(":help").unwrap().text.contains(":objectives"));
        assert!(game.handle(":objectives").unwrap().text.contains("Still missing"));
        assert!(game.handle(":nope").unwrap().text.starts_with("Unknown game command"));
        assert!(game.handle("   ").unwrap().text.is_empty());

        let quit = game.handle(":quit").unwrap();
        assert!(quit.quit);
        assert!(progress_path(tmp.path()).exists());
    }

    #[test]
    fn fresh_discards_saved_progress() {
        let tmp = tempfile::tempdir().unwrap();
        let mut game = Game::open(tmp.path(), None, false).unwrap();
        for line in LEVEL_ONE {
            game.handle(line).unwrap();
        }
        let game = Game::open(tmp.path(), None, true).unwrap();
        assert_eq!(game.progress().current_level, 1);
        assert_eq!(game.progress().total_score, 0);
    }
}
