use gitquest_core::{CommandRecord, CommandResult, Repository};
use gitquest_objectives::Scenario;
use gitquest_sim::Interpreter;
use std::panic::{catch_unwind, AssertUnwindSafe};
use time::OffsetDateTime;

pub const EXECUTION_FAILED: &str = "Error: Command execution failed";

/// One terminal session: the live repository and its command history.
///
/// The session is the only owner of the repository. Each submitted line is
/// run against a borrowed snapshot and the new state is adopted only when
/// the command succeeds.
pub struct Session {
    interpreter: Interpreter,
    repository: Repository,
    history: Vec<CommandRecord>,
    scenario_id: Option<u32>,
}

impl Session {
    pub fn new(repository: Repository) -> Self {
        Self::with_interpreter(Interpreter::new(), repository)
    }

    pub fn with_interpreter(interpreter: Interpreter, repository: Repository) -> Self {
        Self {
            interpreter,
            repository,
            history: Vec::new(),
            scenario_id: None,
        }
    }

    /// Fresh session on the scenario's starting repository.
    pub fn for_scenario(scenario: &Scenario) -> Self {
        let mut session = Self::new(scenario.initial_repository.clone());
        session.scenario_id = Some(scenario.id);
        session
    }

    /// Run one line. Blank lines are ignored and leave no record.
    pub fn submit(&mut self, line: &str) -> Option<&CommandRecord> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let interpreter = &mut self.interpreter;
        let repository = &self.repository;
        let result = catch_unwind(AssertUnwindSafe(|| interpreter.execute_line(line, repository)))
            .unwrap_or_else(|_| {
                tracing::error!(input = line, "command execution panicked");
                CommandResult::fail(EXECUTION_FAILED)
            });

        tracing::debug!(input = line, success = result.success, "command");
        let record = CommandRecord::new(line, &result, OffsetDateTime::now_utc());
        if result.success {
            if let Some(next) = result.new_repository {
                self.repository = next;
            }
        }
        self.history.push(record);
        self.history.last()
    }

    /// Replace the repository and drop the history.
    pub fn reset(&mut self, repository: Repository) {
        self.repository = repository;
        self.history.clear();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn history(&self) -> &[CommandRecord] {
        &self.history
    }

    pub fn scenario_id(&self) -> Option<u32> {
        self.scenario_id
    }

    pub fn failed_count(&self) -> usize {
        self.history.iter().filter(|r| !r.success).count()
    }
}

/// Hint for a typed line: the scenario hint whose key is the longest prefix
/// of the line, also trying the line with a `git ` prefix.
pub fn hint_for<'a>(scenario: &'a Scenario, line: &str) -> Option<&'a str> {
    let line = line.trim();
    let prefixed = format!("git {line}");
    scenario
        .hints
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .filter(|(key, _)| line.starts_with(key.as_str()) || prefixed.starts_with(key.as_str()))
        .max_by_key(|(key, _)| key.len())
        .map(|(_, hint)| hint.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitquest_core::{FixedClock, SequenceHashes};
    use gitquest_objectives::builtin_scenarios;

    fn session() -> Session {
        let interpreter = Interpreter::with_sources(
            SequenceHashes::new(["a1b2c3d", "e4f5a6b"]),
            FixedClock(OffsetDateTime::from_unix_timestamp(1_704_110_400).unwrap()),
        );
        Session::with_interpreter(interpreter, Repository::default())
    }

    #[test]
    fn blank_lines_leave_no_record() {
        let mut s = session();
        assert!(s.submit("").is_none());
        assert!(s.submit("   ").is_none());
        assert!(s.history().is_empty());
    }

    #[test]
    fn success_adopts_new_state() {
        let mut s = session();
        let record = s.submit("git init").unwrap();
        assert!(record.success);
        assert_eq!(record.input, "git init");
        assert!(s.repository().initialized);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn failure_is_recorded_without_state_change() {
        let mut s = session();
        let record = s.submit("git status").unwrap();
        assert!(!record.success);
        assert!(!s.repository().initialized);
        assert_eq!(s.failed_count(), 1);
    }

    #[test]
    fn commit_walkthrough() {
        let mut s = session();
        for line in [
            "git init",
            "git config --global user.name \"Ada\"",
            "git config --global user.email \"ada@example.com\"",
        ] {
            assert!(s.submit(line).unwrap().success, "{line}");
        }
        s.reset(Repository {
            files: vec![gitquest_core::GitFile::new("README.md", "hi")],
            ..s.repository().clone()
        });
        assert!(s.history().is_empty());
        assert!(s.submit("git add README.md").unwrap().success);
        assert!(s.submit("git commit -m \"first\"").unwrap().success);
        assert_eq!(s.repository().commits.len(), 1);
        assert_eq!(s.repository().commits[0].hash, "a1b2c3d");
        assert_eq!(s.failed_count(), 0);
    }

    #[test]
    fn for_scenario_starts_from_initial_repository() {
        let scenarios = builtin_scenarios().unwrap();
        let level3 = scenarios.iter().find(|s| s.id == 3).unwrap();
        let s = Session::for_scenario(level3);
        assert_eq!(s.scenario_id(), Some(3));
        assert_eq!(s.repository(), &level3.initial_repository);
    }

    #[test]
    fn clear_history_keeps_repository() {
        let mut s = session();
        s.submit("git init");
        s.clear_history();
        assert!(s.history().is_empty());
        assert!(s.repository().initialized);
    }

    #[test]
    fn hint_prefers_longest_prefix() {
        let mut scenario = builtin_scenarios().unwrap().remove(0);
        scenario.hints.clear();
        scenario.hints.insert("git init".into(), "init".into());
        scenario.hints.insert("git config".into(), "config".into());
        scenario
            .hints
            .insert("git config --global user.name".into(), "name".into());
        assert_eq!(hint_for(&scenario, "git config --global"), Some("config"));
        assert_eq!(
            hint_for(&scenario, "git config --global user.name \"Ada\""),
            Some("name")
        );
        assert_eq!(hint_for(&scenario, "config user.name"), Some("config"));
        assert_eq!(hint_for(&scenario, "git init"), Some("init"));
        assert_eq!(hint_for(&scenario, "init"), Some("init"));
        assert_eq!(hint_for(&scenario, "ls"), None);
    }
}
