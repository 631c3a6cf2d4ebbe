use gitquest_core::{Clock, CommandResult, HashSource, Repository, Stamp};

use crate::error::GitError;
use crate::shell;
use crate::table::CommandTable;
use crate::verbs::{help, into_command_result};

/// Turns terminal input into repository transitions.
///
/// The interpreter owns only its hash and clock sources and the verb table;
/// the repository is always passed in by the caller and never retained.
pub struct Interpreter {
    stamp: Stamp,
    verbs: CommandTable,
}

impl Interpreter {
    /// Random hashes and the system clock.
    pub fn new() -> Self {
        Self::from_stamp(Stamp::default())
    }

    /// Inject hash and time sources, for reproducible output.
    pub fn with_sources(hashes: impl HashSource + 'static, clock: impl Clock + 'static) -> Self {
        Self::from_stamp(Stamp::new(hashes, clock))
    }

    fn from_stamp(stamp: Stamp) -> Self {
        Self {
            stamp,
            verbs: CommandTable::new(),
        }
    }

    /// Split a raw line on whitespace and execute it.
    pub fn execute_line(&mut self, line: &str, repository: &Repository) -> CommandResult {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return CommandResult::ok("");
        };
        let args: Vec<String> = parts.map(str::to_string).collect();
        self.execute(command, &args, repository)
    }

    /// Classify `command` and run it against `repository`.
    ///
    /// Never fails: every problem is reported as a result with
    /// `success == false` and the repository left untouched.
    pub fn execute(
        &mut self,
        command: &str,
        args: &[String],
        repository: &Repository,
    ) -> CommandResult {
        let lowered = command.to_lowercase();

        if lowered == "git" {
            tracing::trace!(route = "git", "classify");
            return self.dispatch(args, repository);
        }

        if let Some(rest) = lowered.strip_prefix("git") {
            let rest = rest.trim();
            if !rest.is_empty() {
                tracing::trace!(route = "glued", verb = rest, "classify");
                let mut joined = Vec::with_capacity(args.len() + 1);
                joined.push(rest.to_string());
                joined.extend_from_slice(args);
                return self.dispatch(&joined, repository);
            }
        }

        if self.verbs.contains(&lowered) {
            tracing::trace!(route = "bare", verb = %lowered, "classify");
            let mut joined = Vec::with_capacity(args.len() + 1);
            joined.push(lowered);
            joined.extend_from_slice(args);
            return self.dispatch(&joined, repository);
        }

        if let Some(output) = shell::run(&lowered, args, repository) {
            tracing::trace!(route = "shell", command = %lowered, "classify");
            return CommandResult::ok(output);
        }

        tracing::debug!(command, "command not found");
        CommandResult::fail(format!(
            "Command not found: {command}. Type 'help' for available commands or 'git --help' for Git commands."
        ))
    }

    /// Run a sub-verb; `args[0]` names it.
    fn dispatch(&mut self, args: &[String], repository: &Repository) -> CommandResult {
        let Some((first, rest)) = args.split_first() else {
            return CommandResult::ok(help::USAGE_BANNER);
        };
        let name = first.to_lowercase();

        let result = match self.verbs.get(&name) {
            None => Err(GitError::UnknownVerb {
                similar: help::similar_command(&name),
                verb: name.clone(),
            }),
            Some(verb) if verb.needs_repo && !repository.initialized => {
                Err(GitError::NotARepository)
            }
            Some(verb) => (verb.run)(&mut self.stamp, rest, repository),
        };

        let result = into_command_result(result);
        tracing::debug!(
            verb = %name,
            args = rest.len(),
            success = result.success,
            changed = result.new_repository.is_some(),
            "dispatch"
        );
        result
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
