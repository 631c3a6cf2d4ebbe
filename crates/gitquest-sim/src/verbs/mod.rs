//! Sub-verb handlers.
//!
//! Every handler has the same shape, `(stamp, args, repository) -> VerbResult`,
//! so the dispatcher can hold them in one table. Handlers never mutate the
//! repository they are given: a state change is a cloned and edited value
//! returned inside the `Outcome`.

pub mod branching;
pub mod canned;
pub mod help;
pub mod history;
pub mod setup;
pub mod staging;

use crate::error::GitError;
use gitquest_core::{CommandResult, Repository, Stamp};

/// Successful handler output plus the replacement state, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub output: String,
    pub repository: Option<Repository>,
}

impl Outcome {
    /// Output only; the repository is unchanged.
    pub fn read(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            repository: None,
        }
    }

    pub fn write(output: impl Into<String>, repository: Repository) -> Self {
        Self {
            output: output.into(),
            repository: Some(repository),
        }
    }
}

pub type VerbResult = Result<Outcome, GitError>;

pub type Handler = fn(&mut Stamp, &[String], &Repository) -> VerbResult;

impl From<Outcome> for CommandResult {
    fn from(outcome: Outcome) -> Self {
        match outcome.repository {
            Some(repo) => CommandResult::ok_with(outcome.output, repo),
            None => CommandResult::ok(outcome.output),
        }
    }
}

pub fn into_command_result(result: VerbResult) -> CommandResult {
    match result {
        Ok(outcome) => outcome.into(),
        Err(e) => CommandResult::fail(e.to_string()),
    }
}

/// Remove every double quote, as the terminal does for config values and messages.
pub(crate) fn strip_quotes(s: &str) -> String {
    s.replace('"', "")
}

/// Read a possibly quoted value starting at `args[0]`.
///
/// An opening `"` or `'` extends the value to the token that closes it;
/// otherwise the value is the single token. Returns the unquoted text.
pub(crate) fn quoted_value(args: &[String]) -> Option<String> {
    let first = args.first()?;
    let quote = first.chars().next().filter(|c| *c == '"' || *c == '\'');

    let joined = match quote {
        Some(q) => {
            let mut parts = Vec::new();
            for (i, token) in args.iter().enumerate() {
                parts.push(token.as_str());
                let closes = if i == 0 {
                    token.len() > 1 && token.ends_with(q)
                } else {
                    token.ends_with(q)
                };
                if closes {
                    break;
                }
            }
            let joined = parts.join(" ");
            if q == '\'' {
                joined.trim_matches('\'').to_string()
            } else {
                joined
            }
        }
        None => first.clone(),
    };

    Some(strip_quotes(&joined))
}
