use crate::schema::CheckSpec;
use gitquest_core::{CommandRecord, Repository};

/// Output from a single check evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutput {
    pub passed: bool,
    pub detail: Option<String>,
}

impl CheckOutput {
    pub fn passed() -> Self {
        Self {
            passed: true,
            detail: None,
        }
    }

    pub fn failed(detail: String) -> Self {
        Self {
            passed: false,
            detail: Some(detail),
        }
    }

    fn from_bool(ok: bool, detail: impl FnOnce() -> String) -> Self {
        if ok {
            Self::passed()
        } else {
            Self::failed(detail())
        }
    }
}

/// Evaluate one check. Reads only; never touches its inputs.
pub fn evaluate(spec: &CheckSpec, repo: &Repository, history: &[CommandRecord]) -> CheckOutput {
    match spec {
        CheckSpec::CommandSucceeded { contains } => {
            let hit = history
                .iter()
                .filter(|r| r.success)
                .any(|r| contains.iter().all(|s| r.input.contains(s.as_str())));
            CheckOutput::from_bool(hit, || {
                format!("no successful command containing {}", contains.join(" + "))
            })
        }
        CheckSpec::AnyOf { checks } => {
            let mut misses = Vec::new();
            for c in checks {
                let out = evaluate(c, repo, history);
                if out.passed {
                    return CheckOutput::passed();
                }
                misses.extend(out.detail);
            }
            CheckOutput::failed(format!("none of: {}", misses.join("; ")))
        }
        CheckSpec::AllOf { checks } => {
            for c in checks {
                let out = evaluate(c, repo, history);
                if !out.passed {
                    return out;
                }
            }
            CheckOutput::passed()
        }
        CheckSpec::Initialized => {
            CheckOutput::from_bool(repo.initialized, || "repository not initialized".into())
        }
        CheckSpec::IdentityConfigured => CheckOutput::from_bool(repo.config.is_complete(), || {
            "user.name and user.email not both set".into()
        }),
        CheckSpec::MinCommits { count } => at_least("commits", repo.commits.len(), *count),
        CheckSpec::MinFiles { count } => at_least("files", repo.files.len(), *count),
        CheckSpec::MinBranches { count } => at_least("branches", repo.branches.len(), *count),
        CheckSpec::CurrentBranch { name } => {
            let ok = repo.branches.iter().any(|b| b.name == *name && b.current);
            CheckOutput::from_bool(ok, || {
                format!("on '{}', expected '{name}'", repo.current_branch)
            })
        }
        CheckSpec::FileAbsent {
            pattern,
            ignore_staged,
        } => {
            let offending: Vec<&str> = repo
                .files
                .iter()
                .filter(|f| f.name.contains(pattern.as_str()))
                .filter(|f| !(*ignore_staged && f.staged))
                .map(|f| f.name.as_str())
                .collect();
            CheckOutput::from_bool(offending.is_empty(), || {
                format!("still present: {}", offending.join(", "))
            })
        }
    }
}

fn at_least(what: &str, have: usize, want: usize) -> CheckOutput {
    CheckOutput::from_bool(have >= want, || format!("{have} {what}, need {want}"))
}
