use super::{quoted_value, Outcome, VerbResult};
use crate::error::GitError;
use gitquest_core::{Commit, Repository, Stamp};
use time::macros::format_description;
use time::OffsetDateTime;

/// Author used for reverts when no identity has been configured.
pub const FALLBACK_AUTHOR: &str = "Timekeeper <timekeeper@universe.com>";

fn new_commit(stamp: &mut Stamp, message: String, files: Vec<String>, author: String) -> Commit {
    Commit {
        hash: stamp.hash(),
        message,
        author,
        timestamp: stamp.now(),
        files,
    }
}

/// Append `commit` to the global log and to the current branch's own list.
fn record(repo: &mut Repository, commit: Commit) {
    let current = repo.current_branch.clone();
    if let Some(branch) = repo.branch_mut(&current) {
        branch.commits.push(commit.clone());
    }
    repo.commits.push(commit);
}

/// `Mon Jan 01 2024`
fn format_date(ts: OffsetDateTime) -> String {
    let fmt = format_description!("[weekday repr:short] [month repr:short] [day] [year]");
    ts.format(fmt).unwrap_or_else(|_| ts.date().to_string())
}

fn message_arg(args: &[String]) -> Option<String> {
    let idx = args.iter().position(|a| a == "-m" || a == "--message")?;
    quoted_value(&args[idx + 1..]).filter(|m| !m.trim().is_empty())
}

pub fn commit(stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    let staged: Vec<String> = repo.staged_files().map(|f| f.name.clone()).collect();
    if staged.is_empty() {
        return Err(GitError::NothingToCommit);
    }

    let author = repo.config.author().ok_or(GitError::MissingIdentity)?;
    let message = message_arg(args).ok_or(GitError::EmptyMessage)?;

    let count = staged.len();
    let commit = new_commit(stamp, message.clone(), staged, author);
    let hash = commit.hash.clone();

    let mut next = repo.clone();
    record(&mut next, commit);
    for f in &mut next.files {
        f.staged = false;
        f.modified = false;
    }

    let plural = if count > 1 { "s" } else { "" };
    Ok(Outcome::write(
        format!(
            "[{} {hash}] {message}\n {count} file{plural} changed",
            repo.current_branch
        ),
        next,
    ))
}

pub fn log(_stamp: &mut Stamp, _args: &[String], repo: &Repository) -> VerbResult {
    if repo.commits.is_empty() {
        return Err(GitError::NoCommitsYet(repo.current_branch.clone()));
    }

    let mut out = String::new();
    for c in repo.commits.iter().rev() {
        out.push_str(&format!("commit {}\n", c.hash));
        out.push_str(&format!("Author: {}\n", c.author));
        out.push_str(&format!("Date: {}\n\n", format_date(c.timestamp)));
        out.push_str(&format!("    {}\n\n", c.message));
    }
    Ok(Outcome::read(out.trim_end()))
}

pub fn revert(stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    let target = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .ok_or(GitError::Usage("usage: git revert <commit>"))?;
    let original = repo
        .find_commit(target)
        .ok_or_else(|| GitError::BadObject(target.clone()))?;

    let message = format!("Revert \"{}\"", original.message);
    let author = repo
        .config
        .author()
        .unwrap_or_else(|| FALLBACK_AUTHOR.to_string());
    let commit = new_commit(stamp, message.clone(), original.files.clone(), author);
    let hash = commit.hash.clone();

    let mut next = repo.clone();
    record(&mut next, commit);

    Ok(Outcome::write(
        format!("[{} {hash}] {message}", repo.current_branch),
        next,
    ))
}

/// History is left untouched; only the canned message is shown.
pub fn reset(_stamp: &mut Stamp, _args: &[String], _repo: &Repository) -> VerbResult {
    Ok(Outcome::read("HEAD is now at previous commit"))
}

/// Tags are not tracked; creating one is cosmetic.
pub fn tag(_stamp: &mut Stamp, args: &[String], _repo: &Repository) -> VerbResult {
    match args.iter().find(|a| !a.starts_with('-')) {
        Some(name) => Ok(Outcome::read(format!("Created tag '{name}'"))),
        None => Ok(Outcome::read("")),
    }
}
