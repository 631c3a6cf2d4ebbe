use super::{Outcome, VerbResult};
use crate::error::GitError;
use gitquest_core::{GitFile, Repository, Stamp};

/// Content given to files that `add` creates out of nothing.
pub const PLACEHOLDER_CONTENT: &str = "Timeline entry: Reality stabilization initiated...";

const CLEAN_TREE: &str = "nothing to commit, working tree clean";

/// Render the file sections of `git status`.
fn format_file_list(files: &[GitFile]) -> String {
    if files.is_empty() {
        return CLEAN_TREE.to_string();
    }

    let staged: Vec<&GitFile> = files.iter().filter(|f| f.is_staged()).collect();
    let modified: Vec<&GitFile> = files.iter().filter(|f| f.is_modified()).collect();
    let untracked: Vec<&GitFile> = files.iter().filter(|f| f.is_untracked()).collect();

    let mut out = String::new();
    if !staged.is_empty() {
        out.push_str("\nChanges to be committed:\n");
        for f in &staged {
            out.push_str(&format!("  new file:   {}\n", f.name));
        }
    }
    if !modified.is_empty() {
        out.push_str("\nChanges not staged for commit:\n");
        for f in &modified {
            out.push_str(&format!("  modified:   {}\n", f.name));
        }
    }
    if !untracked.is_empty() {
        out.push_str("\nUntracked files:\n");
        for f in &untracked {
            out.push_str(&format!("  {}\n", f.name));
        }
    }
    out
}

pub fn status(_stamp: &mut Stamp, _args: &[String], repo: &Repository) -> VerbResult {
    let mut out = format!("On branch {}\n", repo.current_branch);
    if repo.commits.is_empty() {
        out.push_str("\nNo commits yet\n");
    }
    out.push_str(&format_file_list(&repo.files));
    Ok(Outcome::read(out))
}

fn is_stage_all(arg: &str) -> bool {
    matches!(arg, "." | "-A" | "--all")
}

pub fn add(_stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    if args.is_empty() {
        return Err(GitError::NothingSpecified);
    }

    let mut next = repo.clone();
    for path in args {
        if is_stage_all(path) {
            for f in &mut next.files {
                f.staged = true;
            }
            continue;
        }
        match next.files.iter_mut().find(|f| &f.name == path) {
            Some(existing) => existing.staged = true,
            None => {
                let mut created = GitFile::new(path, PLACEHOLDER_CONTENT);
                created.staged = true;
                next.files.push(created);
            }
        }
    }
    Ok(Outcome::write("", next))
}

/// `git rm [--cached] <file>...`: drop files from the tree (or only unstage with `--cached`).
pub fn rm(_stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    let cached = args.iter().any(|a| a == "--cached");
    let paths: Vec<&String> = args.iter().filter(|a| !a.starts_with('-')).collect();
    if paths.is_empty() {
        return Err(GitError::Usage("usage: git rm [<options>] [--] <file>..."));
    }

    let mut next = repo.clone();
    let mut lines = Vec::with_capacity(paths.len());
    for path in paths {
        let idx = next
            .files
            .iter()
            .position(|f| &f.name == path)
            .ok_or_else(|| GitError::RmNoMatch(path.clone()))?;
        if cached {
            next.files[idx].staged = false;
        } else {
            next.files.remove(idx);
        }
        lines.push(format!("rm '{path}'"));
    }
    Ok(Outcome::write(lines.join("\n"), next))
}
