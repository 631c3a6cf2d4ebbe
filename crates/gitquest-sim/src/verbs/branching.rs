use super::{Outcome, VerbResult};
use crate::error::GitError;
use gitquest_core::{Branch, Repository, Stamp};

const NULL_HASH: &str = "0000000";

/// Snapshot of the current branch's log, used to seed a new branch.
fn current_commits(repo: &Repository) -> Vec<gitquest_core::Commit> {
    repo.branch(&repo.current_branch)
        .map(|b| b.commits.clone())
        .unwrap_or_default()
}

fn create_branch(repo: &Repository, name: &str) -> Result<Repository, GitError> {
    if repo.has_branch(name) {
        return Err(GitError::BranchExists(name.to_string()));
    }
    let mut next = repo.clone();
    next.branches.push(Branch::new(name, current_commits(repo)));
    Ok(next)
}

fn list_branches(repo: &Repository) -> String {
    let mut out = String::new();
    for b in &repo.branches {
        let marker = if b.current { "* " } else { "  " };
        out.push_str(&format!("{marker}{}\n", b.name));
    }
    out.trim_end().to_string()
}

fn delete_branch(repo: &Repository, name: &str) -> VerbResult {
    let branch = repo
        .branch(name)
        .ok_or_else(|| GitError::BranchNotFound(name.to_string()))?;
    if branch.current || repo.current_branch == name {
        return Err(GitError::CannotDeleteCurrent {
            name: name.to_string(),
            dir: repo.working_directory.clone(),
        });
    }
    let was = branch
        .tip()
        .map(|c| c.hash.clone())
        .unwrap_or_else(|| NULL_HASH.to_string());

    let mut next = repo.clone();
    next.branches.retain(|b| b.name != name);
    Ok(Outcome::write(
        format!("Deleted branch {name} (was {was})."),
        next,
    ))
}

/// `git branch` lists, `git branch <name>` creates, `git branch -d <name>` deletes.
pub fn branch(_stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    let Some(first) = args.first() else {
        return Ok(Outcome::read(list_branches(repo)));
    };

    match first.as_str() {
        "-d" | "-D" | "--delete" => match args.get(1) {
            Some(name) => delete_branch(repo, name),
            None => Err(GitError::Usage("fatal: branch name required")),
        },
        "-l" | "--list" | "-a" | "--all" => Ok(Outcome::read(list_branches(repo))),
        name => Ok(Outcome::write("", create_branch(repo, name)?)),
    }
}

/// `git checkout <branch>` and `git checkout -b <branch>`.
pub fn checkout(_stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    switch_with_flag(args, repo, 'b', "usage: git checkout <branch>")
}

/// `git switch <branch>` and `git switch -c <branch>`.
pub fn switch(_stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    switch_with_flag(args, repo, 'c', "usage: git checkout <branch>")
}

fn switch_with_flag(
    args: &[String],
    repo: &Repository,
    create_flag: char,
    usage: &'static str,
) -> VerbResult {
    let Some(first) = args.first() else {
        return Err(GitError::Usage(usage));
    };

    if first.len() == 2 && first.starts_with('-') && first.ends_with(create_flag) {
        let name = args
            .get(1)
            .ok_or(GitError::MissingSwitchValue(create_flag))?;
        let mut next = create_branch(repo, name)?;
        next.set_current_branch(name);
        return Ok(Outcome::write(
            format!("Switched to a new branch '{name}'"),
            next,
        ));
    }

    if !repo.has_branch(first) {
        return Err(GitError::PathspecNoMatch(first.clone()));
    }
    let mut next = repo.clone();
    next.set_current_branch(first);
    Ok(Outcome::write(format!("Switched to branch '{first}'"), next))
}

/// Bring the source branch's commits into the current branch.
///
/// A commit is adopted when its hash is not already on the current branch;
/// adopted commits are appended, in source order, to the current branch and
/// to the global log. Merging the same branch twice adopts nothing the
/// second time.
pub fn merge(_stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    let name = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .ok_or(GitError::Usage("usage: git merge <branch>"))?;
    let source = repo
        .branch(name)
        .ok_or_else(|| GitError::NotMergeable(name.clone()))?;
    if source.current || repo.current_branch == *name {
        return Err(GitError::AlreadyOn(name.clone()));
    }

    let mut next = repo.clone();
    let current = repo.current_branch.clone();
    if let Some(target) = next.branch_mut(&current) {
        let adopted: Vec<_> = source
            .commits
            .iter()
            .filter(|c| !target.contains(&c.hash))
            .cloned()
            .collect();
        tracing::debug!(source = %name, into = %current, adopted = adopted.len(), "merge");

        target.commits.extend(adopted.iter().cloned());
        next.commits.extend(adopted);
    }

    Ok(Outcome::write(
        "Merge made by the 'recursive' strategy.\n 1 file changed, 1 insertion(+)",
        next,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitquest_core::Commit;
    use std::collections::HashSet;
    use time::OffsetDateTime;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    fn commit(hash: &str) -> Commit {
        Commit {
            hash: hash.into(),
            message: format!("msg {hash}"),
            author: "Timekeeper".into(),
            timestamp: OffsetDateTime::UNIX_EPOCH,
            files: vec![],
        }
    }

    fn repo_with_history(hashes: &[&str]) -> Repository {
        let mut repo = Repository::initialized_empty();
        let commits: Vec<Commit> = hashes.iter().map(|h| commit(h)).collect();
        repo.branches[0].commits = commits.clone();
        repo.commits = commits;
        repo
    }

    fn run(f: super::super::Handler, a: &[&str], repo: &Repository) -> VerbResult {
        f(&mut Stamp::default(), &args(a), repo)
    }

    #[test]
    fn branch_lists_with_marker() {
        let mut repo = Repository::initialized_empty();
        repo.branches.push(Branch::new("dev", vec![]));
        let out = run(branch, &[], &repo).unwrap();
        assert_eq!(out.output, "* main\n  dev");
        assert!(out.repository.is_none());
    }

    #[test]
    fn branch_copies_current_log_as_snapshot() {
        let repo = repo_with_history(&["a1"]);
        let next = run(branch, &["feature"], &repo).unwrap().repository.unwrap();
        assert_eq!(next.branch("feature").unwrap().commits.len(), 1);
        assert!(!next.branch("feature").unwrap().current);

        // Later commits on main do not leak into the snapshot.
        let mut later = next.clone();
        later.branch_mut("main").unwrap().commits.push(commit("b2"));
        assert_eq!(later.branch("feature").unwrap().commits.len(), 1);
    }

    #[test]
    fn branch_rejects_duplicate_name() {
        let repo = Repository::initialized_empty();
        let err = run(branch, &["main"], &repo).unwrap_err();
        assert_eq!(err.to_string(), "fatal: A branch named 'main' already exists.");
    }

    #[test]
    fn branch_delete() {
        let mut repo = repo_with_history(&["a1"]);
        repo.branches.push(Branch::new("old", vec![commit("a1")]));
        let out = run(branch, &["-d", "old"], &repo).unwrap();
        assert_eq!(out.output, "Deleted branch old (was a1).");
        assert!(!out.repository.unwrap().has_branch("old"));

        let err = run(branch, &["-d", "main"], &repo).unwrap_err();
        assert!(err.to_string().contains("Cannot delete branch 'main'"));
        let err = run(branch, &["-D", "ghost"], &repo).unwrap_err();
        assert_eq!(err, GitError::BranchNotFound("ghost".into()));
    }

    #[test]
    fn checkout_moves_current_flag() {
        let mut repo = Repository::initialized_empty();
        repo.branches.push(Branch::new("dev", vec![]));
        let out = run(checkout, &["dev"], &repo).unwrap();
        assert_eq!(out.output, "Switched to branch 'dev'");
        let next = out.repository.unwrap();
        assert_eq!(next.current_branch, "dev");
        assert_eq!(next.branches.iter().filter(|b| b.current).count(), 1);
        assert!(next.is_consistent());
    }

    #[test]
    fn checkout_unknown_branch() {
        let err = run(checkout, &["nope"], &Repository::initialized_empty()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "error: pathspec 'nope' did not match any file(s) known to git"
        );
        let err = run(checkout, &[], &Repository::initialized_empty()).unwrap_err();
        assert_eq!(err.to_string(), "usage: git checkout <branch>");
    }

    #[test]
    fn checkout_b_creates_and_switches() {
        let repo = repo_with_history(&["a1"]);
        let out = run(checkout, &["-b", "hotfix"], &repo).unwrap();
        assert_eq!(out.output, "Switched to a new branch 'hotfix'");
        let next = out.repository.unwrap();
        assert_eq!(next.current_branch, "hotfix");
        assert_eq!(next.branch("hotfix").unwrap().commits.len(), 1);
        assert!(next.is_consistent());

        let err = run(switch, &["-c"], &repo).unwrap_err();
        assert_eq!(err, GitError::MissingSwitchValue('c'));
    }

    #[test]
    fn merge_adopts_missing_commits_once() {
        let mut repo = repo_with_history(&["a1"]);
        let mut feature = Branch::new("feature", vec![commit("a1"), commit("f1")]);
        feature.current = false;
        repo.branches.push(feature);

        let once = run(merge, &["feature"], &repo).unwrap().repository.unwrap();
        let main = once.branch("main").unwrap();
        assert_eq!(
            main.commits.iter().map(|c| c.hash.as_str()).collect::<Vec<_>>(),
            vec!["a1", "f1"]
        );
        assert_eq!(once.commits.len(), 2);

        let twice = run(merge, &["feature"], &once).unwrap().repository.unwrap();
        let hashes: Vec<_> = twice.branch("main").unwrap().commits.iter().map(|c| &c.hash).collect();
        let unique: HashSet<_> = hashes.iter().collect();
        assert_eq!(hashes.len(), unique.len());
        assert_eq!(twice.commits.len(), 2);
    }

    #[test]
    fn merge_rejects_current_and_unknown() {
        let repo = Repository::initialized_empty();
        assert_eq!(
            run(merge, &["main"], &repo).unwrap_err().to_string(),
            "Already on 'main'"
        );
        assert_eq!(
            run(merge, &["ghost"], &repo).unwrap_err().to_string(),
            "merge: ghost - not something we can merge"
        );
        assert_eq!(
            run(merge, &[], &repo).unwrap_err().to_string(),
            "usage: git merge <branch>"
        );
    }
}
