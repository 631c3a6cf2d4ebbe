//! Verbs that only print a fixed message. None of them touches the repository.

use super::{Outcome, VerbResult};
use gitquest_core::{Repository, Stamp};

macro_rules! canned {
    ($($name:ident => $text:expr;)*) => {
        $(
            pub fn $name(_stamp: &mut Stamp, _args: &[String], _repo: &Repository) -> VerbResult {
                Ok(Outcome::read($text))
            }
        )*
    };
}

pub const PUSH_TEXT: &str =
    "Everything up-to-date\n\n\u{1F31F} Timeline successfully pushed to universal repository! \u{1F31F}";

canned! {
    push => PUSH_TEXT;
    pull => "Already up to date.";
    fetch => "From origin\n * [new branch]     main     -> origin/main";
    clone => "Cloning into 'timeline-project'...\n\
              remote: Counting objects: 100, done.\n\
              remote: Compressing objects: 100% (100/100), done.\n\
              remote: Total 100 (delta 0), reused 0 (delta 0), pack-reused 100\n\
              Receiving objects: 100% (100/100), done.\n\
              Resolving deltas: 100% (0/0), done.";
    remote => "origin\thttps://github.com/timeline/universe.git (fetch)\n\
               origin\thttps://github.com/timeline/universe.git (push)";
    stash => "Saved working directory and index state WIP on main: abc1234 Initial commit";
    rebase => "Current branch main is up to date.";
    cherry_pick => "[main abc1234] Cherry-pick commit";
    blame => "abc1234 (Timekeeper 2024-01-01 12:00:00 +0000 1) Timeline entry: Reality stabilization initiated...";
    diff => "diff --git a/timeline.txt b/timeline.txt\n\
             index abc1234..def5678 100644\n\
             --- a/timeline.txt\n\
             +++ b/timeline.txt\n\
             @@ -1,1 +1,1 @@\n\
             -Timeline entry: Reality stabilization initiated...\n\
             +Timeline entry: Reality stabilization completed!";
    show => "commit abc1234\n\
             Author: Timekeeper <timekeeper@universe.com>\n\
             Date:   Mon Jan 1 12:00:00 2024 +0000\n\
             \n    Initial timeline entry\n\
             \n\
             diff --git a/timeline.txt b/timeline.txt\n\
             new file mode 100644\n\
             index 0000000..abc1234\n\
             --- /dev/null\n\
             +++ b/timeline.txt\n\
             @@ -0,0 +1 @@\n\
             +Timeline entry: Reality stabilization initiated...";
    restore => "Restored timeline.txt";
    clean => "Would remove virus.txt\n\nNote: This is a dry run. Use -f to force removal.";
    mv => "Renamed timeline.txt to timeline-backup.txt";
    bisect => "Bisecting: 0 revisions left to test after this (roughly 0 steps)";
    reflog => "abc1234 HEAD@{0}: commit: Initial timeline entry\n\
               abc1234 HEAD@{1}: checkout: moving from feature-fix to main";
    worktree => "/timeline-project  abc1234 [main]";
    submodule => "No submodules found.";
    notes => "No notes found.";
    replace => "No replacements found.";
    gc => "Enumerating objects: 3, done.\n\
           Counting objects: 100% (3/3), done.\n\
           Delta compression using up to 8 threads.\n\
           Compressing objects: 100% (2/2), done.\n\
           Writing objects: 100% (3/3), done.\n\
           Total 3 (delta 0), reused 0 (delta 0), pack-reused 3";
    fsck => "Checking object directories: 100% (256/256), done.\nChecking objects: 100% (3/3), done.";
    prune => "No unreferenced objects found.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_verbs_leave_repository_alone() {
        let repo = Repository::initialized_empty();
        let mut stamp = Stamp::default();
        for handler in [push, pull, fetch, stash, gc, prune] {
            let out = handler(&mut stamp, &[], &repo).unwrap();
            assert!(out.repository.is_none());
            assert!(!out.output.is_empty());
        }
    }

    #[test]
    fn multi_line_texts_keep_their_layout() {
        let mut stamp = Stamp::default();
        let repo = Repository::initialized_empty();
        let show = show(&mut stamp, &[], &repo).unwrap().output;
        assert!(show.starts_with("commit abc1234\nAuthor: Timekeeper"));
        assert!(show.contains("\n\n    Initial timeline entry\n\ndiff --git"));

        let gc = gc(&mut stamp, &[], &repo).unwrap().output;
        assert_eq!(gc.lines().count(), 6);
        assert!(gc.lines().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn push_celebrates() {
        let out = push(&mut Stamp::default(), &[], &Repository::initialized_empty()).unwrap();
        assert!(out.output.starts_with("Everything up-to-date"));
        assert!(out.output.contains("Timeline successfully pushed"));
    }
}
