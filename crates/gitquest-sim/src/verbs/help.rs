use super::{Outcome, VerbResult};
use gitquest_core::{Repository, Stamp};

pub const USAGE_BANNER: &str = "usage: git [--version] [--help] [-C <path>] [-c <name>=<value>]
           [--exec-path[=<path>]] [--html-path] [--man-path] [--info-path]
           [-p | --paginate | -P | --no-pager] [--no-replace-objects] [--bare]
           [--git-dir=<path>] [--work-tree=<path>] [--namespace=<name>]
           <command> [<args>]

These are common Git commands used in various situations:

start a working area (see also: git help tutorial)
   clone     Clone a repository into a new directory
   init      Create an empty Git repository or reinitialize an existing one

work on the current change (see also: git help everyday)
   add       Add file contents to the index
   mv        Move or rename a file, a directory, or a symlink
   reset     Reset current HEAD to the specified state
   rm        Remove files from the working tree and from the index

examine the history and state (see also: git help revisions)
   bisect    Use binary search to find the commit that introduced a bug
   grep      Print lines matching a pattern
   log       Show commit logs
   show      Show various types of objects
   status    Show the working tree status

grow, mark and tweak your common history
   branch    List, create, or delete branches
   checkout  Switch branches or restore working tree files
   commit    Record changes to the repository
   diff      Show changes between commits, commit and working tree, etc
   merge     Join two or more development histories together
   rebase    Reapply commits on top of another base tip
   tag       Create, list, delete or verify a tag object signed with GPG";

pub const VERSION: &str = "git version 2.39.0";

/// Verbs offered as suggestions for a mistyped sub-verb, in priority order.
const SUGGESTIONS: &[&str] = &[
    "init", "config", "status", "add", "commit", "log", "branch", "checkout", "merge",
];

/// First suggestion that is a prefix of `verb` or has `verb` as a prefix.
pub fn similar_command(verb: &str) -> &'static str {
    SUGGESTIONS
        .iter()
        .find(|s| s.starts_with(verb) || verb.starts_with(*s))
        .copied()
        .unwrap_or("help")
}

pub fn help(_stamp: &mut Stamp, _args: &[String], _repo: &Repository) -> VerbResult {
    Ok(Outcome::read(USAGE_BANNER))
}

pub fn version(_stamp: &mut Stamp, _args: &[String], _repo: &Repository) -> VerbResult {
    Ok(Outcome::read(VERSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similar_matches_prefix_both_ways() {
        assert_eq!(similar_command("comm"), "commit");
        assert_eq!(similar_command("commitx"), "commit");
        assert_eq!(similar_command("stat"), "status");
        assert_eq!(similar_command("xyz"), "help");
    }

    #[test]
    fn empty_verb_matches_first_suggestion() {
        assert_eq!(similar_command(""), "init");
    }

    #[test]
    fn banner_lists_common_commands() {
        assert!(USAGE_BANNER.starts_with("usage: git [--version]"));
        assert!(USAGE_BANNER.ends_with("signed with GPG"));
        assert!(USAGE_BANNER.contains("\n   merge     Join two or more"));
    }
}
