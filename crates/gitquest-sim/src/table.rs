use std::collections::HashMap;

use crate::verbs::{branching, canned, help, history, setup, staging, Handler};

/// One recognized sub-verb.
#[derive(Clone, Copy)]
pub struct Verb {
    pub name: &'static str,
    /// Refused with "not a git repository" until `init` has run.
    pub needs_repo: bool,
    pub run: Handler,
}

const fn verb(name: &'static str, run: Handler) -> Verb {
    Verb {
        name,
        needs_repo: true,
        run,
    }
}

const fn free(name: &'static str, run: Handler) -> Verb {
    Verb {
        name,
        needs_repo: false,
        run,
    }
}

// ── Registry ──

/// Every sub-verb the interpreter accepts, which is also the set of bare
/// words recognized as git commands without a `git` prefix.
pub const VERBS: &[Verb] = &[
    free("init", setup::init),
    verb("config", setup::config),
    verb("status", staging::status),
    verb("add", staging::add),
    verb("commit", history::commit),
    verb("log", history::log),
    verb("branch", branching::branch),
    verb("checkout", branching::checkout),
    verb("merge", branching::merge),
    verb("revert", history::revert),
    verb("reset", history::reset),
    verb("tag", history::tag),
    verb("push", canned::push),
    verb("pull", canned::pull),
    verb("fetch", canned::fetch),
    free("clone", canned::clone),
    verb("remote", canned::remote),
    verb("stash", canned::stash),
    verb("rebase", canned::rebase),
    verb("cherry-pick", canned::cherry_pick),
    verb("blame", canned::blame),
    verb("diff", canned::diff),
    verb("show", canned::show),
    free("help", help::help),
    free("--help", help::help),
    free("version", help::version),
    free("--version", help::version),
    verb("switch", branching::switch),
    verb("restore", canned::restore),
    verb("clean", canned::clean),
    verb("mv", canned::mv),
    verb("rm", staging::rm),
    verb("bisect", canned::bisect),
    verb("reflog", canned::reflog),
    verb("worktree", canned::worktree),
    verb("submodule", canned::submodule),
    verb("notes", canned::notes),
    verb("replace", canned::replace),
    verb("gc", canned::gc),
    verb("fsck", canned::fsck),
    verb("prune", canned::prune),
];

/// Name-indexed view over [`VERBS`], built once per interpreter.
pub struct CommandTable {
    by_name: HashMap<&'static str, Verb>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self {
            by_name: VERBS.iter().map(|v| (v.name, *v)).collect(),
        }
    }

    /// Look up a verb; `name` must already be lower-cased.
    pub fn get(&self, name: &str) -> Option<&Verb> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}
