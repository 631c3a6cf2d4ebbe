use thiserror::Error;

/// Every way a sub-verb can refuse to run.
///
/// The `Display` text is exactly what the terminal shows, so the dispatcher
/// can turn an `Err` straight into a failed `CommandResult`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitError {
    #[error("fatal: not a git repository (or any of the parent directories): .git")]
    NotARepository,

    #[error("{0}")]
    Usage(&'static str),

    #[error("For this tutorial, please use --global flag")]
    ConfigNeedsGlobal,

    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    #[error("Nothing specified, nothing added.")]
    NothingSpecified,

    #[error("nothing to commit, working tree clean")]
    NothingToCommit,

    #[error(
        "Please tell me who you are.\n\nRun\n\n  git config --global user.email \"you@example.com\"\n  git config --global user.name \"Your Name\""
    )]
    MissingIdentity,

    #[error("Aborting commit due to empty commit message.")]
    EmptyMessage,

    #[error("fatal: your current branch '{0}' does not have any commits yet")]
    NoCommitsYet(String),

    #[error("fatal: A branch named '{0}' already exists.")]
    BranchExists(String),

    #[error("error: branch '{0}' not found.")]
    BranchNotFound(String),

    #[error("error: Cannot delete branch '{name}' checked out at '{dir}'")]
    CannotDeleteCurrent { name: String, dir: String },

    #[error("error: pathspec '{0}' did not match any file(s) known to git")]
    PathspecNoMatch(String),

    #[error("fatal: pathspec '{0}' did not match any files")]
    RmNoMatch(String),

    #[error("error: switch `{0}' requires a value")]
    MissingSwitchValue(char),

    #[error("merge: {0} - not something we can merge")]
    NotMergeable(String),

    #[error("Already on '{0}'")]
    AlreadyOn(String),

    #[error("fatal: bad object {0}")]
    BadObject(String),

    #[error("git: '{verb}' is not a git command. See 'git --help'.\n\nThe most similar command is\n\tgit {similar}")]
    UnknownVerb { verb: String, similar: &'static str },
}
