use super::{strip_quotes, Outcome, VerbResult};
use crate::error::GitError;
use gitquest_core::{Branch, Repository, Stamp, DEFAULT_BRANCH};

pub fn init(_stamp: &mut Stamp, _args: &[String], repo: &Repository) -> VerbResult {
    if repo.initialized {
        // Reinit keeps branch structure exactly as it is.
        return Ok(Outcome::read(format!(
            "Reinitialized existing Git repository in {}/.git/",
            repo.working_directory
        )));
    }

    let mut next = repo.clone();
    let mut main = Branch::new(DEFAULT_BRANCH, Vec::new());
    main.current = true;
    next.initialized = true;
    next.branches = vec![main];
    next.current_branch = DEFAULT_BRANCH.to_string();

    Ok(Outcome::write(
        format!(
            "Initialized empty Git repository in {}/.git/",
            next.working_directory
        ),
        next,
    ))
}

/// `git config --global <user.name|user.email> <value>`
///
/// Only the third token is the value; anything after it is ignored.
pub fn config(_stamp: &mut Stamp, args: &[String], repo: &Repository) -> VerbResult {
    if args.len() < 3 {
        return Err(GitError::Usage(
            "usage: git config [<options>] <name> [<value>]",
        ));
    }

    let (flag, key) = (&args[0], &args[1]);
    if flag != "--global" {
        return Err(GitError::ConfigNeedsGlobal);
    }

    let value = strip_quotes(&args[2]);
    let mut next = repo.clone();
    match key.as_str() {
        "user.name" => next.config.user_name = Some(value),
        "user.email" => next.config.user_email = Some(value),
        _ => return Err(GitError::UnknownConfigKey(key.clone())),
    }
    Ok(Outcome::write("", next))
}
