//! Plain shell commands available next to git. None of them changes state.

use gitquest_core::Repository;

pub const SHELL_HELP: &str = "Available commands:
  git [command]     - Git version control commands
  ls, dir          - List files
  pwd              - Show current directory
  clear            - Clear screen
  echo [text]      - Display text
  help             - Show this help

Git commands: init, config, status, add, commit, log, branch, checkout, merge, revert, reset, tag, push, pull, fetch, clone, remote, stash, rebase, cherry-pick, blame, diff, show, help, version, switch, restore, clean, mv, rm, bisect, reflog, worktree, submodule, notes, replace, gc, fsck, prune

Type 'git --help' for detailed Git command information.";

const CLEAR_LINES: usize = 50;

type ShellFn = fn(&[String], &Repository) -> String;

fn ls(_args: &[String], repo: &Repository) -> String {
    if repo.files.is_empty() {
        return "No files found.\n".to_string();
    }
    let names: Vec<&str> = repo.files.iter().map(|f| f.name.as_str()).collect();
    format!("{}\n", names.join("  "))
}

fn pwd(_args: &[String], repo: &Repository) -> String {
    repo.working_directory.clone()
}

fn clear(_args: &[String], _repo: &Repository) -> String {
    "\n".repeat(CLEAR_LINES)
}

fn help(_args: &[String], _repo: &Repository) -> String {
    SHELL_HELP.to_string()
}

fn echo(args: &[String], _repo: &Repository) -> String {
    args.join(" ")
}

const SHELL: &[(&str, ShellFn)] = &[
    ("ls", ls),
    ("dir", ls),
    ("pwd", pwd),
    ("clear", clear),
    ("help", help),
    ("echo", echo),
];

/// Run `name` if it is a shell builtin; `name` must already be lower-cased.
pub fn run(name: &str, args: &[String], repo: &Repository) -> Option<String> {
    SHELL
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, f)| f(args, repo))
}
