use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Directory every simulated repository lives in unless a scenario says otherwise.
pub const DEFAULT_WORKING_DIRECTORY: &str = "/timeline-project";

/// Branch created by `init`.
pub const DEFAULT_BRANCH: &str = "main";

/// Branch name (e.g. "main", "feature-fix")
pub type BranchName = String;

fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Identity used as commit author.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

impl RepoConfig {
    /// `Name <email>` when both halves of the identity are set.
    pub fn author(&self) -> Option<String> {
        match (self.user_name.as_deref(), self.user_email.as_deref()) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Some(format!("{name} <{email}>"))
            }
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.author().is_some()
    }
}

/// A file in the simulated working tree.
///
/// `staged` and `modified` are independent flags. The status categories are
/// derived from them:
/// - staged: `staged`
/// - modified: `!staged && modified`
/// - untracked: `!staged && !modified`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitFile {
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub staged: bool,
    #[serde(default)]
    pub modified: bool,
}

impl GitFile {
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
            staged: false,
            modified: false,
        }
    }

    pub fn is_staged(&self) -> bool {
        self.staged
    }

    pub fn is_modified(&self) -> bool {
        !self.staged && self.modified
    }

    pub fn is_untracked(&self) -> bool {
        !self.staged && !self.modified
    }
}

/// A single entry in a commit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub message: String,
    pub author: String,
    #[serde(with = "time::serde::rfc3339", default = "now_utc")]
    pub timestamp: OffsetDateTime,
    #[serde(default)]
    pub files: Vec<String>,
}

/// A branch and its own copy of the commit log.
///
/// The list is a snapshot taken when the branch is created; later commits on
/// the source branch never show up here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    pub name: BranchName,
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub current: bool,
}

impl Branch {
    pub fn new(name: &str, commits: Vec<Commit>) -> Self {
        Self {
            name: name.to_string(),
            commits,
            current: false,
        }
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.commits.iter().any(|c| c.hash == hash)
    }

    pub fn tip(&self) -> Option<&Commit> {
        self.commits.last()
    }
}

/// Full version-control state at one instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub initialized: bool,
    #[serde(default = "default_working_directory")]
    pub working_directory: String,
    #[serde(default)]
    pub config: RepoConfig,
    #[serde(default)]
    pub files: Vec<GitFile>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub current_branch: BranchName,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

fn default_working_directory() -> String {
    DEFAULT_WORKING_DIRECTORY.to_string()
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            initialized: false,
            working_directory: default_working_directory(),
            config: RepoConfig::default(),
            files: Vec::new(),
            branches: Vec::new(),
            current_branch: String::new(),
            commits: Vec::new(),
        }
    }
}

impl Repository {
    /// The state right after a first `init`: one current `main` branch, nothing else.
    pub fn initialized_empty() -> Self {
        let mut main = Branch::new(DEFAULT_BRANCH, Vec::new());
        main.current = true;
        Self {
            initialized: true,
            branches: vec![main],
            current_branch: DEFAULT_BRANCH.to_string(),
            ..Self::default()
        }
    }

    pub fn file(&self, name: &str) -> Option<&GitFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    pub fn branch_mut(&mut self, name: &str) -> Option<&mut Branch> {
        self.branches.iter_mut().find(|b| b.name == name)
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.branch(name).is_some()
    }

    pub fn staged_files(&self) -> impl Iterator<Item = &GitFile> {
        self.files.iter().filter(|f| f.is_staged())
    }

    pub fn find_commit(&self, hash: &str) -> Option<&Commit> {
        self.commits.iter().find(|c| c.hash == hash)
    }

    /// Mark `name` as the only current branch.
    pub fn set_current_branch(&mut self, name: &str) {
        for branch in &mut self.branches {
            branch.current = branch.name == name;
        }
        self.current_branch = name.to_string();
    }

    /// Whether the branch bookkeeping matches `initialized`.
    ///
    /// Uninitialized: no branches and an empty `current_branch`.
    /// Initialized: exactly one branch flagged current, named `current_branch`.
    pub fn is_consistent(&self) -> bool {
        if !self.initialized {
            return self.branches.is_empty() && self.current_branch.is_empty();
        }
        let mut current = self.branches.iter().filter(|b| b.current);
        match (current.next(), current.next()) {
            (Some(only), None) => only.name == self.current_branch,
            _ => false,
        }
    }
}

/// What one interpreter call produced.
///
/// `new_repository` is `None` whenever the state did not change, including
/// for successful read-only commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub output: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_repository: Option<Repository>,
}

impl CommandResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: true,
            new_repository: None,
        }
    }

    pub fn ok_with(output: impl Into<String>, repository: Repository) -> Self {
        Self {
            output: output.into(),
            success: true,
            new_repository: Some(repository),
        }
    }

    pub fn fail(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            success: false,
            new_repository: None,
        }
    }
}

/// One line of the append-only command history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandRecord {
    /// The raw line as submitted.
    pub input: String,
    pub output: String,
    pub success: bool,
    #[serde(with = "time::serde::rfc3339", default = "now_utc")]
    pub timestamp: OffsetDateTime,
}

impl CommandRecord {
    pub fn new(input: &str, result: &CommandResult, timestamp: OffsetDateTime) -> Self {
        Self {
            input: input.to_string(),
            output: result.output.clone(),
            success: result.success,
            timestamp,
        }
    }
}
