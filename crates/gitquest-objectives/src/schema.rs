use gitquest_core::Repository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level shape of a scenario file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub scenarios: Vec<Scenario>,
}

/// One training level: starting state plus the rules that complete it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub expected_commands: Vec<String>,
    /// Command prefix → explanation shown on `:hint`.
    #[serde(default)]
    pub hints: BTreeMap<String, String>,
    #[serde(default)]
    pub initial_repository: Repository,
    pub rules: Vec<Rule>,
}

impl Scenario {
    /// Sum of rule weights, `None` if it overflows.
    pub fn total_weight(&self) -> Option<u32> {
        self.rules
            .iter()
            .try_fold(0u32, |acc, r| acc.checked_add(r.weight))
    }
}

/// A weighted predicate.
///
/// `weight` feeds the progress score; `required` feeds completion. A rule can
/// carry weight without being required and the other way around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rule {
    #[serde(default)]
    pub weight: u32,
    #[serde(default = "default_required")]
    pub required: bool,
    pub check: CheckSpec,
}

/// What a rule looks at.
///
/// In YAML, checks can be written in short format (`min_commits: 2`)
/// or tagged format (`{ type: min_commits, count: 2 }`).
/// Short format is normalized to tagged during parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckSpec {
    /// Some successful history entry contains every one of these substrings.
    CommandSucceeded { contains: Vec<String> },
    AnyOf { checks: Vec<CheckSpec> },
    AllOf { checks: Vec<CheckSpec> },
    Initialized,
    IdentityConfigured,
    MinCommits { count: usize },
    MinFiles { count: usize },
    MinBranches { count: usize },
    CurrentBranch { name: String },
    /// No file whose name contains `pattern` (staged ones are skipped with `ignore_staged`).
    FileAbsent {
        pattern: String,
        #[serde(default)]
        ignore_staged: bool,
    },
}

impl CheckSpec {
    /// Human-readable type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            CheckSpec::CommandSucceeded { .. } => "command_succeeded",
            CheckSpec::AnyOf { .. } => "any_of",
            CheckSpec::AllOf { .. } => "all_of",
            CheckSpec::Initialized => "initialized",
            CheckSpec::IdentityConfigured => "identity_configured",
            CheckSpec::MinCommits { .. } => "min_commits",
            CheckSpec::MinFiles { .. } => "min_files",
            CheckSpec::MinBranches { .. } => "min_branches",
            CheckSpec::CurrentBranch { .. } => "current_branch",
            CheckSpec::FileAbsent { .. } => "file_absent",
        }
    }
}

fn default_required() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_spec_type_names() {
        let c = CheckSpec::CommandSucceeded {
            contains: vec!["git init".into()],
        };
        assert_eq!(c.type_name(), "command_succeeded");

        let any = CheckSpec::AnyOf {
            checks: vec![CheckSpec::Initialized, c],
        };
        assert_eq!(any.type_name(), "any_of");
    }

    #[test]
    fn rule_defaults() {
        let yaml = "check: { type: initialized }";
        let rule: Rule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.weight, 0);
        assert!(rule.required);
        assert_eq!(rule.check, CheckSpec::Initialized);
    }

    #[test]
    fn scenario_deserialize_minimal() {
        let yaml = r#"
id: 7
title: Sandbox
rules: []
"#;
        let s: Scenario = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.id, 7);
        assert!(!s.initial_repository.initialized);
        assert_eq!(s.initial_repository.working_directory, "/timeline-project");
        assert_eq!(s.total_weight(), Some(0));
    }

    #[test]
    fn file_absent_ignore_staged_defaults_off() {
        let yaml = "type: file_absent\npattern: virus";
        let c: CheckSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            c,
            CheckSpec::FileAbsent {
                pattern: "virus".into(),
                ignore_staged: false
            }
        );
    }
}
