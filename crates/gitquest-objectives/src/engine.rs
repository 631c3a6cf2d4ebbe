use crate::check::evaluate;
use crate::schema::Scenario;
use gitquest_core::{CommandRecord, Repository};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Passed,
    Failed,
}

/// Outcome of one rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleResult {
    pub check_type: String,
    pub status: RuleStatus,
    pub weight: u32,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of evaluating every rule of a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveReport {
    pub scenario_id: u32,
    pub complete: bool,
    pub progress: u8,
    pub results: Vec<RuleResult>,
}

impl ObjectiveReport {
    /// Details of required rules that are still failing.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .filter(|r| r.required && r.status == RuleStatus::Failed)
            .filter_map(|r| r.detail.as_deref())
    }
}

/// Objective evaluator: scores a repository and history against scenario rules.
///
/// Unknown scenario ids are never an error: they are incomplete with zero progress.
pub struct Evaluator {
    scenarios: BTreeMap<u32, Scenario>,
}

impl Evaluator {
    pub fn new(scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        Self {
            scenarios: scenarios.into_iter().map(|s| (s.id, s)).collect(),
        }
    }

    pub fn scenario(&self, id: u32) -> Option<&Scenario> {
        self.scenarios.get(&id)
    }

    /// Scenarios in id order.
    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    /// Every required rule holds.
    pub fn is_complete(&self, scenario_id: u32, repo: &Repository, history: &[CommandRecord]) -> bool {
        self.report(scenario_id, repo, history)
            .is_some_and(|r| r.complete)
    }

    /// Sum of satisfied weights, capped at 100.
    pub fn progress(&self, scenario_id: u32, repo: &Repository, history: &[CommandRecord]) -> u8 {
        self.report(scenario_id, repo, history)
            .map_or(0, |r| r.progress)
    }

    /// Evaluate all rules in order. Unlike a check run, evaluation never
    /// short-circuits: every rule contributes to the score.
    pub fn report(
        &self,
        scenario_id: u32,
        repo: &Repository,
        history: &[CommandRecord],
    ) -> Option<ObjectiveReport> {
        let scenario = self.scenarios.get(&scenario_id)?;

        let mut complete = true;
        let mut score: u32 = 0;
        let mut results = Vec::with_capacity(scenario.rules.len());

        for rule in &scenario.rules {
            let output = evaluate(&rule.check, repo, history);
            if output.passed {
                score = score.saturating_add(rule.weight);
            } else if rule.required {
                complete = false;
            }
            results.push(RuleResult {
                check_type: rule.check.type_name().to_string(),
                status: if output.passed {
                    RuleStatus::Passed
                } else {
                    RuleStatus::Failed
                },
                weight: rule.weight,
                required: rule.required,
                detail: output.detail,
            });
        }

        let progress = score.min(100) as u8;
        tracing::trace!(scenario_id, complete, progress, "objectives evaluated");
        Some(ObjectiveReport {
            scenario_id,
            complete,
            progress,
            results,
        })
    }
}
