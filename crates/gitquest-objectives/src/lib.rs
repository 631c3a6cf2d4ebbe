//! Scenario definitions and the objective evaluator.
//!
//! A scenario's completion logic is plain data: an ordered list of weighted
//! rules, loaded from YAML. Adding a level never needs new code.

pub mod catalog;
pub mod check;
pub mod engine;
pub mod parser;
pub mod schema;

pub use catalog::{builtin_evaluator, builtin_scenarios};
pub use engine::{Evaluator, ObjectiveReport, RuleResult, RuleStatus};
pub use parser::{load_scenarios, parse_scenarios};
pub use schema::{CheckSpec, Rule, Scenario};
