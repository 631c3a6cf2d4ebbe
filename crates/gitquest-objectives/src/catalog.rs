use crate::engine::Evaluator;
use crate::parser::parse_scenarios;
use crate::schema::Scenario;
use anyhow::{Context, Result};

const LEVELS_YAML: &str = include_str!("../scenarios/levels.yaml");

/// The levels shipped with the game.
pub fn builtin_scenarios() -> Result<Vec<Scenario>> {
    parse_scenarios(LEVELS_YAML).context("parsing built-in levels")
}

pub fn builtin_evaluator() -> Result<Evaluator> {
    Ok(Evaluator::new(builtin_scenarios()?))
}
