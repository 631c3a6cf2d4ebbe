use crate::schema::{CheckSpec, Scenario, ScenarioFile};
use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Load and validate scenarios from a YAML file.
pub fn load_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_scenarios(&content).with_context(|| format!("loading {}", path.display()))
}

/// Parse and validate scenarios from a YAML string.
pub fn parse_scenarios(yaml: &str) -> Result<Vec<Scenario>> {
    let mut raw: Value = serde_yaml::from_str(yaml).context("invalid YAML syntax")?;

    normalize_rules(&mut raw)?;

    let file: ScenarioFile =
        serde_yaml::from_value(raw).context("scenario schema validation failed")?;

    validate_scenarios(&file.scenarios)?;
    tracing::debug!(count = file.scenarios.len(), "scenarios parsed");
    Ok(file.scenarios)
}

fn key(s: &str) -> Value {
    Value::String(s.into())
}

/// Rewrite every short-format `check` under `scenarios[*].rules[*]`.
fn normalize_rules(raw: &mut Value) -> Result<()> {
    let scenarios = match raw.get_mut("scenarios") {
        Some(Value::Sequence(seq)) => seq,
        _ => return Ok(()),
    };

    for scenario in scenarios.iter_mut() {
        let rules = match scenario.get_mut("rules") {
            Some(Value::Sequence(seq)) => seq,
            _ => continue,
        };
        for rule in rules.iter_mut() {
            if let Some(check) = rule.get_mut("check") {
                normalize_check(check)?;
            }
        }
    }
    Ok(())
}

/// Normalize one check in place, recursing into `any_of` / `all_of`.
///
/// Short: `min_commits: 2`
/// Long:  `{ type: min_commits, count: 2 }`
fn normalize_check(check: &mut Value) -> Result<()> {
    let map = match check.as_mapping() {
        Some(m) => m,
        None => bail!("check must be a mapping, got: {check:?}"),
    };

    if map.contains_key(key("type")) {
        if let Some(Value::Sequence(nested)) = check.get_mut("checks") {
            for c in nested.iter_mut() {
                normalize_check(c)?;
            }
        }
        return Ok(());
    }

    if map.len() != 1 {
        bail!(
            "short-format check must have exactly one key, got {}",
            map.len()
        );
    }

    let Some((k, value)) = map.iter().next() else {
        bail!("short-format check is empty");
    };
    let type_name = k
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("check key must be a string"))?
        .to_string();
    let value = value.clone();

    let mut out = Mapping::new();
    out.insert(key("type"), key(&type_name));

    match type_name.as_str() {
        "command_succeeded" => {
            let contains = match value {
                Value::String(s) => Value::Sequence(vec![Value::String(s)]),
                Value::Sequence(seq) => Value::Sequence(seq),
                _ => bail!("command_succeeded value must be a string or a list of strings"),
            };
            out.insert(key("contains"), contains);
        }
        "min_commits" | "min_files" | "min_branches" => {
            let count = value
                .as_u64()
                .ok_or_else(|| anyhow::anyhow!("{type_name} value must be a non-negative integer"))?;
            out.insert(key("count"), Value::Number(count.into()));
        }
        "initialized" | "identity_configured" => {
            // `initialized: true` is the only meaningful short form.
            if value.as_bool() != Some(true) {
                bail!("{type_name} short form only accepts `true`");
            }
        }
        "current_branch" => {
            let name = value
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("current_branch value must be a string"))?;
            out.insert(key("name"), key(name));
        }
        "file_absent" => {
            if let Some(m) = value.as_mapping() {
                for (k, v) in m {
                    out.insert(k.clone(), v.clone());
                }
            } else {
                let pattern = value
                    .as_str()
                    .ok_or_else(|| anyhow::anyhow!("file_absent value must be string or mapping"))?;
                out.insert(key("pattern"), key(pattern));
            }
        }
        "any_of" | "all_of" => {
            let Value::Sequence(mut nested) = value else {
                bail!("{type_name} value must be a list of checks");
            };
            for c in nested.iter_mut() {
                normalize_check(c)?;
            }
            out.insert(key("checks"), Value::Sequence(nested));
        }
        other => {
            bail!(
                "unknown check type: \"{other}\". Valid types: command_succeeded, any_of, all_of, \
                 initialized, identity_configured, min_commits, min_files, min_branches, \
                 current_branch, file_absent"
            );
        }
    }

    *check = Value::Mapping(out);
    Ok(())
}

/// Validate constraints that can't be expressed in serde.
fn validate_scenarios(scenarios: &[Scenario]) -> Result<()> {
    let mut seen_ids = std::collections::HashSet::new();
    for scenario in scenarios {
        // Rule 1: ids are positive and unique
        if scenario.id == 0 {
            bail!("scenario \"{}\" must have a non-zero id", scenario.title);
        }
        if !seen_ids.insert(scenario.id) {
            bail!("duplicate scenario id: {}", scenario.id);
        }

        // Rule 2: weights fit in a percentage
        let Some(total) = scenario.total_weight() else {
            bail!("scenario {} rule weights overflow", scenario.id);
        };
        if total > 100 {
            bail!(
                "scenario {} rule weights sum to {total}, must be at most 100",
                scenario.id
            );
        }

        // Rule 3: composite checks are non-empty
        for rule in &scenario.rules {
            validate_check(scenario.id, &rule.check)?;
        }
    }
    Ok(())
}

fn validate_check(id: u32, check: &CheckSpec) -> Result<()> {
    match check {
        CheckSpec::AnyOf { checks } | CheckSpec::AllOf { checks } => {
            if checks.is_empty() {
                bail!("scenario {id}: {} needs at least one check", check.type_name());
            }
            for c in checks {
                validate_check(id, c)?;
            }
        }
        CheckSpec::CommandSucceeded { contains } if contains.is_empty() => {
            bail!("scenario {id}: command_succeeded needs at least one substring");
        }
        _ => {}
    }
    Ok(())
}
