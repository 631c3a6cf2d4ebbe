use anyhow::Context;
use gitquest_core::{CommandResult, Repository};
use gitquest_session::store::write_atomic;
use gitquest_sim::Interpreter;
use std::path::Path;

/// `gitquest exec [--state FILE] -- <line...>`
pub fn execute(state: Option<&Path>, line: &[String]) -> anyhow::Result<()> {
    let result = run_line(state, &line.join(" "))?;
    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

/// Run one line against the state file and write back the new state on success.
pub fn run_line(state: Option<&Path>, line: &str) -> anyhow::Result<CommandResult> {
    let repo = match state {
        Some(path) => load_repository(path)?,
        None => Repository::default(),
    };

    let result = Interpreter::new().execute_line(line, &repo);

    if let (Some(path), Some(next)) = (state, result.new_repository.as_ref()) {
        if result.success {
            let json = serde_json::to_string_pretty(next)?;
            write_atomic(path, json.as_bytes())
                .with_context(|| format!("writing state: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "state written");
        }
    }
    Ok(result)
}

/// Missing file means an uninitialized repository.
fn load_repository(path: &Path) -> anyhow::Result<Repository> {
    if !path.exists() {
        return Ok(Repository::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading state: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing state: {}", path.display()))
}
