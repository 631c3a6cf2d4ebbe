use gitquest_objectives::{builtin_scenarios, Scenario};
use gitquest_session::store::progress_path;
use gitquest_session::{load_progress, GameProgress};
use std::path::Path;

/// `gitquest levels`
pub fn execute(store: &Path) -> anyhow::Result<()> {
    let scenarios = builtin_scenarios()?;
    let progress = load_progress(&progress_path(store))?
        .unwrap_or_else(|| GameProgress::new(&scenarios));
    print!("{}", render(&scenarios, &progress));
    Ok(())
}

fn marker(progress: &GameProgress, id: u32) -> &'static str {
    if progress.is_completed(id) {
        "[done]  "
    } else if progress.is_unlocked(id) {
        "[open]  "
    } else {
        "[locked]"
    }
}

pub fn render(scenarios: &[Scenario], progress: &GameProgress) -> String {
    let mut out = String::new();
    for s in scenarios {
        let current = if s.id == progress.current_level { "  <- current" } else { "" };
        out.push_str(&format!(
            "{} {}. {}{current}\n",
            marker(progress, s.id),
            s.id,
            s.title
        ));
    }
    out
}
