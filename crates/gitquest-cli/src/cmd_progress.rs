use gitquest_objectives::builtin_scenarios;
use gitquest_session::achievements::ACHIEVEMENTS;
use gitquest_session::store::progress_path;
use gitquest_session::{load_progress, reset_progress, GameProgress};
use std::path::Path;

/// `gitquest progress [--json]`
pub fn show(store: &Path, json: bool) -> anyhow::Result<()> {
    let scenarios = builtin_scenarios()?;
    let progress = load_progress(&progress_path(store))?
        .unwrap_or_else(|| GameProgress::new(&scenarios));

    if json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
        return Ok(());
    }

    print!("{}", summary(&progress));
    println!();
    print!("{}", crate::cmd_levels::render(&scenarios, &progress));
    Ok(())
}

/// Score line and achievement list.
pub fn summary(progress: &GameProgress) -> String {
    let completed = progress.levels.iter().filter(|l| l.completed).count();
    let mut out = format!(
        "Score: {}  Levels: {}/{}  Commands learned: {}\n",
        progress.total_score,
        completed,
        progress.levels.len(),
        progress.completed_commands.len()
    );
    let unlocked: Vec<_> = progress.unlocked_achievements().collect();
    out.push_str(&format!(
        "Achievements: {}/{}\n",
        unlocked.len(),
        ACHIEVEMENTS.len()
    ));
    for a in unlocked {
        out.push_str(&format!("  {} {}: {}\n", a.icon, a.title, a.description));
    }
    out
}

/// `gitquest reset`
pub fn reset(store: &Path) -> anyhow::Result<()> {
    if reset_progress(&progress_path(store))? {
        println!("Progress reset.");
    } else {
        println!("No saved progress.");
    }
    Ok(())
}
