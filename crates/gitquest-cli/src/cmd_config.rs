use clap::Subcommand;
use gitquest_session::settings::{self, KNOWN_KEYS};
use gitquest_session::store::config_path;
use std::path::Path;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (delay_ms, auto_advance)
        key: String,
        /// Config value (true/false/number)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, store: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(store, &key, &value),
        ConfigCmd::Get { key } => get(store, &key),
        ConfigCmd::List => list(store),
    }
}

// ── Command Implementations ──

/// `gitquest config set <key> <value>`
pub fn set(store: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let stored = settings::set_value(&config_path(store), key, value)?;
    println!("{key} = {stored}");
    Ok(())
}

/// `gitquest config get <key>`
pub fn get(store: &Path, key: &str) -> anyhow::Result<()> {
    match settings::get_value(&config_path(store), key)? {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `gitquest config list`: every known key, stored or default.
pub fn list(store: &Path) -> anyhow::Result<()> {
    let path = config_path(store);
    let stored = settings::read_config(&path)?;
    for key in KNOWN_KEYS {
        if let Some(v) = settings::get_value(&path, key)? {
            let origin = if stored.contains_key(*key) { "" } else { " (default)" };
            println!("{key} = {v}{origin}");
        }
    }
    Ok(())
}
