use anyhow::Context;
use fs2::FileExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Overrides the store location when set and non-empty.
pub const HOME_ENV: &str = "GITQUEST_HOME";

pub const PROGRESS_FILE: &str = "git-quest-progress.json";
pub const CONFIG_FILE: &str = "config.json";

/// Return the per-user store root.
/// `$GITQUEST_HOME`, else `<data dir>/gitquest` (falls back to `~/.gitquest`).
pub fn store_root() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        PathBuf::from(home)
    } else if let Some(data_dir) = dirs::data_dir() {
        data_dir.join("gitquest")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".gitquest")
    } else {
        PathBuf::from(".gitquest-store")
    }
}

pub fn progress_path(root: &Path) -> PathBuf {
    root.join(PROGRESS_FILE)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Replace `path` with `data` in one step: a temp file in the store
/// directory is renamed over the target, so a reader never sees a torn
/// progress or config file.
pub fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let store = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("no store directory for {}", path.display()))?;
    fs::create_dir_all(store).with_context(|| format!("creating store {}", store.display()))?;
    let mut staging = tempfile::NamedTempFile::new_in(store)
        .with_context(|| format!("creating temp file in {}", store.display()))?;
    staging
        .write_all(data)
        .and_then(|()| staging.flush())
        .with_context(|| format!("writing temp file for {}", path.display()))?;
    staging
        .persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

/// Exclusive hold on one store file. Released on drop.
pub struct LockGuard {
    _file: fs::File,
}

/// Block until this process holds the `.lock` file exclusively.
///
/// Two `gitquest` processes sharing a store (a `play` session and a
/// `config set`, say) serialize their writes through it.
pub fn lock_file(path: &Path) -> anyhow::Result<LockGuard> {
    if let Some(store) = path.parent() {
        fs::create_dir_all(store)
            .with_context(|| format!("creating store {}", store.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)
        .with_context(|| format!("opening lock {}", path.display()))?;
    file.lock_exclusive()
        .with_context(|| format!("locking {}", path.display()))?;
    Ok(LockGuard { _file: file })
}

/// `<file>.lock` next to the file it protects.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}
