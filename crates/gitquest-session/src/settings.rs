use crate::store::{lock_file, lock_path_for, write_atomic};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub const DELAY_MS: &str = "delay_ms";
pub const AUTO_ADVANCE: &str = "auto_advance";

/// Keys accepted by `config set`.
pub const KNOWN_KEYS: &[&str] = &[DELAY_MS, AUTO_ADVANCE];

/// Presentation settings for the terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Pause before a command's output is shown.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Start the next level as soon as one is completed.
    #[serde(default = "default_auto_advance")]
    pub auto_advance: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            auto_advance: default_auto_advance(),
        }
    }
}

fn default_delay_ms() -> u64 {
    500
}
fn default_auto_advance() -> bool {
    true
}

impl Settings {
    /// Typed view of the config file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let map = read_config(path)?;
        serde_json::from_value(Value::Object(map))
            .with_context(|| format!("invalid settings in {}", path.display()))
    }
}

/// Stored settings as a raw map. A missing file is an empty map; a file
/// holding anything but a JSON object is an error.
pub fn read_config(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    match serde_json::from_str(&content)
        .with_context(|| format!("parsing config: {}", path.display()))?
    {
        Value::Object(map) => Ok(map),
        other => bail!(
            "config {} must hold a JSON object, found {other}",
            path.display()
        ),
    }
}

fn write_config(path: &Path, config: &Map<String, Value>) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    write_atomic(path, json.as_bytes())
}

/// Command-line text as a JSON value: `true`/`false`, a millisecond
/// count, or a plain string (which `Settings` then rejects).
pub fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match s.parse::<u64>() {
            Ok(n) => Value::Number(n.into()),
            Err(_) => Value::String(s.to_string()),
        },
    }
}

/// Set one key and persist. The resulting map must still form valid `Settings`.
pub fn set_value(path: &Path, key: &str, raw: &str) -> Result<Value> {
    if !KNOWN_KEYS.contains(&key) {
        bail!(
            "unknown config key: \"{key}\". Valid keys: {}",
            KNOWN_KEYS.join(", ")
        );
    }
    let _lock = lock_file(&lock_path_for(path))?;
    let mut config = read_config(path)?;
    let value = parse_value(raw);
    config.insert(key.to_string(), value.clone());
    if let Err(e) = serde_json::from_value::<Settings>(Value::Object(config.clone())) {
        bail!("invalid value for {key}: {raw} ({e})");
    }
    write_config(path, &config)?;
    Ok(value)
}

/// Effective value for `key`: the stored one, else its default.
pub fn get_value(path: &Path, key: &str) -> Result<Option<Value>> {
    let stored = read_config(path)?;
    if let Some(v) = stored.get(key) {
        return Ok(Some(v.clone()));
    }
    let defaults = serde_json::to_value(Settings::default())?;
    Ok(defaults.get(key).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_types() {
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("250"), Value::Number(250.into()));
        assert_eq!(parse_value("1.5"), Value::String("1.5".into()));
        assert_eq!(parse_value("-5"), Value::String("-5".into()));
        assert_eq!(parse_value("fast"), Value::String("fast".into()));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.delay_ms, 500);
        assert!(s.auto_advance);
    }

    #[test]
    fn set_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        set_value(&path, "delay_ms", "0").unwrap();
        set_value(&path, "auto_advance", "false").unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.delay_ms, 0);
        assert!(!s.auto_advance);
        assert_eq!(get_value(&path, "delay_ms").unwrap(), Some(Value::Number(0.into())));
    }

    #[test]
    fn get_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(
            get_value(&path, "auto_advance").unwrap(),
            Some(Value::Bool(true))
        );
        assert_eq!(get_value(&path, "nope").unwrap(), None);
    }

    #[test]
    fn non_object_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[500, true]").unwrap();
        let err = Settings::load(&path).unwrap_err();
        assert!(err.to_string().contains("must hold a JSON object"), "{err}");
        assert!(set_value(&path, "delay_ms", "0").is_err());
    }

    #[test]
    fn rejects_unknown_key_and_bad_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert!(set_value(&path, "colour", "red").is_err());
        let err = set_value(&path, "delay_ms", "slow").unwrap_err();
        assert!(err.to_string().contains("invalid value for delay_ms"));
        assert!(!path.exists());
    }
}
