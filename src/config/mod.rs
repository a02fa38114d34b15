use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use toml::Value;

use crate::nav::ViewMode;

const KNOWN_KEYS: &[&str] = &["view_mode"];

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub view_mode: Option<ViewMode>,
}

impl AppConfig {
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLoadOutcome {
    pub config: Option<AppConfig>,
    pub warnings: Vec<String>,
}

const CONFIG_ENV: &str = "DIFFWALK_CONFIG";

/// Where the config file lives: `$DIFFWALK_CONFIG` if set, otherwise
/// `diffwalk/config.toml` under the XDG config directory.
pub fn config_path() -> Result<PathBuf> {
    resolve_config_path(
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn config_path_hint() -> &'static str {
    "$DIFFWALK_CONFIG, or $XDG_CONFIG_HOME/diffwalk/config.toml (default: ~/.config/diffwalk/config.toml)"
}

fn resolve_config_path(
    explicit: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();

    if let Some(path) = explicit.filter(non_empty) {
        return Ok(path);
    }
    if let Some(base) = xdg_config_home.filter(non_empty) {
        return Ok(base.join("diffwalk").join("config.toml"));
    }

    let home = home
        .filter(non_empty)
        .ok_or_else(|| anyhow!("Could not determine HOME for config directory"))?;
    Ok(home.join(".config").join("diffwalk").join("config.toml"))
}

pub fn load_config() -> Result<ConfigLoadOutcome> {
    let path = config_path()?;
    load_config_from_path(&path)
}

pub fn load_config_from_path(path: &Path) -> Result<ConfigLoadOutcome> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ConfigLoadOutcome::default()),
        Err(err) => return Err(err.into()),
    };

    let value: Value = toml::from_str(&contents)?;
    let table = value
        .as_table()
        .ok_or_else(|| anyhow!("Config root must be a TOML table"))?;

    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    if let Some(view_mode) = table.get("view_mode") {
        match view_mode.as_str().map(ViewMode::parse) {
            Some(Some(mode)) => config.view_mode = Some(mode),
            Some(None) => warnings.push(format!(
                "Warning: Unknown view_mode {view_mode}; expected \"inline\" or \"side-by-side\""
            )),
            None => warnings
                .push("Warning: Config key 'view_mode' must be a string; ignoring value".to_string()),
        }
    }

    for key in table.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warnings.push(format!("Warning: Unknown config key '{key}', ignoring"));
        }
    }

    Ok(ConfigLoadOutcome {
        config: Some(config),
        warnings,
    })
}
