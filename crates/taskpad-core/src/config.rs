use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tracing::{debug, info, trace, warn};

const RC_ENV_VAR: &str = "TASKPADRC";
const RC_FILE_NAME: &str = ".taskpadrc";
const DEFAULT_DATA_DIR: &str = "~/.taskpad";

/// Key-value configuration loaded from an rc file (`key = value` lines,
/// `#` comments), seeded with defaults and adjustable via overrides.
#[derive(Debug, Clone)]
pub struct Config {
    map: HashMap<String, String>,
    pub loaded_files: Vec<PathBuf>,
}

impl Config {
    #[tracing::instrument(skip(rc_override))]
    pub fn load(rc_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = Config {
            map: HashMap::new(),
            loaded_files: vec![],
        };

        cfg.map
            .insert("data.location".to_string(), DEFAULT_DATA_DIR.to_string());
        cfg.map
            .insert("notifications".to_string(), "on".to_string());

        if let Some(path) = resolve_rc_path(rc_override) {
            info!(rc = %path.display(), "loading rc file");
            cfg.load_file(&path)?;
        } else {
            warn!("no rc file found; using defaults");
        }

        Ok(cfg)
    }

    #[tracing::instrument(skip(self, overrides))]
    pub fn apply_overrides<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in overrides {
            debug!(key = %key, value = %value, "applying override");
            self.map.insert(key, value);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).map(|value| parse_bool(value))
    }

    #[tracing::instrument(skip(self))]
    fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let path = expand_tilde(path);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        self.loaded_files.push(path.clone());

        for (line_num, raw_line) in text.lines().enumerate() {
            let mut line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((before, _)) = line.split_once('#') {
                line = before.trim();
            }

            if line.is_empty() {
                continue;
            }

            let (k, v) = line.split_once('=').ok_or_else(|| {
                anyhow!(
                    "invalid config line {}:{}: {}",
                    path.display(),
                    line_num + 1,
                    raw_line
                )
            })?;

            let key = k.trim().to_string();
            let value = v.trim().to_string();
            trace!(key = %key, value = %value, "loaded config key");
            self.map.insert(key, value);
        }

        Ok(())
    }
}

fn resolve_rc_path(rc_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = rc_override {
        return Some(path.to_path_buf());
    }

    if let Ok(raw) = std::env::var(RC_ENV_VAR) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    let candidate = dirs::home_dir()?.join(RC_FILE_NAME);
    if candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}

/// Data directory precedence: explicit override, then `data.location`, then
/// a home-directory fallback.
#[tracing::instrument(skip(cfg, override_dir))]
pub fn resolve_data_dir(cfg: &Config, override_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let dir = if let Some(path) = override_dir {
        path.to_path_buf()
    } else if let Some(cfg_value) = cfg.get("data.location") {
        expand_tilde(Path::new(&cfg_value))
    } else {
        dirs::home_dir()
            .ok_or_else(|| anyhow!("could not determine home directory"))?
            .join(".taskpad")
    };

    debug!(data_dir = %dir.display(), "resolved data directory");
    Ok(dir)
}

fn expand_tilde(path: &Path) -> PathBuf {
    let Some(raw) = path.to_str() else {
        return path.to_path_buf();
    };

    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }

    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    path.to_path_buf()
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "on" | "yes" | "true" | "1"
    )
}
