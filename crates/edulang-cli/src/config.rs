//! Session configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level edulang configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdulangConfig {
    /// Shuffle quizzes in "Test All Quizzes".
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    /// Fixed shuffle seed, for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Per-question timer; overrides the script's `timer`.
    #[serde(default)]
    pub timer_secs: Option<f64>,
    /// Incorrect answers allowed; overrides the script's `incorrect`.
    #[serde(default)]
    pub incorrect_limit: Option<u32>,
}

fn default_shuffle() -> bool {
    true
}

impl Default for EdulangConfig {
    fn default() -> Self {
        Self {
            shuffle: default_shuffle(),
            seed: None,
            timer_secs: None,
            incorrect_limit: None,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `edulang.toml` in the current directory
/// 2. `~/.config/edulang/config.toml`
///
/// Environment variable overrides: `EDULANG_SEED`, `EDULANG_TIMER`.
pub fn load_config_from(path: Option<&Path>) -> Result<EdulangConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("edulang.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<EdulangConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => EdulangConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    Ok(config)
}

fn apply_env_overrides(
    config: &mut EdulangConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(seed) = var("EDULANG_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("EDULANG_SEED is not a valid seed: {seed:?}"))?;
        config.seed = Some(seed);
    }

    if let Some(timer) = var("EDULANG_TIMER") {
        let secs = timer
            .trim()
            .parse::<f64>()
            .with_context(|| format!("EDULANG_TIMER is not a number of seconds: {timer:?}"))?;
        config.timer_secs = Some(secs);
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("edulang"))
}
