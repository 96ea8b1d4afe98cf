pub mod resolve;
pub mod search;
pub mod template;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use self::resolve::{CliOverrides, ResolvedRunConfig};
pub use self::search::SearchConfig;
pub use self::template::{config_file_exists, write_template};

pub(crate) const CONFIG_FILE: &str = "image-diff.toml";
pub(crate) const DEFAULT_OUTPUT: &str = "diff.png";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the difference mask PNG is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn validate_jobs(v: usize) -> Result<usize, String> {
    if v == 0 {
        return Err(format!("jobs must be at least 1, got {v}"));
    }
    Ok(v)
}

pub fn parse(content: &str, origin: &Path) -> Result<Config> {
    let config: Config =
        toml::from_str(content).with_context(|| format!("Failed to parse {}", origin.display()))?;
    if let Some(jobs) = config.search.jobs {
        validate_jobs(jobs).map_err(|e| anyhow::anyhow!("search.{e}"))?;
    }
    Ok(config)
}

pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content, path)
}

/// Load an explicitly named file, or `image-diff.toml` from `dir` if there is one.
/// A missing default file is not an error.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<Config> {
    match explicit {
        Some(path) => load(path),
        None => {
            let path = dir.join(CONFIG_FILE);
            if path.exists() {
                load(&path)
            } else {
                Ok(Config::default())
            }
        }
    }
}
