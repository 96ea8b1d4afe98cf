use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image_diff_core::SearchParams;

use super::search::SearchConfig;
use super::{Config, DEFAULT_OUTPUT, load_or_default, validate_jobs};

/// Values extracted from the CLI that participate in the merge.
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub search: SearchConfig,
}

/// Fully resolved config after CLI > env > file > defaults merge.
#[derive(Debug)]
pub struct ResolvedRunConfig {
    pub params: SearchParams,
    pub output: PathBuf,
}

impl ResolvedRunConfig {
    pub fn new(cli: CliOverrides) -> Result<Self> {
        // 1. File layer
        let file_config = load_or_default(cli.config.as_deref(), Path::new("."))?;

        // 2. Env layer
        let env = env_layer(|key| std::env::var(key).ok())?;

        // 3. Merge
        Self::merge(file_config, env, cli)
    }

    /// CLI > env > file, each layer only overriding what it sets.
    fn merge(file_config: Config, env: SearchConfig, cli: CliOverrides) -> Result<Self> {
        let mut search = file_config.search;
        search.merge(&env);
        search.merge(&cli.search);

        let params = search.params();
        validate_jobs(params.jobs).map_err(|e| anyhow::anyhow!("{e}"))?;

        let output = cli
            .output
            .or(file_config.output.path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        Ok(Self { params, output })
    }
}

/// Read `IMAGE_DIFF_*` variables through `lookup`.
fn env_layer(lookup: impl Fn(&str) -> Option<String>) -> Result<SearchConfig> {
    fn parsed<T: std::str::FromStr>(
        lookup: &impl Fn(&str) -> Option<String>,
        key: &str,
    ) -> Result<Option<T>>
    where
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        lookup(key)
            .map(|v| v.trim().parse::<T>())
            .transpose()
            .with_context(|| format!("{key} must be a non-negative integer"))
    }

    Ok(SearchConfig {
        thresh: parsed(&lookup, "IMAGE_DIFF_THRESH")?,
        range_x: parsed(&lookup, "IMAGE_DIFF_RANGE_X")?,
        range_y: parsed(&lookup, "IMAGE_DIFF_RANGE_Y")?,
        jobs: parsed(&lookup, "IMAGE_DIFF_JOBS")?,
    })
}
