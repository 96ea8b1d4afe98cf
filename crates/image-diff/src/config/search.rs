use image_diff_core::SearchParams;
use serde::{Deserialize, Serialize};

use super::validate_jobs;

fn parse_jobs(s: &str) -> Result<usize, String> {
    let v: usize = s.parse().map_err(|e| format!("{e}"))?;
    validate_jobs(v)
}

/// Search knobs.
///
/// Every field is `Option`: `None` means "use the next layer down".
/// Serves both TOML deserialization (`[search]`) and CLI argument parsing.
#[derive(Clone, Debug, Default, PartialEq, clap::Args, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Color distance at or above which a pixel counts as different [default: 30]
    #[arg(long, short = 't')]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresh: Option<u32>,

    /// Try row offsets from -N to +N [default: 0]
    #[arg(long, short = 'x', value_name = "N")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_x: Option<u32>,

    /// Try column offsets from -N to +N [default: 0]
    #[arg(long, short = 'y', value_name = "N")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_y: Option<u32>,

    /// Number of worker threads [default: 4]
    #[arg(long, short = 'j', value_parser = parse_jobs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl SearchConfig {
    /// Overlay non-None fields from `other` onto self.
    pub fn merge(&mut self, other: &SearchConfig) {
        if other.thresh.is_some() {
            self.thresh = other.thresh;
        }
        if other.range_x.is_some() {
            self.range_x = other.range_x;
        }
        if other.range_y.is_some() {
            self.range_y = other.range_y;
        }
        if other.jobs.is_some() {
            self.jobs = other.jobs;
        }
    }

    /// Fill the gaps with defaults.
    pub fn params(&self) -> SearchParams {
        let defaults = SearchParams::default();
        SearchParams {
            range_x: self.range_x.unwrap_or(defaults.range_x),
            range_y: self.range_y.unwrap_or(defaults.range_y),
            threshold: self.thresh.unwrap_or(defaults.threshold),
            jobs: self.jobs.unwrap_or(defaults.jobs),
        }
    }
}
