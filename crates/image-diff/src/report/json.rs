use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use image_diff_core::{SearchParams, SearchResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct OffsetSummary {
    pub delta_x: i64,
    pub delta_y: i64,
}

/// Machine-readable outcome of one `compare` run.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub file1: &'a Path,
    pub file2: &'a Path,
    pub width: u32,
    pub height: u32,
    pub threshold: u32,
    pub range_x: u32,
    pub range_y: u32,
    pub offset: OffsetSummary,
    pub diff_pixels: u64,
    pub total_pixels: u64,
    /// `diff_pixels / total_pixels`, 0.0 = identical.
    pub score: f64,
    pub offsets_evaluated: u64,
    pub mask: &'a Path,
    pub elapsed_ms: f64,
}

impl<'a> Summary<'a> {
    pub fn new(
        files: (&'a Path, &'a Path),
        params: &SearchParams,
        result: &SearchResult,
        mask: &'a Path,
        elapsed: Duration,
    ) -> Self {
        let (width, height) = (result.mask.width(), result.mask.height());
        let total_pixels = u64::from(width) * u64::from(height);
        let score = if total_pixels > 0 {
            result.diff_count as f64 / total_pixels as f64
        } else {
            0.0
        };
        Self {
            file1: files.0,
            file2: files.1,
            width,
            height,
            threshold: params.threshold,
            range_x: params.range_x,
            range_y: params.range_y,
            offset: OffsetSummary {
                delta_x: result.offset.delta_x,
                delta_y: result.offset.delta_y,
            },
            diff_pixels: result.diff_count,
            total_pixels,
            score,
            offsets_evaluated: result.offsets_evaluated,
            mask,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }

    pub fn render(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize summary")
    }
}
