use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use image_diff_core::search;
use tracing::info;

use crate::config::ResolvedRunConfig;
use crate::input;
use crate::output;
use crate::report::json::Summary;
use crate::report::terminal::{self, ProgressBar};

/// `image-diff compare` — load, align, write the mask, report.
/// Returns exit code: 0 = no differing pixels at the best offset, 1 otherwise.
pub fn compare(
    config: ResolvedRunConfig,
    file1: &Path,
    file2: &Path,
    assume_yes: bool,
    json: bool,
) -> Result<i32> {
    if !json {
        terminal::print_banner();
    }

    let image1 = input::load(file1)?;
    let image2 = input::load(file2)?;
    let image2 = input::reconcile_sizes(
        &image1,
        image2,
        assume_yes,
        &mut std::io::stdin().lock(),
        &mut std::io::stderr(),
    )?;

    let params = config.params;
    info!(
        width = image1.width(),
        height = image1.height(),
        range_x = params.range_x,
        range_y = params.range_y,
        threshold = params.threshold,
        jobs = params.jobs,
        "searching"
    );

    let start = Instant::now();
    let mut bar = ProgressBar::new(std::io::stderr());
    let outcome = search(&image1, &image2, params, |p| bar.update(p));
    let result = outcome.context("alignment search failed")?;
    bar.finish();
    let elapsed = start.elapsed();

    output::write_mask(&result.mask, &config.output)?;
    info!(
        offset = %result.offset,
        diff_pixels = result.diff_count,
        elapsed_ms = elapsed.as_millis() as u64,
        "search finished"
    );

    if json {
        let summary = Summary::new((file1, file2), &params, &result, &config.output, elapsed);
        println!("{}", summary.render()?);
    } else {
        terminal::print_summary(&result, &config.output, elapsed);
    }

    Ok(if result.diff_count == 0 { 0 } else { 1 })
}
