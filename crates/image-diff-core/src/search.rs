use image::RgbImage;
use rayon::prelude::*;
use tracing::{debug, debug_span};

use crate::distance::{RangeTally, evaluate};
use crate::error::SearchError;
use crate::mask::{DiffMask, Offset, offsets};
use crate::partition::partition;

/// Knobs for one alignment search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Offsets `-range_x..=range_x` are tried along rows.
    pub range_x: u32,
    /// Offsets `-range_y..=range_y` are tried along columns.
    pub range_y: u32,
    /// Minimum color distance for a pixel to count as different.
    pub threshold: u32,
    /// Worker threads, and the number of row ranges per offset.
    pub jobs: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            range_x: 0,
            range_y: 0,
            threshold: 30,
            jobs: 4,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.jobs == 0 {
            return Err(SearchError::InvalidConfiguration(
                "jobs must be at least 1".into(),
            ));
        }
        if self.offset_count().is_none() {
            let (rx, ry) = (self.range_x, self.range_y);
            return Err(SearchError::InvalidConfiguration(format!(
                "search window {rx}x{ry} is too large"
            )));
        }
        Ok(())
    }

    /// Number of candidate offsets, `None` if it does not fit in a `u64`.
    pub fn offset_count(&self) -> Option<u64> {
        let side = |range: u32| 2 * u64::from(range) + 1;
        side(self.range_x).checked_mul(side(self.range_y))
    }

    /// Pixel comparisons for a `width` x `height` pair, `None` on overflow.
    pub fn total_work(&self, width: u32, height: u32) -> Option<u64> {
        self.offset_count()?
            .checked_mul(u64::from(width))?
            .checked_mul(u64::from(height))
    }
}

/// Snapshot passed to the progress callback after each offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: u64,
    pub total: u64,
}

/// Best alignment found by a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub offset: Offset,
    pub diff_count: u64,
    pub mask: DiffMask,
    pub offsets_evaluated: u64,
    /// Pixel comparisons performed across all offsets.
    pub processed: u64,
}

/// Exhaustive translation search over a fixed worker pool.
///
/// The pool is built once and reused for every offset; offsets are evaluated one
/// after another, rows of a single offset in parallel.
pub struct OffsetSearch {
    params: SearchParams,
    pool: rayon::ThreadPool,
}

impl OffsetSearch {
    pub fn new(params: SearchParams) -> Result<Self, SearchError> {
        params.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.jobs)
            .thread_name(|i| format!("image-diff-{i}"))
            .build()?;
        Ok(Self { params, pool })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Try every offset and keep the one with the fewest differing pixels.
    ///
    /// Ties keep the offset seen first. `on_progress` runs on the calling thread
    /// once per offset, after that offset's workers have all finished.
    pub fn run<F>(
        &self,
        image1: &RgbImage,
        image2: &RgbImage,
        mut on_progress: F,
    ) -> Result<SearchResult, SearchError>
    where
        F: FnMut(Progress),
    {
        check_dimensions(image1, image2)?;
        let (width, height) = image1.dimensions();
        if width == 0 || height == 0 {
            return Err(SearchError::InvalidConfiguration(format!(
                "images must not be empty ({width}x{height})"
            )));
        }

        let params = self.params;
        let Some(total) = params.total_work(width, height) else {
            return Err(SearchError::InvalidConfiguration(format!(
                "search over {width}x{height} pixels is too large"
            )));
        };
        let ranges = partition(height as usize, params.jobs);

        let span = debug_span!(
            "search",
            width,
            height,
            range_x = params.range_x,
            range_y = params.range_y,
            threshold = params.threshold,
            jobs = params.jobs,
        );
        let _enter = span.enter();
        debug!(partitions = ranges.len(), total, "starting search");

        let mut best: Option<(Offset, u64, DiffMask)> = None;
        let mut processed = 0u64;
        let mut evaluated = 0u64;

        for offset in offsets(params.range_x, params.range_y) {
            let mut candidate = DiffMask::zeroed(width, height);
            let windows = candidate.split_rows(&ranges);

            let tally: RangeTally = self.pool.install(|| {
                windows
                    .into_par_iter()
                    .map(|window| evaluate(window, offset, params.threshold, image1, image2))
                    .sum()
            });

            processed += tally.processed;
            evaluated += 1;
            debug!(%offset, diff_count = tally.diff_count, "offset evaluated");

            let improves = best
                .as_ref()
                .is_none_or(|(_, best_count, _)| tally.diff_count < *best_count);
            if improves {
                best = Some((offset, tally.diff_count, candidate));
            }

            on_progress(Progress { processed, total });
        }

        // The offset iterator always yields at least (0, 0).
        let Some((offset, diff_count, mask)) = best else {
            return Err(SearchError::InvalidConfiguration(
                "no offsets to evaluate".into(),
            ));
        };
        debug!(%offset, diff_count, evaluated, "search finished");

        Ok(SearchResult {
            offset,
            diff_count,
            mask,
            offsets_evaluated: evaluated,
            processed,
        })
    }
}

/// One-shot search: validate inputs, build the pool, run.
///
/// Dimension and configuration errors are reported before any worker starts.
pub fn search<F>(
    image1: &RgbImage,
    image2: &RgbImage,
    params: SearchParams,
    on_progress: F,
) -> Result<SearchResult, SearchError>
where
    F: FnMut(Progress),
{
    check_dimensions(image1, image2)?;
    OffsetSearch::new(params)?.run(image1, image2, on_progress)
}

fn check_dimensions(image1: &RgbImage, image2: &RgbImage) -> Result<(), SearchError> {
    if image1.dimensions() != image2.dimensions() {
        return Err(SearchError::DimensionMismatch {
            left_w: image1.width(),
            left_h: image1.height(),
            right_w: image2.width(),
            right_h: image2.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn params(range_x: u32, range_y: u32, threshold: u32, jobs: usize) -> SearchParams {
        SearchParams {
            range_x,
            range_y,
            threshold,
            jobs,
        }
    }

    /// Distinct color per (row, col): neighbouring pixels differ by 30 per channel.
    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |col, row| {
            Rgb([(row * 30) as u8, (col * 30) as u8, 128])
        })
    }

    /// `image1` sampled at `(row + dx, col + dy)` with edge clamping.
    fn shifted(image1: &RgbImage, dx: i64, dy: i64) -> RgbImage {
        let (w, h) = image1.dimensions();
        RgbImage::from_fn(w, h, |col, row| {
            let r = (row as i64 + dx).clamp(0, h as i64 - 1) as u32;
            let c = (col as i64 + dy).clamp(0, w as i64 - 1) as u32;
            *image1.get_pixel(c, r)
        })
    }

    #[test]
    fn identical_images_have_no_differences() {
        let img = gradient(6, 5);
        let result = search(&img, &img.clone(), params(0, 0, 1, 3), |_| {}).unwrap();
        assert_eq!(result.offset, Offset::new(0, 0));
        assert_eq!(result.diff_count, 0);
        assert_eq!(result.mask.flagged_count(), 0);
        assert!(result.mask.as_rgb().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn zero_range_evaluates_one_offset() {
        let img = gradient(4, 4);
        let mut calls = 0;
        let result = search(&img, &img, params(0, 0, 30, 2), |_| calls += 1).unwrap();
        assert_eq!(result.offsets_evaluated, 1);
        assert_eq!(calls, 1);
        assert_eq!(result.offset, Offset::new(0, 0));
    }

    #[test]
    fn all_pixels_differ_end_to_end() {
        let image1 = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        let image2 = RgbImage::from_pixel(2, 2, Rgb([100, 100, 100]));
        let result = search(&image1, &image2, params(0, 0, 50, 1), |_| {}).unwrap();

        assert_eq!(result.offset, Offset::new(0, 0));
        assert_eq!(result.diff_count, 4);
        for row in 0..2 {
            for col in 0..2 {
                assert_eq!(result.mask.as_rgb().get_pixel(col, row).0, [0, 0, 255]);
            }
        }
    }

    #[test]
    fn finds_the_shift() {
        let image1 = gradient(8, 8);
        let image2 = shifted(&image1, 2, -1);
        let result = search(&image1, &image2, params(3, 3, 20, 4), |_| {}).unwrap();

        assert_eq!(result.offset, Offset::new(2, -1));
        assert_eq!(result.diff_count, 0);
        assert_eq!(result.offsets_evaluated, 49);
    }

    #[test]
    fn ties_keep_first_offset() {
        let image1 = RgbImage::from_pixel(5, 5, Rgb([10, 20, 30]));
        let image2 = image1.clone();
        let result = search(&image1, &image2, params(2, 1, 30, 2), |_| {}).unwrap();
        assert_eq!(result.diff_count, 0);
        assert_eq!(result.offset, Offset::new(-2, -1));
    }

    #[test]
    fn tie_between_partial_matches_prefers_lower_delta_x() {
        // Only row 2 is white. Every row shift in -1..=1 samples it exactly once,
        // so all three offsets tie at one row of differences.
        let image1 = RgbImage::from_fn(3, 5, |_, row| {
            if row == 2 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let image2 = RgbImage::from_pixel(3, 5, Rgb([0, 0, 0]));
        let result = search(&image1, &image2, params(1, 0, 30, 3), |_| {}).unwrap();
        assert_eq!(result.diff_count, 3);
        assert_eq!(result.offset, Offset::new(-1, 0));
    }

    #[test]
    fn mask_belongs_to_best_offset() {
        let image1 = gradient(6, 6);
        let image2 = shifted(&image1, 1, 0);
        let result = search(&image1, &image2, params(1, 0, 20, 2), |_| {}).unwrap();
        assert_eq!(result.offset, Offset::new(1, 0));
        assert_eq!(result.mask.flagged_count(), result.diff_count);
    }

    #[test]
    fn progress_is_monotonic_and_complete() {
        let img = gradient(7, 5);
        let mut seen = Vec::new();
        let result = search(&img, &img, params(1, 2, 30, 3), |p| seen.push(p)).unwrap();

        let total = 3 * 5 * 7 * 5;
        assert_eq!(seen.len(), 15);
        assert!(seen.windows(2).all(|w| w[0].processed < w[1].processed));
        assert!(seen.iter().all(|p| p.total == total));
        assert_eq!(seen.last().unwrap().processed, total);
        assert_eq!(result.processed, total);
    }

    #[test]
    fn worker_count_does_not_change_result() {
        let image1 = gradient(9, 11);
        let image2 = shifted(&image1, -1, 2);
        let baseline = search(&image1, &image2, params(2, 2, 20, 1), |_| {}).unwrap();
        for jobs in [2, 3, 4, 16] {
            let r = search(&image1, &image2, params(2, 2, 20, jobs), |_| {}).unwrap();
            assert_eq!(r.offset, baseline.offset);
            assert_eq!(r.diff_count, baseline.diff_count);
            assert_eq!(r.mask, baseline.mask);
        }
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let a = RgbImage::new(4, 4);
        let b = RgbImage::new(4, 5);
        let mut calls = 0;
        let err = search(&a, &b, SearchParams::default(), |_| calls += 1).unwrap_err();
        assert!(matches!(
            err,
            SearchError::DimensionMismatch {
                left_w: 4,
                left_h: 4,
                right_w: 4,
                right_h: 5
            }
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn zero_jobs_is_invalid() {
        let a = RgbImage::new(2, 2);
        let err = search(&a, &a, params(0, 0, 30, 0), |_| {}).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration(_)));
    }

    #[test]
    fn oversized_window_is_invalid() {
        let huge = params(u32::MAX, u32::MAX, 30, 1);
        assert_eq!(huge.offset_count(), None);
        assert!(matches!(
            OffsetSearch::new(huge),
            Err(SearchError::InvalidConfiguration(_))
        ));

        let a = RgbImage::new(1, 1);
        let mut calls = 0;
        let err = search(&a, &a, huge, |_| calls += 1).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration(_)));
        assert_eq!(calls, 0);
    }

    #[test]
    fn total_work_counts_every_comparison() {
        let p = params(1, 2, 30, 1);
        assert_eq!(p.offset_count(), Some(15));
        assert_eq!(p.total_work(7, 5), Some(15 * 35));
        let wide = params(u32::MAX, 0, 30, 1);
        assert_eq!(wide.total_work(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn empty_images_are_invalid() {
        let a = RgbImage::new(0, 3);
        let err = search(&a, &a, SearchParams::default(), |_| {}).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration(_)));
    }

    #[test]
    fn engine_is_reusable() {
        let engine = OffsetSearch::new(params(1, 1, 20, 2)).unwrap();
        assert_eq!(engine.params().jobs, 2);

        let image1 = gradient(5, 5);
        let down_right = shifted(&image1, 1, 1);
        let up = shifted(&image1, -1, 0);
        let first = engine.run(&image1, &down_right, |_| {}).unwrap();
        let second = engine.run(&image1, &up, |_| {}).unwrap();
        assert_eq!(first.offset, Offset::new(1, 1));
        assert_eq!(second.offset, Offset::new(-1, 0));
    }
}
