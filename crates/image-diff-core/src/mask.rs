use std::fmt;

use image::RgbImage;

use crate::partition::PartitionRange;

/// Channel that carries the "differs" flag.
pub const FLAG_CHANNEL: usize = 2;
/// Value written to [`FLAG_CHANNEL`] for a differing pixel.
pub const FLAG_VALUE: u8 = 255;

const CHANNELS: usize = 3;

/// Integer translation applied to the first image when sampling it against the second.
///
/// `delta_x` shifts the row index, `delta_y` the column index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub delta_x: i64,
    pub delta_y: i64,
}

impl Offset {
    pub fn new(delta_x: i64, delta_y: i64) -> Self {
        Self { delta_x, delta_y }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.delta_x, self.delta_y)
    }
}

/// All candidate offsets in search order: `delta_x` ascending on the outside,
/// `delta_y` ascending on the inside.
pub fn offsets(range_x: u32, range_y: u32) -> impl Iterator<Item = Offset> {
    let (rx, ry) = (i64::from(range_x), i64::from(range_y));
    (-rx..=rx).flat_map(move |dx| (-ry..=ry).map(move |dy| Offset::new(dx, dy)))
}

/// Per-pixel difference flags, same size as the compared images.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffMask {
    inner: RgbImage,
}

impl DiffMask {
    pub fn zeroed(width: u32, height: u32) -> Self {
        Self {
            inner: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Whether the pixel at (`row`, `col`) was classified as different.
    pub fn is_flagged(&self, row: u32, col: u32) -> bool {
        self.inner.get_pixel(col, row)[FLAG_CHANNEL] == FLAG_VALUE
    }

    pub fn flagged_count(&self) -> u64 {
        self.inner
            .pixels()
            .filter(|p| p[FLAG_CHANNEL] == FLAG_VALUE)
            .count() as u64
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.inner
    }

    pub fn into_rgb(self) -> RgbImage {
        self.inner
    }

    /// Hand out one mutable row window per range.
    ///
    /// Ranges must be ordered by `start` and pairwise disjoint, as produced by
    /// [`crate::partition::partition`]. Panics otherwise.
    pub fn split_rows(&mut self, ranges: &[PartitionRange]) -> Vec<MaskRows<'_>> {
        let width = self.inner.width() as usize;
        let row_bytes = width * CHANNELS;
        let height = self.inner.height() as usize;

        let mut rest: &mut [u8] = &mut self.inner;
        let mut cursor = 0;
        let mut windows = Vec::with_capacity(ranges.len());
        for &range in ranges {
            assert!(
                range.start >= cursor && range.end <= height,
                "row range {}..{} overlaps or exceeds mask (cursor {cursor}, height {height})",
                range.start,
                range.end,
            );
            let skip = (range.start - cursor) * row_bytes;
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(skip);
            let (data, tail) = tail.split_at_mut(range.len() * row_bytes);
            rest = tail;
            cursor = range.end;
            windows.push(MaskRows { range, width, data });
        }
        windows
    }
}

/// Exclusive view over a contiguous block of mask rows.
pub struct MaskRows<'a> {
    range: PartitionRange,
    width: usize,
    data: &'a mut [u8],
}

impl MaskRows<'_> {
    pub fn range(&self) -> PartitionRange {
        self.range
    }

    /// Iterate `(row index, row bytes)` over the window.
    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [u8])> {
        let start = self.range.start;
        self.data
            .chunks_exact_mut(self.width * CHANNELS)
            .enumerate()
            .map(move |(i, row)| (start + i, row))
    }
}

/// Mark the pixel at column `col` inside a row slice.
pub(crate) fn flag(row: &mut [u8], col: usize) {
    row[col * CHANNELS + FLAG_CHANNEL] = FLAG_VALUE;
}
