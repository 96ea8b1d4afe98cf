use image::{Rgb, RgbImage};

use crate::mask::{MaskRows, Offset, flag};

/// Counters returned by one [`evaluate`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeTally {
    /// Pixels at or above the threshold.
    pub diff_count: u64,
    /// Pixels visited, flagged or not.
    pub processed: u64,
}

impl std::ops::Add for RangeTally {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            diff_count: self.diff_count + rhs.diff_count,
            processed: self.processed + rhs.processed,
        }
    }
}

impl std::iter::Sum for RangeTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, t| acc + t)
    }
}

/// Euclidean distance over the three channels.
pub fn color_distance(a: &Rgb<u8>, b: &Rgb<u8>) -> f64 {
    let [r1, g1, b1] = a.0.map(i32::from);
    let [r2, g2, b2] = b.0.map(i32::from);
    let (dr, dg, db) = (r1 - r2, g1 - g2, b1 - b2);
    f64::from(dr * dr + dg * dg + db * db).sqrt()
}

/// Saturating clamp of a shifted coordinate into `[0, len)`. `len` must be non-zero.
pub fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

/// Compare every pixel of the rows in `window` and flag the ones that differ.
///
/// `image1` is sampled at the shifted (and clamped) coordinate, `image2` at the
/// unshifted one. Both images must share dimensions with the mask the window came from.
pub fn evaluate(
    mut window: MaskRows<'_>,
    offset: Offset,
    threshold: u32,
    image1: &RgbImage,
    image2: &RgbImage,
) -> RangeTally {
    let (width, height) = image1.dimensions();
    let (width, height) = (width as usize, height as usize);
    let threshold = f64::from(threshold);
    let mut tally = RangeTally::default();

    for (x, row) in window.rows_mut() {
        let src_x = clamp_index(x as i64 + offset.delta_x, height);
        for y in 0..width {
            let src_y = clamp_index(y as i64 + offset.delta_y, width);
            let shifted = image1.get_pixel(src_y as u32, src_x as u32);
            let reference = image2.get_pixel(y as u32, x as u32);

            if color_distance(shifted, reference) >= threshold {
                flag(row, y);
                tally.diff_count += 1;
            }
            tally.processed += 1;
        }
    }

    tally
}
