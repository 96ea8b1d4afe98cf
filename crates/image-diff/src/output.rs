use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use image_diff_core::DiffMask;

const DIFFERS: Rgb<u8> = Rgb([255, 0, 0]);
const MATCHES: Rgb<u8> = Rgb([0, 0, 0]);

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Paint flagged pixels red on black.
pub fn render_mask(mask: &DiffMask) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |col, row| {
        if mask.is_flagged(row, col) {
            DIFFERS
        } else {
            MATCHES
        }
    })
}

pub fn write_mask(mask: &DiffMask, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    render_mask(mask)
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
