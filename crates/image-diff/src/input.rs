use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use image::imageops::FilterType;
use image::{ImageReader, RgbImage};
use tracing::{debug, info};

/// Decode an image file into 8-bit RGB.
pub fn load(path: &Path) -> Result<RgbImage> {
    let image = ImageReader::open(path)
        .with_context(|| format!("failed to open image: {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to read image: {}", path.display()))?
        .decode()
        .with_context(|| format!("failed to decode image: {}", path.display()))?
        .to_rgb8();
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded image"
    );
    Ok(image)
}

/// Make `second` the same size as `first`.
///
/// Equal sizes pass straight through. Otherwise the user is asked (unless
/// `assume_yes`) whether to resample `second`; declining is an error.
pub fn reconcile_sizes<R: BufRead, W: Write>(
    first: &RgbImage,
    second: RgbImage,
    assume_yes: bool,
    input: &mut R,
    out: &mut W,
) -> Result<RgbImage> {
    if first.dimensions() == second.dimensions() {
        return Ok(second);
    }

    let (w1, h1) = first.dimensions();
    let (w2, h2) = second.dimensions();
    writeln!(out, "They are not the same size ({w1}x{h1} != {w2}x{h2}).")?;

    let accepted = if assume_yes {
        true
    } else {
        write!(
            out,
            "Resize FILE2 to the size of FILE1 and continue? [y/N] "
        )?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        answer.trim().eq_ignore_ascii_case("y")
    };

    if !accepted {
        bail!("images differ in size ({w1}x{h1} vs {w2}x{h2}); resize them first or pass --yes");
    }

    info!(
        from_w = w2,
        from_h = h2,
        to_w = w1,
        to_h = h1,
        "resizing second image"
    );
    Ok(image::imageops::resize(&second, w1, h1, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;

    fn solid(w: u32, h: u32, color: Rgb<u8>) -> RgbImage {
        RgbImage::from_pixel(w, h, color)
    }

    #[test]
    fn same_size_passes_through_without_prompt() {
        let a = solid(4, 3, Rgb([1, 2, 3]));
        let b = solid(4, 3, Rgb([9, 9, 9]));
        let mut out = Vec::new();
        let r = reconcile_sizes(&a, b.clone(), false, &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(r, b);
        assert!(out.is_empty());
    }

    #[test]
    fn yes_answer_resizes() {
        let a = solid(8, 6, Rgb([0, 0, 0]));
        let b = solid(4, 3, Rgb([50, 60, 70]));
        let mut out = Vec::new();
        let r = reconcile_sizes(&a, b, false, &mut Cursor::new("y\n"), &mut out).unwrap();
        assert_eq!(r.dimensions(), (8, 6));
        // Resampling a flat image keeps its color.
        assert_eq!(*r.get_pixel(5, 4), Rgb([50, 60, 70]));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("8x6 != 4x3"));
        assert!(printed.contains("[y/N]"));
    }

    #[test]
    fn anything_else_declines() {
        for answer in ["n\n", "\n", "yes please\n", ""] {
            let a = solid(2, 2, Rgb([0, 0, 0]));
            let b = solid(3, 3, Rgb([0, 0, 0]));
            let mut out = Vec::new();
            let err =
                reconcile_sizes(&a, b, false, &mut Cursor::new(answer), &mut out).unwrap_err();
            assert!(err.to_string().contains("resize them first"), "{answer:?}");
        }
    }

    #[test]
    fn assume_yes_skips_prompt() {
        let a = solid(2, 2, Rgb([0, 0, 0]));
        let b = solid(5, 1, Rgb([0, 0, 0]));
        let mut out = Vec::new();
        let r = reconcile_sizes(&a, b, true, &mut Cursor::new(""), &mut out).unwrap();
        assert_eq!(r.dimensions(), (2, 2));
        assert!(!String::from_utf8(out).unwrap().contains("[y/N]"));
    }

    #[test]
    fn load_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        solid(5, 2, Rgb([10, 20, 30])).save(&path).unwrap();

        let img = load(&path).unwrap();
        assert_eq!(img.dimensions(), (5, 2));
        assert_eq!(*img.get_pixel(4, 1), Rgb([10, 20, 30]));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to open image"));
    }

    #[test]
    fn load_reports_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(load(&path).is_err());
    }
}
