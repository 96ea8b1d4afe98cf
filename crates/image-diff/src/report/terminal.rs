use std::io::Write;
use std::path::Path;
use std::time::Duration;

use image_diff_core::{Progress, SearchResult};

const BAR_CELLS: u64 = 50;

pub fn print_banner() {
    println!("image-diff version {}", env!("CARGO_PKG_VERSION"));
    println!();
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Render one frame of the progress bar, e.g. `[=====>....] 12.0%`.
pub fn render_bar(processed: u64, total: u64) -> String {
    let (filled, pct) = if total == 0 {
        (BAR_CELLS, 100.0)
    } else {
        let processed = processed.min(total);
        (
            processed * BAR_CELLS / total,
            processed as f64 / total as f64 * 100.0,
        )
    };

    let mut bar = String::with_capacity(BAR_CELLS as usize + 10);
    bar.push('[');
    if filled > 0 {
        bar.push_str(&"=".repeat(filled as usize - 1));
        bar.push('>');
    }
    bar.push_str(&".".repeat((BAR_CELLS - filled) as usize));
    bar.push_str(&format!("] {pct:>5.1}%"));
    bar
}

/// Console progress bar redrawn in place with `\r`.
pub struct ProgressBar<W: Write> {
    out: W,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn update(&mut self, progress: Progress) {
        let bar = render_bar(progress.processed, progress.total);
        let _ = write!(self.out, "\r{bar}");
        let _ = self.out.flush();
    }

    pub fn finish(mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }
}

/// Print the final summary.
pub fn print_summary(result: &SearchResult, mask_path: &Path, elapsed: Duration) {
    let total_pixels = u64::from(result.mask.width()) * u64::from(result.mask.height());
    let ratio = if total_pixels > 0 {
        result.diff_count as f64 / total_pixels as f64
    } else {
        0.0
    };

    println!();
    println!("Best offset:  {}", result.offset);
    if result.diff_count == 0 {
        println!("Differences:  \x1b[32m0 pixels\x1b[0m");
    } else {
        println!(
            "Differences:  \x1b[31m{} pixels\x1b[0m of {total_pixels} ({ratio:.4})",
            result.diff_count
        );
    }
    println!("Offsets:      {}", result.offsets_evaluated);
    println!("Mask:         {}", mask_path.display());
    println!("Time:         {}", format_duration(elapsed));
}
