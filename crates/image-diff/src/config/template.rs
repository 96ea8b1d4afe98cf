use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::CONFIG_FILE;

/// Hand-written template with every key commented out, so `image-diff init`
/// documents the knobs without changing any behaviour.
const CONFIG_TEMPLATE: &str = r#"# ─────────────────────────────────────────────────────────
# Search — all fields optional. CLI flags and IMAGE_DIFF_* env vars win.
# ─────────────────────────────────────────────────────────
[search]
# thresh = 30                       # color distance counted as a difference
# range_x = 0                       # try row offsets -range_x..=range_x
# range_y = 0                       # try column offsets -range_y..=range_y
# jobs = 4                          # worker threads

# ─────────────────────────────────────────────────────────
# Output
# ─────────────────────────────────────────────────────────
[output]
# path = "diff.png"                 # difference mask (red = differs)
"#;

pub fn config_file_exists(dir: &Path) -> bool {
    dir.join(CONFIG_FILE).exists()
}

/// Write the commented template into `dir`, returning the file path.
pub fn write_template(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(CONFIG_FILE);
    std::fs::write(&path, CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
