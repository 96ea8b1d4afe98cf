use std::path::Path;

use anyhow::{Result, bail};

use crate::config;

/// `image-diff init` — create image-diff.toml in the working directory.
pub fn init(force: bool) -> Result<()> {
    let dir = Path::new(".");
    if !force && config::config_file_exists(dir) {
        bail!("image-diff.toml already exists (use --force to overwrite)");
    }

    let path = config::write_template(dir)?;

    let verb = if force { "Regenerated" } else { "Created" };
    println!("{verb} {}", path.display());
    Ok(())
}
