//! Optional on-disk copies of captured screenshots.

use std::path::{Path, PathBuf};

const MAX_STEM_CHARS: usize = 40;

/// File stem for a label: every run of characters outside `[A-Za-z0-9_]`
/// collapses to one `_`, truncated to 40 characters.
pub(crate) fn file_stem(label: &str) -> String {
    let mut stem = String::with_capacity(label.len());
    let mut in_run = false;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            stem.push(c);
            in_run = false;
        } else if !in_run {
            stem.push('_');
            in_run = true;
        }
    }

    let stem: String = stem.chars().take(MAX_STEM_CHARS).collect();
    if stem.is_empty() {
        "shot".to_string()
    } else {
        stem
    }
}

/// Write `png` to `<dir>/<stem>_after.png`, creating `dir` if needed.
pub(crate) async fn save_screenshot(
    dir: &Path,
    label: &str,
    png: &[u8],
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}_after.png", file_stem(label)));
    tokio::fs::write(&path, png).await?;
    Ok(path)
}
