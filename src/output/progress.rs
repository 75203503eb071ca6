//! Progress reporting while an assembly is written.

use indicatif::{ProgressBar, ProgressStyle};

/// Bar counting assets as they are published. Hidden when `quiet`.
pub fn create_asset_bar(total: u64, quiet: bool) -> ProgressBar {
    if quiet || total == 0 {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} Publishing assets [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}
