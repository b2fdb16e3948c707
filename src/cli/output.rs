//! Result output: pretty JSON to stdout or to a file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::client::SearchResults;

/// Writes results as pretty-printed JSON. With a path, parent directories
/// are created as needed; without one, the JSON goes to stdout (logs go to
/// stderr, so piped output stays clean).
pub fn write_results(results: &SearchResults, path: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(results)?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            info!("results written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
