//! Entry points for driving ermineJ itself.
//!
//! Neither operation is implemented yet; both return
//! [`ErmineError::NotImplemented`].

use crate::config::ToolConfig;
use crate::error::{ErmineError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Score a ranked result file with ermineJ.
///
/// `data_dir` defaults to the configured base data directory (`/data`).
pub fn run_erminej_on_result<P: AsRef<Path>>(
    result_file: P,
    data_dir: Option<&Path>,
) -> Result<PathBuf> {
    let data_dir = resolve_data_dir(data_dir);
    debug!(
        "run_erminej_on_result({}, {})",
        result_file.as_ref().display(),
        data_dir.display()
    );
    Err(ErmineError::NotImplemented("run_erminej_on_result".to_string()))
}

/// Open an ermineJ result file in the ermineJ GUI.
///
/// `data_dir` defaults to the configured base data directory (`/data`).
pub fn view_erminej_results<P: AsRef<Path>>(
    erminej_file: P,
    data_dir: Option<&Path>,
) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir);
    debug!(
        "view_erminej_results({}, {})",
        erminej_file.as_ref().display(),
        data_dir.display()
    );
    Err(ErmineError::NotImplemented("view_erminej_results".to_string()))
}

fn resolve_data_dir(data_dir: Option<&Path>) -> PathBuf {
    data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ToolConfig::default().data_dir)
}
