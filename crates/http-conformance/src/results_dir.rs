//! Results directory management

use crate::error::{ConformanceError, ConformanceResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Wipe `path` and recreate it empty.
///
/// Artifacts from a previous run are deleted without backup. A plain file at
/// `path` is an error, not something to replace.
pub fn reset_results_dir(path: &Path) -> ConformanceResult<()> {
    let err = |source| ConformanceError::ResetResultsDir {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        debug!("Removing previous results: {:?}", path);
        fs::remove_dir_all(path).map_err(err)?;
    }
    fs::create_dir_all(path).map_err(err)?;
    Ok(())
}
