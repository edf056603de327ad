//! Build artifact discovery.
//!
//! Different build setups of the same upstream project emit their output
//! under different conventional names. The locator checks an ordered list
//! of candidates and accepts the first one that exists.

use std::path::{Path, PathBuf};

/// Errors that can occur when locating the artifact directory.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("No build output found in {root}: tried {}", .candidates.join(", "))]
    NoArtifactFound {
        root: PathBuf,
        candidates: Vec<String>,
    },
}

/// Return the first candidate that exists as a directory under `root`.
///
/// Candidates are checked in order. When several exist, the later ones are
/// ignored. A candidate that exists as a regular file is not a match.
pub fn locate_artifact<S: AsRef<str>>(root: &Path, candidates: &[S]) -> Result<PathBuf, LocateError> {
    for candidate in candidates {
        let path = root.join(candidate.as_ref());
        if path.is_dir() {
            tracing::debug!("Found build output at {}", path.display());
            return Ok(path);
        }
    }

    Err(LocateError::NoArtifactFound {
        root: root.to_path_buf(),
        candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
    })
}
