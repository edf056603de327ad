//! Sidecar files such as `CNAME` that live next to the deploy config and
//! must ride along with the built site.

use std::fs;
use std::path::Path;

use crate::error::SiteError;

/// Copy every existing `source_dir/<name>` into `artifact_dir/<name>`.
///
/// Missing files are skipped. Returns the names that were copied.
pub fn copy_sidecars<S: AsRef<str>>(
    source_dir: &Path,
    artifact_dir: &Path,
    names: &[S],
) -> Result<Vec<String>, SiteError> {
    let mut copied = Vec::new();

    for name in names {
        let name = name.as_ref();
        let from = source_dir.join(name);

        if !from.is_file() {
            tracing::debug!("No {} in {}, skipping", name, source_dir.display());
            continue;
        }

        let to = artifact_dir.join(name);
        fs::copy(&from, &to).map_err(|source| SiteError::Copy {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        tracing::info!("Copied {} into build output", name);
        copied.push(name.to_string());
    }

    Ok(copied)
}
