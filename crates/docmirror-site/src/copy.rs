//! Recursive directory copy.

use std::fs;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::SiteError;

/// Options for [`copy_dir_contents`].
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions {
    /// Copy entries whose name starts with `.`
    pub include_dotfiles: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            include_dotfiles: true,
        }
    }
}

/// Copy the tree under `src` into `dest`, creating `dest` if needed.
///
/// `.git` is never copied. Returns the number of files copied.
pub fn copy_dir_contents(src: &Path, dest: &Path, options: CopyOptions) -> Result<usize, SiteError> {
    fs::create_dir_all(dest).map_err(|source| SiteError::Write {
        path: dest.to_path_buf(),
        source,
    })?;

    let mut count = 0;

    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| keep_entry(e, options));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            SiteError::Read {
                path,
                source: e.into(),
            }
        })?;

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| SiteError::Write {
                path: target.clone(),
                source,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|source| SiteError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
            count += 1;
        }
    }

    Ok(count)
}

fn keep_entry(entry: &DirEntry, options: CopyOptions) -> bool {
    // The root itself may be a dot directory.
    if entry.depth() == 0 {
        return true;
    }

    let name = entry.file_name().to_string_lossy();

    if name == ".git" {
        return false;
    }

    options.include_dotfiles || !name.starts_with('.')
}
