//! Scoped ownership of the checkout directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A workspace directory owned by a single run.
///
/// Acquiring removes anything left at the path by an earlier run. Dropping
/// the guard removes the directory again, whatever happened in between.
/// Removal errors on drop are logged and otherwise ignored.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Claim `path` as a fresh workspace.
    ///
    /// The directory itself is not created, since `git clone` expects to
    /// create it. Its parent is.
    pub fn acquire(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();

        if path.exists() {
            tracing::debug!("Removing stale workspace {}", path.display());
            fs::remove_dir_all(&path)?;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Claim `dir`, resolved against `base`, as a fresh workspace.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] before touching the disk
    /// when the resolved path is `base` itself or one of its ancestors.
    pub fn acquire_under(base: &Path, dir: &Path) -> io::Result<Self> {
        let base = normalize(base);
        let path = normalize(&base.join(dir));

        if base.starts_with(&path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "workspace {} would contain the invocation directory {}",
                    path.display(),
                    base.display()
                ),
            ));
        }

        Self::acquire(path)
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }

        match fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!("Removed workspace {}", self.path.display()),
            Err(e) => tracing::debug!("Failed to remove workspace {}: {}", self.path.display(), e),
        }
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_directory_on_drop() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("checkout");

        {
            let workspace = Workspace::acquire(&path).unwrap();
            fs::create_dir_all(workspace.path().join("src")).unwrap();
            fs::write(workspace.path().join("src/index.md"), "# Hi").unwrap();
            assert!(path.exists());
        }

        assert!(!path.exists());
    }

    #[test]
    fn clears_stale_directory_on_acquire() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("checkout");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("leftover.txt"), "old run").unwrap();

        let workspace = Workspace::acquire(&path).unwrap();

        assert!(!workspace.path().exists());
        assert!(temp.path().exists());
    }

    #[test]
    fn acquires_nested_and_sibling_directories() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("project");
        fs::create_dir_all(&base).unwrap();

        let nested = Workspace::acquire_under(&base, Path::new("./build/checkout")).unwrap();
        assert_eq!(nested.path(), base.join("build/checkout"));

        let sibling = Workspace::acquire_under(&base, Path::new("../scratch")).unwrap();
        assert_eq!(sibling.path(), temp.path().join("scratch"));
    }

    #[test]
    fn refuses_invocation_directory_and_ancestors() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("project");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("deploy.toml"), "").unwrap();

        for dir in [".", "", "..", "sub/../..", "/"] {
            let err = Workspace::acquire_under(&base, Path::new(dir)).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "dir {:?}", dir);
        }

        assert!(base.join("deploy.toml").exists());
    }

    #[test]
    fn drop_tolerates_missing_directory() {
        let temp = tempdir().unwrap();
        let workspace = Workspace::acquire(temp.path().join("never-created")).unwrap();

        drop(workspace);
    }

    #[test]
    fn cleans_up_when_unwinding() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("checkout");
        let inner = path.clone();

        let result = std::panic::catch_unwind(move || {
            let workspace = Workspace::acquire(&inner).unwrap();
            fs::create_dir_all(workspace.path()).unwrap();
            panic!("build exploded");
        });

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
