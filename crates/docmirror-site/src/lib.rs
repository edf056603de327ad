//! Build artifact discovery and static-site config patching.
//!
//! This crate holds the file-level logic of a docmirror run: finding the
//! directory a build produced, patching the static-site config inside it,
//! and copying sidecar files and directory trees around.

pub mod copy;
pub mod error;
pub mod locate;
pub mod patch;
pub mod sidecar;

pub use copy::{copy_dir_contents, CopyOptions};
pub use error::SiteError;
pub use locate::{locate_artifact, LocateError};
pub use patch::{ensure_all_excluded, ensure_excluded, patch_config_file, PatchAction, PatchResult};
pub use sidecar::copy_sidecars;
