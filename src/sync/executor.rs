//! Pulling a mirror up to date.

use std::path::Path;

use thiserror::Error;

use crate::git::{MirrorError, RepoMirror};

/// The pull failed. Carries the tool's full output.
#[derive(Debug, Error)]
#[error("pull failed: {source}")]
pub struct SyncError {
    #[from]
    pub source: MirrorError,
}

impl SyncError {
    pub fn output(&self) -> String {
        self.source.output()
    }
}

/// Pulls `remote` into the mirror at `repo`.
///
/// Failures are returned to the caller as-is; there is no retry.
pub fn sync(mirror: &dyn RepoMirror, repo: &Path, remote: &str) -> Result<(), SyncError> {
    mirror.pull(repo, remote)?;
    Ok(())
}
