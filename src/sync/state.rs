//! Deciding whether a mirror needs a pull.

use std::path::Path;

use thiserror::Error;

use crate::git::{MirrorError, RepoMirror};
use crate::types::Sha;

/// The local head could not be determined (missing or corrupt mirror, or the
/// tool failed to run).
#[derive(Debug, Error)]
#[error("could not read local head: {source}")]
pub struct CheckError {
    #[from]
    pub source: MirrorError,
}

impl CheckError {
    /// Raw output of the failed query, for the operator log.
    pub fn output(&self) -> String {
        self.source.output()
    }
}

/// Returns `true` if the mirror at `repo` is not already at `remote_after`.
///
/// Only the first line of the head query is compared, by exact string
/// equality. Anything the tool prints after it is ignored.
pub fn needs_sync(
    mirror: &dyn RepoMirror,
    repo: &Path,
    remote_after: &Sha,
) -> Result<bool, CheckError> {
    let output = mirror.head_commit(repo)?;
    let local_head = output.lines().next().unwrap_or("");
    Ok(local_head != remote_after.as_str())
}
