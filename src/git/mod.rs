//! Local git operations on ebook mirrors.
//!
//! The listener needs exactly two things from git: the commit a mirror
//! currently has checked out, and a pull from the GitHub remote. Both sit
//! behind the [`RepoMirror`] trait so the dispatcher can be exercised against
//! a fake; [`GitCli`] is the implementation that shells out to the `git`
//! binary.

pub mod cli;

use std::io;
use std::path::Path;
use std::process::{Command, Output};

use thiserror::Error;

pub use cli::GitCli;

/// Errors from invoking the version-control tool.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The command could not be started at all (binary missing, permissions).
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The command ran and exited unsuccessfully.
    #[error("`{command}` failed ({status})")]
    CommandFailed {
        command: String,
        status: String,
        /// Everything the command printed, stdout then stderr.
        output: String,
    },
}

impl MirrorError {
    /// Diagnostic text suitable for the operator log.
    pub fn output(&self) -> String {
        match self {
            MirrorError::Spawn { source, .. } => source.to_string(),
            MirrorError::CommandFailed { output, .. } => output.clone(),
        }
    }
}

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Access to the local mirror of a hosted repository.
///
/// Implementations are blocking; the HTTP layer calls into them from a
/// blocking task.
///
/// # Example (fake for testing)
///
/// ```ignore
/// struct FixedHead(String);
///
/// impl RepoMirror for FixedHead {
///     fn head_commit(&self, _repo: &Path) -> MirrorResult<String> {
///         Ok(format!("{}\n", self.0))
///     }
///
///     fn pull(&self, _repo: &Path, _remote: &str) -> MirrorResult<String> {
///         Ok(String::new())
///     }
/// }
/// ```
pub trait RepoMirror: Send + Sync {
    /// Returns the raw output of the head-commit query for `repo`.
    ///
    /// Only the first line is authoritative; callers must not reinterpret
    /// anything after it.
    fn head_commit(&self, repo: &Path) -> MirrorResult<String>;

    /// Pulls `remote` into `repo`, returning the tool's output.
    fn pull(&self, repo: &Path, remote: &str) -> MirrorResult<String>;
}

/// Create a git Command that operates on `repo` via `git -C <repo>`.
///
/// `-C` rather than `current_dir` so that a missing mirror directory is
/// reported by git itself, with a message the operator can act on.
pub(crate) fn git_command(git: &str, repo: &Path) -> Command {
    let mut cmd = Command::new(git);
    cmd.arg("-C").arg(repo);

    // Disable terminal prompts
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd
}

/// Renders a command for log messages, e.g. `git -C /srv/4/42/ pull github`.
pub(crate) fn describe_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Joins stdout and stderr the way a shell `2>&1` capture would show them.
pub(crate) fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Run a command to completion.
///
/// Returns stdout on success, or a `MirrorError` carrying the combined output
/// on failure.
pub(crate) fn run_command(mut cmd: Command) -> MirrorResult<String> {
    let command = describe_command(&cmd);
    let output = cmd.output().map_err(|source| MirrorError::Spawn {
        command: command.clone(),
        source,
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(MirrorError::CommandFailed {
            command,
            status: output.status.to_string(),
            output: combined_output(&output),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn git_command_uses_dash_c() {
        let cmd = git_command("git", &PathBuf::from("/srv/ebooks/4/42/"));
        assert_eq!(describe_command(&cmd), "git -C /srv/ebooks/4/42/");
    }

    #[test]
    fn run_command_missing_binary_is_spawn_error() {
        let cmd = Command::new("/nonexistent/definitely-not-git");
        let err = run_command(cmd).unwrap_err();
        assert!(matches!(err, MirrorError::Spawn { .. }));
        assert!(err.to_string().contains("definitely-not-git"));
    }

    #[test]
    fn run_command_failure_captures_output() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 3"]);

        match run_command(cmd).unwrap_err() {
            MirrorError::CommandFailed { output, status, .. } => {
                assert_eq!(output, "out\nerr\n");
                assert!(status.contains('3'));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn run_command_success_returns_stdout() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo first; echo second; echo noise >&2"]);
        assert_eq!(run_command(cmd).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn mirror_error_output() {
        let err = MirrorError::CommandFailed {
            command: "git pull".to_string(),
            status: "exit status: 1".to_string(),
            output: "fatal: not a git repository".to_string(),
        };
        assert_eq!(err.output(), "fatal: not a git repository");
        assert_eq!(err.to_string(), "`git pull` failed (exit status: 1)");
    }
}
