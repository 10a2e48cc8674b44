//! [`RepoMirror`] implemented with the `git` command-line tool.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{MirrorResult, RepoMirror, describe_command, git_command, run_command};

/// Runs `git` against local mirrors.
///
/// Pulls optionally run as a different Unix user via `sudo -n -u <user>`, so
/// that files written by the pull are owned consistently no matter which user
/// runs the listener. The head-commit query is read-only and always runs as
/// the listener's own user.
#[derive(Debug, Clone)]
pub struct GitCli {
    git: String,
    sudo: String,
    sync_user: Option<String>,
}

impl GitCli {
    /// Creates a `GitCli` that runs `git` from `PATH` as the current user.
    pub fn new() -> Self {
        GitCli {
            git: "git".to_string(),
            sudo: "sudo".to_string(),
            sync_user: None,
        }
    }

    /// Sets the git binary to invoke.
    pub fn with_git(mut self, git: impl Into<String>) -> Self {
        self.git = git.into();
        self
    }

    /// Sets the sudo binary used when a sync user is configured.
    pub fn with_sudo(mut self, sudo: impl Into<String>) -> Self {
        self.sudo = sudo.into();
        self
    }

    /// Runs pulls as `user`.
    pub fn with_sync_user(mut self, user: Option<String>) -> Self {
        self.sync_user = user;
        self
    }

    pub fn head_command(&self, repo: &Path) -> Command {
        let mut cmd = git_command(&self.git, repo);
        cmd.args(["rev-parse", "HEAD"]);
        cmd
    }

    pub fn pull_command(&self, repo: &Path, remote: &str) -> Command {
        match &self.sync_user {
            Some(user) => {
                // sudo scrubs the environment, so GIT_TERMINAL_PROMPT set by
                // git_command would not survive; -n keeps sudo itself from
                // prompting for a password.
                let mut cmd = Command::new(&self.sudo);
                cmd.args(["-n", "-u", user.as_str(), "--", self.git.as_str(), "-C"])
                    .arg(repo)
                    .args(["pull", remote]);
                cmd
            }
            None => {
                let mut cmd = git_command(&self.git, repo);
                cmd.args(["pull", remote]);
                cmd
            }
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        GitCli::new()
    }
}

impl RepoMirror for GitCli {
    fn head_commit(&self, repo: &Path) -> MirrorResult<String> {
        let cmd = self.head_command(repo);
        debug!(command = %describe_command(&cmd), "Querying local head");
        run_command(cmd)
    }

    fn pull(&self, repo: &Path, remote: &str) -> MirrorResult<String> {
        let cmd = self.pull_command(repo, remote);
        debug!(command = %describe_command(&cmd), "Pulling mirror");
        run_command(cmd)
    }
}
