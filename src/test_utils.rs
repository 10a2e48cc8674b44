//! Shared test utilities: a scripted [`RepoMirror`] and arbitrary generators.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use proptest::prelude::*;

use crate::git::{MirrorError, MirrorResult, RepoMirror};
use crate::types::EbookId;

/// A [`RepoMirror`] that returns scripted results and records every call.
#[derive(Debug)]
pub struct FakeMirror {
    state: Mutex<FakeState>,
}

#[derive(Debug)]
struct FakeState {
    head: Result<String, String>,
    pull_failure: Option<String>,
    advance_to: Option<String>,
    head_queries: Vec<PathBuf>,
    pulls: Vec<(PathBuf, String)>,
}

impl FakeMirror {
    /// A mirror whose head query prints `sha` followed by a newline.
    pub fn with_head(sha: &str) -> Self {
        Self::with_head_output(&format!("{}\n", sha))
    }

    /// A mirror whose head query prints exactly `output`.
    pub fn with_head_output(output: &str) -> Self {
        Self::from_head(Ok(output.to_string()))
    }

    /// A mirror whose head query fails with `output`.
    pub fn with_head_failure(output: &str) -> Self {
        Self::from_head(Err(output.to_string()))
    }

    fn from_head(head: Result<String, String>) -> Self {
        FakeMirror {
            state: Mutex::new(FakeState {
                head,
                pull_failure: None,
                advance_to: None,
                head_queries: Vec::new(),
                pulls: Vec::new(),
            }),
        }
    }

    /// Makes every pull fail with `output`.
    pub fn failing_pull(self, output: &str) -> Self {
        self.state.lock().unwrap().pull_failure = Some(output.to_string());
        self
    }

    /// Makes a successful pull move the head to `sha`.
    pub fn pull_advances_to(self, sha: &str) -> Self {
        self.state.lock().unwrap().advance_to = Some(sha.to_string());
        self
    }

    pub fn head_queries(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().head_queries.clone()
    }

    pub fn pulls(&self) -> Vec<(PathBuf, String)> {
        self.state.lock().unwrap().pulls.clone()
    }
}

fn failed(command: &str, output: &str) -> MirrorError {
    MirrorError::CommandFailed {
        command: command.to_string(),
        status: "exit status: 128".to_string(),
        output: output.to_string(),
    }
}

impl RepoMirror for FakeMirror {
    fn head_commit(&self, repo: &Path) -> MirrorResult<String> {
        let mut state = self.state.lock().unwrap();
        state.head_queries.push(repo.to_path_buf());
        state
            .head
            .clone()
            .map_err(|output| failed("git rev-parse HEAD", &output))
    }

    fn pull(&self, repo: &Path, remote: &str) -> MirrorResult<String> {
        let mut state = self.state.lock().unwrap();
        state.pulls.push((repo.to_path_buf(), remote.to_string()));

        if let Some(output) = &state.pull_failure {
            return Err(failed("git pull", output));
        }
        if let Some(sha) = state.advance_to.clone() {
            state.head = Ok(format!("{}\n", sha));
        }
        Ok("Fast-forward\n".to_string())
    }
}

pub fn arb_ebook_id() -> impl Strategy<Value = EbookId> {
    "[1-9][0-9]{0,6}".prop_map(|s| EbookId::parse(s).unwrap())
}

pub fn arb_sha() -> impl Strategy<Value = String> {
    "[0-9a-f]{40}".prop_map(String::from)
}
