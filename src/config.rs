//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::dispatch::DispatchSettings;
use crate::git::GitCli;

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Parser)]
#[command(name = "ebook-sync")]
#[command(author, version, about = "Keeps local ebook mirrors in sync with GitHub pushes")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "EBOOK_SYNC_LISTEN", default_value = "127.0.0.1:3000")]
    pub listen: SocketAddr,

    /// File containing the shared webhook secret
    #[arg(long, env = "EBOOK_SYNC_SECRET_FILE")]
    pub secret_file: PathBuf,

    /// Root directory of the sharded ebook mirror tree
    #[arg(long, env = "EBOOK_SYNC_REPO_ROOT")]
    pub repo_root: String,

    /// Append-only activity log
    #[arg(long, env = "EBOOK_SYNC_LOG_FILE")]
    pub log_file: PathBuf,

    /// Remote to pull from
    #[arg(long, env = "EBOOK_SYNC_REMOTE", default_value = "github")]
    pub remote: String,

    /// Run pulls as this user via sudo
    #[arg(long, env = "EBOOK_SYNC_USER")]
    pub sync_user: Option<String>,

    /// git executable
    #[arg(long, env = "EBOOK_SYNC_GIT", default_value = "git")]
    pub git: String,

    /// sudo executable
    #[arg(long, env = "EBOOK_SYNC_SUDO", default_value = "sudo")]
    pub sudo: String,
}

impl Config {
    /// Checks required values and normalises the repo root to end in `/`.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.repo_root.is_empty() {
            return Err(ConfigError::Empty("repo root"));
        }
        if self.remote.is_empty() {
            return Err(ConfigError::Empty("remote"));
        }
        if self.sync_user.as_deref() == Some("") {
            return Err(ConfigError::Empty("sync user"));
        }
        if !self.repo_root.ends_with('/') {
            self.repo_root.push('/');
        }
        Ok(self)
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            secret_file: self.secret_file.clone(),
            repo_root: self.repo_root.clone(),
            remote: self.remote.clone(),
            log_file: self.log_file.clone(),
        }
    }

    pub fn git_cli(&self) -> GitCli {
        GitCli::new()
            .with_git(self.git.clone())
            .with_sudo(self.sudo.clone())
            .with_sync_user(self.sync_user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const REQUIRED: [&str; 7] = [
        "ebook-sync",
        "--secret-file",
        "/etc/ebook-sync/secret",
        "--repo-root",
        "/srv/ebooks",
        "--log-file",
        "/var/log/webhooks-github.log",
    ];

    fn parse(extra: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(REQUIRED.iter().chain(extra))
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.listen, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.remote, "github");
        assert_eq!(config.sync_user, None);
        assert_eq!(config.git, "git");
        assert_eq!(config.sudo, "sudo");
    }

    #[test]
    fn missing_required_flag_is_error() {
        assert!(Config::try_parse_from(["ebook-sync", "--repo-root", "/srv/ebooks"]).is_err());
    }

    #[test]
    fn validate_appends_trailing_slash() {
        let config = parse(&[]).unwrap().validate().unwrap();
        assert_eq!(config.repo_root, "/srv/ebooks/");

        let config = parse(&["--repo-root", "/srv/ebooks/"])
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(config.repo_root, "/srv/ebooks/");
    }

    #[test]
    fn validate_rejects_empty_values() {
        let err = parse(&["--repo-root", ""]).unwrap().validate().unwrap_err();
        assert_eq!(err, ConfigError::Empty("repo root"));

        let err = parse(&["--remote", ""]).unwrap().validate().unwrap_err();
        assert_eq!(err, ConfigError::Empty("remote"));

        let err = parse(&["--sync-user", ""]).unwrap().validate().unwrap_err();
        assert_eq!(err, ConfigError::Empty("sync user"));
    }

    #[test]
    fn git_cli_uses_sync_user() {
        let config = parse(&["--sync-user", "pgbooks", "--sudo", "/usr/bin/sudo"])
            .unwrap()
            .validate()
            .unwrap();
        let cmd = config.git_cli().pull_command(Path::new("/srv/ebooks/4/42/"), "github");

        assert_eq!(cmd.get_program(), "/usr/bin/sudo");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.contains(&"pgbooks".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("github"));
    }

    #[test]
    fn dispatch_settings_carry_normalised_root() {
        let settings = parse(&["--remote", "origin"])
            .unwrap()
            .validate()
            .unwrap()
            .dispatch_settings();
        assert_eq!(settings.repo_root, "/srv/ebooks/");
        assert_eq!(settings.remote, "origin");
        assert_eq!(settings.secret_file, PathBuf::from("/etc/ebook-sync/secret"));
    }
}
