//! ebook-sync - keeps local mirrors of ebook repositories in sync with GitHub.
//!
//! A push to an ebook's hosted repository triggers a signed webhook; the
//! listener verifies it, locates the ebook's local mirror in a sharded
//! directory tree, and pulls if the mirror is behind.

pub mod config;
pub mod dispatch;
pub mod git;
pub mod persistence;
pub mod server;
pub mod sync;
pub mod types;
pub mod webhooks;

#[cfg(test)]
mod test_utils;
