//! Sharded mirror locations.
//!
//! Mirrors live under a configured root, one directory level per digit of the
//! ebook ID except the last, so no single directory accumulates more than ten
//! shard subdirectories:
//!
//! ```text
//! <root>/0/7/            ebook 7
//! <root>/4/42/           ebook 42
//! <root>/1/0/100/        ebook 100
//! <root>/1/2/3/4/12345/  ebook 12345
//! ```

use std::fmt;
use std::path::Path;

use crate::types::EbookId;

/// Where the mirror for one ebook lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocation {
    ebook_id: EbookId,
    path: String,
}

impl RepositoryLocation {
    pub fn ebook_id(&self) -> &EbookId {
        &self.ebook_id
    }

    /// The mirror directory, always ending in `/`.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }
}

impl fmt::Display for RepositoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Resolves the mirror directory for `ebook_id` under `root`.
///
/// `root` must end with a path separator; [`Config`](crate::config::Config)
/// guarantees this for configured roots. The result is a pure function of its
/// inputs.
///
/// # Examples
///
/// ```
/// use ebook_sync::sync::resolve;
/// use ebook_sync::types::EbookId;
///
/// let id = EbookId::parse("12345").unwrap();
/// assert_eq!(resolve("/srv/ebooks/", &id).as_str(), "/srv/ebooks/1/2/3/4/12345/");
///
/// let id = EbookId::parse("7").unwrap();
/// assert_eq!(resolve("/srv/ebooks/", &id).as_str(), "/srv/ebooks/0/7/");
/// ```
pub fn resolve(root: &str, ebook_id: &EbookId) -> RepositoryLocation {
    let id = ebook_id.as_str();

    // All-ASCII by construction, so byte indexing splits on characters
    let shard_digits = &id[..id.len() - 1];

    let mut path = String::with_capacity(root.len() + 2 * id.len() + 2);
    path.push_str(root);

    if shard_digits.is_empty() {
        path.push_str("0/");
    } else {
        for digit in shard_digits.chars() {
            path.push(digit);
            path.push('/');
        }
    }

    path.push_str(id);
    path.push('/');

    RepositoryLocation {
        ebook_id: ebook_id.clone(),
        path,
    }
}
