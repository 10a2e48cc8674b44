//! Mirror synchronisation: locating a mirror, checking whether it is behind,
//! and pulling it.

pub mod executor;
pub mod path;
pub mod state;

pub use executor::{SyncError, sync};
pub use path::{RepositoryLocation, resolve};
pub use state::{CheckError, needs_sync};
