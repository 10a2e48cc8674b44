//! On-disk records kept by the listener.

pub mod log;

pub use log::ActivityLog;
