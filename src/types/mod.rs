//! Core domain types for the ebook sync listener.

pub mod ids;

pub use ids::{EbookId, InvalidEbookId, Sha};
