//! The sync engine: walks the remote tree, keeps the tag hierarchy in line with it, and
//! catalogs every file it finds under the tags of the folders it sits in.

pub mod context;
pub mod repository;
pub mod service;
pub mod stats;
pub mod walker;

#[cfg(test)]
mod tests;

pub use stats::{SyncReport, SyncRun, SyncStats};
