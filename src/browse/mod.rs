//! Read-only views over what the sync has built: browsing one node of the hierarchy at a time, and
//! the whole hierarchy at once.

pub mod models;
pub mod service;

#[cfg(test)]
mod tests;

pub use models::*;
