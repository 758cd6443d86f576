//! Git operations module
//!
//! Resolves the current branch and hooks directory, and recognizes release
//! branches

pub mod branch;
pub mod repository;

pub use branch::*;
pub use repository::*;
