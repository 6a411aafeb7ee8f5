//! Backends module - File system operations
//!
//! Provides:
//! - walk: Directory traversal with walkdir, pruning and .gitignore matching
//! - copy: Output directory preparation and streamed file copies

pub mod copy;
pub mod walk;
