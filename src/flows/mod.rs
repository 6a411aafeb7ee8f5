//! Flows module - Operations combining multiple backends
//!
//! Provides:
//! - flatten: Walk, filter, encode and copy a tree into one flat directory

pub mod flatten;
