//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Fatal error kinds
//! - Filter configuration (excluded/included names and extensions)
//! - Path normalization and flat-name encoding
//! - Result model (FlatItem, FlatReport)
//! - Rendering functions for different output formats
//! - Console diagnostics
//! - Common utilities

pub mod console;
pub mod error;
pub mod filter;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
