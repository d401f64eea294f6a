//! Error handling for lzfind operations
//!
//! This module re-exports the error types used throughout the crate.
//! Errors use thiserror and surface only at construction time; the
//! scanning paths prune degenerate states instead of raising.

pub use crate::common::LzFindError;
pub use crate::common::Result;
