//! Integration tests for vigil-validator.
//!
//! - `engine`: traversal, deduplication, groups and structural constraints
//! - `metadata`: hierarchy merging, scopes and declaration errors

mod common;
mod engine;
mod metadata;
