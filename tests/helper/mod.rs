//! Shared helpers for integration tests

pub mod tree;

pub use tree::{TestTree, write_marker};
