//! Version value layer
//!
//! This module provides the semantic version value type together with the template
//! language used to render it and to parse it back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  compile   ┌─────────────┐
//! │  "v%M.%m.%p │───────────▶│  Template   │ (cached per template string)
//! │      %s"    │            │ tokens+regex│
//! └─────────────┘            └─────────────┘
//!                              │        ▲
//!                        parse │        │ format
//!                              ▼        │
//!                            ┌─────────────┐
//!                            │   Version   │ (Ord, Display, FromStr)
//!                            └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: The `Version` value, its validation and ordering
//! - [`template`]: Template tokenizer, renderer and matcher compilation
//! - [`error`]: Error types for construction and parsing

pub mod error;
pub mod semver;
pub mod template;

pub use error::VersionError;
pub use semver::Version;
