use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Version string does not match the tag format: {0}")]
    NoMatch(String),
}
