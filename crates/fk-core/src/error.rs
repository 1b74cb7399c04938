use thiserror::Error;

use crate::replicate::TargetFailure;
use crate::target::Target;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    #[error("token is empty")]
    EmptyToken,

    #[error("token '{token}' contains invalid character {character:?}")]
    InvalidCharacter { token: String, character: char },

    #[error("token '{0}' is already managed")]
    DuplicateToken(String),

    #[error("index {index} out of range ({len} managed tokens)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("token '{0}' is not managed")]
    UnknownToken(String),

    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("failed to read flags for {target}: {reason}")]
    TargetReadFailed { target: Target, reason: String },

    #[error("failed to write flags for {target}: {reason}")]
    TargetWriteFailed { target: Target, reason: String },

    #[error("{} target(s) failed: {}", .0.len(), describe_failures(.0))]
    PartialApply(Vec<TargetFailure>),
}

fn describe_failures(failures: &[TargetFailure]) -> String {
    failures
        .iter()
        .map(|f| f.error.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, FlagError>;
