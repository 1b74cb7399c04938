//! The two externally-owned stores the engine reads and writes through.
//!
//! Both take `&self`: implementations backed by a connection or an
//! editor API handle their own mutability.

use crate::target::Target;

pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Flat string key-value persistence that outlives the process.
pub trait Persistence {
    fn get_string(&self, key: &str) -> Result<Option<String>, CollaboratorError>;
    fn set_string(&self, key: &str, value: &str) -> Result<(), CollaboratorError>;
}

/// Per-target `;`-joined flag strings. An unset target reads as `""`.
pub trait TargetFlags {
    fn get_flags(&self, target: Target) -> Result<String, CollaboratorError>;
    fn set_flags(&self, target: Target, flags: &str) -> Result<(), CollaboratorError>;
}
