//! Managed feature-flag reconciliation.
//!
//! A user curates a list of managed tokens, each switched on or off. Build
//! targets own larger `;`-joined flag strings that other tools also edit.
//! Reconciliation rewrites a target's flags so every managed token matches
//! its switch while every other flag passes through untouched.
//!
//! Zero I/O: persistence and target flag storage are reached only through
//! the [`Persistence`] and [`TargetFlags`] traits.

pub mod collaborator;
pub mod constants;
pub mod error;
pub mod flags;
pub mod managed;
pub mod memory;
pub mod reconcile;
pub mod replicate;
pub mod state;
pub mod store;
pub mod target;
pub mod token;

pub use collaborator::{CollaboratorError, Persistence, TargetFlags};
pub use constants::{DEFAULT_SEED_TOKEN, MANAGED_TOKENS_KEY, SEPARATOR};
pub use error::{FlagError, Result};
pub use flags::{FlagSet, join_flags};
pub use managed::{ManagedEntry, ManagedList};
pub use memory::{MemoryPersistence, MemoryTargetFlags};
pub use reconcile::reconcile;
pub use replicate::{
    ApplyOutcome, ApplyReport, Applied, TargetFailure, apply_to_all, apply_to_one,
};
pub use state::{derive_from_external, ensure_size, toggle};
pub use store::ManagedSetStore;
pub use target::{ParseTargetError, Target};
pub use token::{Token, validate};
