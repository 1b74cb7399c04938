//! Parallel-vector form of the per-token enabled state.
//!
//! [`ManagedList`](crate::ManagedList) keeps token and state paired, so
//! these helpers are for callers that hold a separate `Vec<bool>` next
//! to their token list.

use crate::error::{FlagError, Result};
use crate::flags::FlagSet;
use crate::token::Token;

/// Pad with `false` or truncate from the tail so `state.len() == len`.
pub fn ensure_size(state: &mut Vec<bool>, len: usize) {
    state.resize(len, false);
}

/// One entry per token: `true` iff the external set contains it.
pub fn derive_from_external<'a, I>(tokens: I, external: &FlagSet) -> Vec<bool>
where
    I: IntoIterator<Item = &'a Token>,
{
    tokens
        .into_iter()
        .map(|t| external.contains(t.as_str()))
        .collect()
}

pub fn toggle(state: &mut [bool], index: usize, value: bool) -> Result<()> {
    let len = state.len();
    let slot = state
        .get_mut(index)
        .ok_or(FlagError::IndexOutOfRange { index, len })?;
    *slot = value;
    Ok(())
}
