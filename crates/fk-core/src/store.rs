//! Loading and saving the managed token list through [`Persistence`].
//!
//! The persisted value is a JSON array of token strings in insertion
//! order. Enabled state is never persisted: it is derived from a
//! target's flags whenever a host loads the list.

use crate::collaborator::Persistence;
use crate::constants::{DEFAULT_SEED_TOKEN, MANAGED_TOKENS_KEY};
use crate::error::{FlagError, Result};
use crate::managed::{ManagedEntry, ManagedList};
use crate::state::ensure_size;
use crate::token::Token;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagedSetStore {
    seed: Token,
}

impl Default for ManagedSetStore {
    fn default() -> Self {
        Self {
            seed: Token(DEFAULT_SEED_TOKEN.to_string()),
        }
    }
}

impl ManagedSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different first-run seed token.
    pub fn with_seed(seed: &str) -> Result<Self> {
        Ok(Self {
            seed: Token::parse(seed)?,
        })
    }

    pub fn seed(&self) -> &Token {
        &self.seed
    }

    /// The list handed out when nothing has been persisted yet.
    pub fn default_list(&self) -> ManagedList {
        ManagedList::from_tokens([self.seed.clone()])
    }

    /// Read the persisted list. Never fails: a missing value, an
    /// unreachable backend or an undecodable value all yield the
    /// default list. Malformed or repeated entries are dropped.
    pub fn load<P: Persistence + ?Sized>(&self, persistence: &P) -> ManagedList {
        let raw = match persistence.get_string(MANAGED_TOKENS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no persisted managed tokens, seeding '{}'", self.seed);
                return self.default_list();
            }
            Err(e) => {
                tracing::warn!("failed to read managed tokens, using defaults: {e}");
                return self.default_list();
            }
        };

        let names: Vec<String> = match serde_json::from_str(&raw) {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("persisted managed tokens are not a JSON string array: {e}");
                return self.default_list();
            }
        };

        let mut tokens = Vec::with_capacity(names.len());
        for name in &names {
            match Token::parse(name) {
                Ok(token) if !tokens.contains(&token) => tokens.push(token),
                Ok(token) => tracing::warn!("dropping repeated managed token '{token}'"),
                Err(e) => tracing::warn!("dropping persisted token {name:?}: {e}"),
            }
        }
        ManagedList::from_tokens(tokens)
    }

    /// Overwrite the persisted list with `list`'s tokens in order.
    pub fn save<P: Persistence + ?Sized>(&self, persistence: &P, list: &ManagedList) -> Result<()> {
        let tokens: Vec<&Token> = list.tokens().collect();
        let raw = serde_json::to_string(&tokens)
            .map_err(|e| FlagError::PersistenceUnavailable(format!("encode failed: {e}")))?;
        persistence
            .set_string(MANAGED_TOKENS_KEY, &raw)
            .map_err(|e| FlagError::PersistenceUnavailable(e.to_string()))?;
        tracing::info!("saved {} managed tokens", tokens.len());
        Ok(())
    }

    /// Validate and append. The list is unchanged on error.
    pub fn add(list: &mut ManagedList, candidate: &str) -> Result<Token> {
        list.add(candidate).cloned()
    }

    pub fn remove_at(list: &mut ManagedList, index: usize) -> Result<ManagedEntry> {
        list.remove_at(index)
    }

    /// [`remove_at`](Self::remove_at) for callers holding a separate state
    /// vector. Either both vectors lose the entry or neither changes.
    pub fn remove_at_parallel(
        tokens: &mut Vec<Token>,
        states: &mut Vec<bool>,
        index: usize,
    ) -> Result<(Token, bool)> {
        if index >= tokens.len() {
            return Err(FlagError::IndexOutOfRange {
                index,
                len: tokens.len(),
            });
        }
        ensure_size(states, tokens.len());
        Ok((tokens.remove(index), states.remove(index)))
    }
}
