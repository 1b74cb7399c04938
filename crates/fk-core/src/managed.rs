use crate::error::{FlagError, Result};
use crate::flags::FlagSet;
use crate::reconcile::reconcile_pairs;
use crate::state::ensure_size;
use crate::token::{Token, validate};

/// One managed token and whether it should be present in a target's flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManagedEntry {
    pub token: Token,
    pub enabled: bool,
}

/// The user's managed tokens, in insertion order, each paired with its
/// enabled state. Tokens are unique.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManagedList {
    entries: Vec<ManagedEntry>,
}

impl ManagedList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list with every token disabled. Later duplicates are dropped.
    pub fn from_tokens(tokens: impl IntoIterator<Item = Token>) -> Self {
        let mut list = Self::new();
        for token in tokens {
            if !list.contains(token.as_str()) {
                list.entries.push(ManagedEntry {
                    token,
                    enabled: false,
                });
            }
        }
        list
    }

    /// Pair a token list with a parallel state vector, padding or
    /// truncating the states to fit.
    pub fn from_parts(tokens: Vec<Token>, mut states: Vec<bool>) -> Self {
        ensure_size(&mut states, tokens.len());
        let mut list = Self::from_tokens(tokens.iter().cloned());
        for (token, enabled) in tokens.iter().zip(states) {
            if enabled && let Some(idx) = list.position(token.as_str()) {
                list.entries[idx].enabled = true;
            }
        }
        list
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ManagedEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ManagedEntry> {
        self.entries.get(index)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.entries.iter().map(|e| &e.token)
    }

    pub fn states(&self) -> Vec<bool> {
        self.entries.iter().map(|e| e.enabled).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.token.as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Validate `candidate` against this list and append it, disabled.
    /// The list is untouched on error.
    pub fn add(&mut self, candidate: &str) -> Result<&Token> {
        let token = validate(candidate, self.tokens())?;
        self.entries.push(ManagedEntry {
            token,
            enabled: false,
        });
        let last = self.entries.len() - 1;
        Ok(&self.entries[last].token)
    }

    /// Remove a token together with its state.
    pub fn remove_at(&mut self, index: usize) -> Result<ManagedEntry> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    pub fn toggle(&mut self, index: usize, value: bool) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].enabled = value;
        Ok(())
    }

    pub fn toggle_token(&mut self, name: &str, value: bool) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| FlagError::UnknownToken(name.to_string()))?;
        self.toggle(index, value)
    }

    /// Reset every entry's state from membership in `external`.
    pub fn derive_from_external(&mut self, external: &FlagSet) {
        for entry in &mut self.entries {
            entry.enabled = external.contains(entry.token.as_str());
        }
    }

    pub fn reconcile(&self, external: &FlagSet) -> Vec<String> {
        let pairs: Vec<(&Token, bool)> =
            self.entries.iter().map(|e| (&e.token, e.enabled)).collect();
        reconcile_pairs(external, &pairs)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(FlagError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}
