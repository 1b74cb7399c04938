use std::collections::BTreeSet;

use crate::constants::SEPARATOR;

/// The flag set a target owns, parsed from its `;`-joined flag string.
///
/// Entries are not validated: other tools write to the same string and
/// whatever they put there must survive reconciliation untouched.
/// Iteration order is the byte-wise lexicographic order of the flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagSet {
    flags: BTreeSet<String>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split on `;`, trim each segment, drop empty segments.
    pub fn parse(raw: &str) -> Self {
        raw.split(SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn insert(&mut self, flag: impl Into<String>) -> bool {
        self.flags.insert(flag.into())
    }

    pub fn remove(&mut self, flag: &str) -> bool {
        self.flags.remove(flag)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    pub fn into_sorted(self) -> Vec<String> {
        self.flags.into_iter().collect()
    }

    pub fn to_flag_string(&self) -> String {
        join_flags(self.iter())
    }
}

impl<'a> FromIterator<&'a str> for FlagSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().map(str::to_string).collect(),
        }
    }
}

impl FromIterator<String> for FlagSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

/// Join flags with `;` and no padding, in the order given.
pub fn join_flags<I, S>(flags: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, flag) in flags.into_iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(flag.as_ref());
    }
    out
}
