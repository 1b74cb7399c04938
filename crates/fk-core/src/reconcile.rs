use crate::flags::FlagSet;
use crate::token::Token;

/// Compute a target's new flag list from its current flags and the
/// managed tokens' enabled state.
///
/// Every managed token is first cleared from a copy of `external`, then
/// the enabled ones are inserted back. Flags outside `managed` pass
/// through unchanged. `state` entries missing past the end of `managed`
/// count as disabled. The result is sorted byte-wise so equal sets
/// always serialize identically.
pub fn reconcile(external: &FlagSet, managed: &[Token], state: &[bool]) -> Vec<String> {
    let pairs: Vec<(&Token, bool)> = managed
        .iter()
        .enumerate()
        .map(|(i, token)| (token, state.get(i).copied().unwrap_or(false)))
        .collect();
    reconcile_pairs(external, &pairs)
}

pub(crate) fn reconcile_pairs(external: &FlagSet, pairs: &[(&Token, bool)]) -> Vec<String> {
    let mut working = external.clone();

    for (token, _) in pairs {
        working.remove(token.as_str());
    }
    for (token, enabled) in pairs {
        if *enabled {
            working.insert(token.as_str());
        }
    }

    working.into_sorted()
}
