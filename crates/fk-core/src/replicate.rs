//! Writing reconciled flags back to one target or to every target.
//!
//! Targets are independent: there is no transaction spanning them, and
//! one target failing never stops the others from being attempted.

use std::collections::HashSet;

use crate::collaborator::TargetFlags;
use crate::error::{FlagError, Result};
use crate::flags::{FlagSet, join_flags};
use crate::managed::ManagedList;
use crate::target::Target;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The flag string changed and was written.
    Updated,
    /// The reconciled string equals the stored one; nothing was written.
    Unchanged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub flags: Vec<String>,
    pub outcome: ApplyOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetFailure {
    pub target: Target,
    pub error: FlagError,
}

/// Per-target results of [`apply_to_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub updated: Vec<Target>,
    pub unchanged: Vec<Target>,
    pub failures: Vec<TargetFailure>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.updated.len() + self.unchanged.len() + self.failures.len()
    }

    /// `PartialApply` listing every failure if any target failed.
    pub fn into_result(self) -> Result<Self> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(FlagError::PartialApply(self.failures))
        }
    }
}

/// Read `target`'s flags, reconcile them against `list`, write the result
/// back. The write is skipped when the stored string is already identical.
pub fn apply_to_one<F>(target: Target, list: &ManagedList, flags: &F) -> Result<Applied>
where
    F: TargetFlags + ?Sized,
{
    if target.is_unknown() {
        return Err(FlagError::TargetWriteFailed {
            target,
            reason: "the unknown target owns no flags".into(),
        });
    }

    let current = flags
        .get_flags(target)
        .map_err(|e| FlagError::TargetReadFailed {
            target,
            reason: e.to_string(),
        })?;

    let reconciled = list.reconcile(&FlagSet::parse(&current));
    let joined = join_flags(&reconciled);

    if joined == current {
        tracing::debug!("{target}: flags already up to date");
        return Ok(Applied {
            flags: reconciled,
            outcome: ApplyOutcome::Unchanged,
        });
    }

    flags
        .set_flags(target, &joined)
        .map_err(|e| FlagError::TargetWriteFailed {
            target,
            reason: e.to_string(),
        })?;
    tracing::info!("{target}: wrote {} flags", reconciled.len());
    tracing::debug!("{target}: '{current}' -> '{joined}'");

    Ok(Applied {
        flags: reconciled,
        outcome: ApplyOutcome::Updated,
    })
}

/// [`apply_to_one`] for each target in order, skipping the `Unknown`
/// sentinel and repeats. Failures are collected, not propagated.
pub fn apply_to_all<F>(targets: &[Target], list: &ManagedList, flags: &F) -> ApplyReport
where
    F: TargetFlags + ?Sized,
{
    let mut report = ApplyReport::default();
    let mut seen = HashSet::new();

    for &target in targets {
        if target.is_unknown() || !seen.insert(target) {
            continue;
        }
        match apply_to_one(target, list, flags) {
            Ok(applied) => match applied.outcome {
                ApplyOutcome::Updated => report.updated.push(target),
                ApplyOutcome::Unchanged => report.unchanged.push(target),
            },
            Err(error) => {
                tracing::warn!("{error}");
                report.failures.push(TargetFailure { target, error });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTargetFlags;
    use crate::token::Token;

    fn list(pairs: &[(&str, bool)]) -> ManagedList {
        let tokens = pairs.iter().map(|(n, _)| Token::parse(n).unwrap()).collect();
        let states = pairs.iter().map(|(_, on)| *on).collect();
        ManagedList::from_parts(tokens, states)
    }

    #[test]
    fn test_apply_to_one_writes_sorted_string() {
        let flags = MemoryTargetFlags::with_flags([(Target::Ios, "Z;B;A")]);
        let l = list(&[("B", false), ("C", true)]);
        let applied = apply_to_one(Target::Ios, &l, &flags).unwrap();
        assert_eq!(applied.outcome, ApplyOutcome::Updated);
        assert_eq!(applied.flags, vec!["A", "C", "Z"]);
        assert_eq!(flags.flags(Target::Ios), "A;C;Z");
    }

    #[test]
    fn test_apply_to_one_skips_identical_write() {
        let flags = MemoryTargetFlags::with_flags([(Target::Android, "A;C")]);
        let l = list(&[("C", true)]);
        let applied = apply_to_one(Target::Android, &l, &flags).unwrap();
        assert_eq!(applied.outcome, ApplyOutcome::Unchanged);
        assert_eq!(flags.write_count(), 0);
    }

    #[test]
    fn test_apply_to_one_normalizes_messy_string() {
        let flags = MemoryTargetFlags::with_flags([(Target::Android, " C ; A ;")]);
        let l = list(&[("C", true)]);
        let applied = apply_to_one(Target::Android, &l, &flags).unwrap();
        assert_eq!(applied.outcome, ApplyOutcome::Updated);
        assert_eq!(flags.flags(Target::Android), "A;C");
    }

    #[test]
    fn test_apply_to_one_rejects_unknown() {
        let flags = MemoryTargetFlags::new();
        let err = apply_to_one(Target::Unknown, &list(&[]), &flags).unwrap_err();
        assert!(matches!(err, FlagError::TargetWriteFailed { target: Target::Unknown, .. }));
        assert_eq!(flags.write_count(), 0);
    }

    #[test]
    fn test_apply_to_one_read_failure() {
        let flags = MemoryTargetFlags::new();
        flags.fail_reads_for(Target::Ios);
        let err = apply_to_one(Target::Ios, &list(&[("A", true)]), &flags).unwrap_err();
        assert!(matches!(err, FlagError::TargetReadFailed { target: Target::Ios, .. }));
    }

    #[test]
    fn test_apply_to_all_isolates_failure() {
        let flags = MemoryTargetFlags::with_flags([
            (Target::Standalone, "KEEP;OLD"),
            (Target::Ios, "KEEP"),
            (Target::Android, "OLD"),
        ]);
        flags.fail_writes_for(Target::Ios);
        let l = list(&[("OLD", false), ("NEW", true)]);

        let report = apply_to_all(
            &[Target::Standalone, Target::Ios, Target::Android],
            &l,
            &flags,
        );

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].target, Target::Ios);
        assert!(matches!(
            report.failures[0].error,
            FlagError::TargetWriteFailed { target: Target::Ios, .. }
        ));
        assert_eq!(report.updated, vec![Target::Standalone, Target::Android]);
        assert_eq!(flags.flags(Target::Standalone), "KEEP;NEW");
        assert_eq!(flags.flags(Target::Android), "NEW");
        assert_eq!(flags.flags(Target::Ios), "KEEP");
    }

    #[test]
    fn test_apply_to_all_skips_unknown_and_repeats() {
        let flags = MemoryTargetFlags::new();
        let l = list(&[("A", true)]);
        let report = apply_to_all(
            &[Target::Unknown, Target::Ps5, Target::Ps5, Target::Switch],
            &l,
            &flags,
        );
        assert!(report.is_success());
        assert_eq!(report.attempted(), 2);
        assert_eq!(flags.flags(Target::Unknown), "");
        assert_eq!(flags.flags(Target::Switch), "A");
    }

    #[test]
    fn test_apply_to_all_reports_unchanged() {
        let flags = MemoryTargetFlags::with_flags([(Target::Ios, "A")]);
        let l = list(&[("A", true)]);
        let report = apply_to_all(&[Target::Ios, Target::Tvos], &l, &flags);
        assert_eq!(report.unchanged, vec![Target::Ios]);
        assert_eq!(report.updated, vec![Target::Tvos]);
    }

    #[test]
    fn test_into_result() {
        let flags = MemoryTargetFlags::new();
        flags.fail_writes_for(Target::Ios);
        let l = list(&[("A", true)]);

        let ok = apply_to_all(&[Target::Android], &l, &flags).into_result();
        assert!(ok.is_ok());

        let err = apply_to_all(&[Target::Android, Target::Ios], &l, &flags)
            .into_result()
            .unwrap_err();
        match err {
            FlagError::PartialApply(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].target, Target::Ios);
            }
            other => panic!("expected PartialApply, got {other:?}"),
        }
    }
}
