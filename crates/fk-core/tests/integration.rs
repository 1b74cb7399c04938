//! End-to-end flows across the core modules using the in-memory
//! collaborators, plus property checks on reconciliation.

use fk_core::{
    FlagError, FlagSet, ManagedList, ManagedSetStore, MemoryPersistence, MemoryTargetFlags,
    Target, TargetFlags, Token, apply_to_all, apply_to_one, derive_from_external, ensure_size,
    join_flags, reconcile, toggle, validate,
};
use proptest::prelude::*;

fn tokens(names: &[&str]) -> Vec<Token> {
    names.iter().map(|n| Token::parse(n).unwrap()).collect()
}

/// First session: seed, add tokens, switch some on, push to one target.
/// Second session: reload, re-derive from the target, push to all.
#[test]
fn session_lifecycle() {
    let persistence = MemoryPersistence::new();
    let flags = MemoryTargetFlags::with_flags([
        (Target::Standalone, "UNITY_POST_PROCESSING;ODIN_INSPECTOR"),
        (Target::Ios, "ODIN_INSPECTOR"),
        (Target::Android, ""),
    ]);
    let store = ManagedSetStore::new();

    let mut list = store.load(&persistence);
    assert_eq!(list.len(), 1);
    ManagedSetStore::add(&mut list, "CHEATS").unwrap();
    ManagedSetStore::add(&mut list, "VERBOSE_NET").unwrap();
    list.derive_from_external(&FlagSet::parse(&flags.get_flags(Target::Standalone).unwrap()));
    list.toggle_token("CHEATS", true).unwrap();
    store.save(&persistence, &list).unwrap();

    apply_to_one(Target::Standalone, &list, &flags).unwrap();
    assert_eq!(
        flags.flags(Target::Standalone),
        "CHEATS;ODIN_INSPECTOR;UNITY_POST_PROCESSING"
    );

    // Next session: enabled state comes from the target, not persistence.
    let mut list = store.load(&persistence);
    let names: Vec<&str> = list.tokens().map(Token::as_str).collect();
    assert_eq!(names, vec![fk_core::DEFAULT_SEED_TOKEN, "CHEATS", "VERBOSE_NET"]);
    assert_eq!(list.states(), vec![false, false, false]);

    list.derive_from_external(&FlagSet::parse(&flags.get_flags(Target::Standalone).unwrap()));
    assert_eq!(list.states(), vec![false, true, false]);

    let report = apply_to_all(&Target::known().collect::<Vec<_>>(), &list, &flags);
    assert!(report.is_success());
    assert_eq!(flags.flags(Target::Ios), "CHEATS;ODIN_INSPECTOR");
    assert_eq!(flags.flags(Target::Android), "CHEATS");
    assert_eq!(report.unchanged, vec![Target::Standalone]);
}

#[test]
fn managed_off_on_with_unmanaged_kept() {
    let external = FlagSet::parse("A;B");
    let managed = tokens(&["B", "C"]);
    let out = reconcile(&external, &managed, &[false, true]);
    assert_eq!(join_flags(&out), "A;C");
}

#[test]
fn parallel_vector_workflow() {
    let mut managed = tokens(&["A", "B"]);
    let mut state = vec![true];

    ensure_size(&mut state, managed.len());
    assert_eq!(state, vec![true, false]);

    let added = validate("C", &managed).unwrap();
    managed.push(added);
    ensure_size(&mut state, managed.len());
    toggle(&mut state, 2, true).unwrap();
    assert!(toggle(&mut state, 3, true).is_err());

    let external = FlagSet::parse("B;X");
    let out = reconcile(&external, &managed, &state);
    assert_eq!(out, vec!["A", "C", "X"]);

    state = derive_from_external(&managed, &FlagSet::parse(&join_flags(&out)));
    assert_eq!(state, vec![true, false, true]);
}

#[test]
fn remove_out_of_range_leaves_everything() {
    let mut tokens = tokens(&["A", "B"]);
    let mut states = vec![true, false];
    let err = ManagedSetStore::remove_at_parallel(&mut tokens, &mut states, 5).unwrap_err();
    assert_eq!(err, FlagError::IndexOutOfRange { index: 5, len: 2 });
    assert_eq!(tokens.len(), 2);
    assert_eq!(states, vec![true, false]);
}

#[test]
fn one_failing_target_of_three() {
    let flags = MemoryTargetFlags::with_flags([
        (Target::Standalone, "A"),
        (Target::Ios, "A"),
        (Target::WebGl, "A"),
    ]);
    flags.fail_writes_for(Target::Ios);
    let mut list = ManagedList::new();
    list.add("B").unwrap();
    list.toggle(0, true).unwrap();

    let report = apply_to_all(
        &[Target::Unknown, Target::Standalone, Target::Ios, Target::WebGl],
        &list,
        &flags,
    );

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].target, Target::Ios);
    assert_eq!(flags.flags(Target::Standalone), "A;B");
    assert_eq!(flags.flags(Target::WebGl), "A;B");
    assert_eq!(flags.flags(Target::Ios), "A");
}

#[test]
fn validation_rejections() {
    let none: Vec<Token> = Vec::new();
    assert!(validate("a b", &none).is_err());
    assert!(validate("a;b", &none).is_err());
    assert!(validate("", &none).is_err());
    assert!(validate("  ", &none).is_err());
    assert!(validate("Debug_X", &none).is_ok());
    assert!(validate("Debug_X", &tokens(&["Debug_X"])).is_err());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn flag_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,6}"
}

/// (external set, unique managed tokens, state vector of arbitrary length)
fn inputs() -> impl Strategy<Value = (FlagSet, Vec<Token>, Vec<bool>)> {
    (
        prop::collection::vec(flag_name(), 0..12),
        prop::collection::btree_set(flag_name(), 0..8),
        prop::collection::vec(any::<bool>(), 0..10),
    )
        .prop_map(|(external, managed, state)| {
            let external: FlagSet = external.into_iter().collect();
            let managed: Vec<Token> = managed
                .iter()
                .map(|n| Token::parse(n).unwrap())
                .collect();
            (external, managed, state)
        })
}

proptest! {
    #[test]
    fn reconcile_is_idempotent((external, managed, state) in inputs()) {
        let once = reconcile(&external, &managed, &state);
        let again_input: FlagSet = once.iter().map(String::as_str).collect();
        let twice = reconcile(&again_input, &managed, &state);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn reconcile_preserves_unmanaged((external, managed, state) in inputs(), probe in flag_name()) {
        prop_assume!(!managed.iter().any(|t| t.as_str() == probe));
        let out = reconcile(&external, &managed, &state);
        prop_assert_eq!(external.contains(&probe), out.contains(&probe));
        for flag in external.iter() {
            if !managed.iter().any(|t| t.as_str() == flag) {
                prop_assert!(out.iter().any(|f| f == flag));
            }
        }
    }

    #[test]
    fn reconcile_matches_state((external, managed, state) in inputs()) {
        let out = reconcile(&external, &managed, &state);
        for (i, token) in managed.iter().enumerate() {
            let enabled = state.get(i).copied().unwrap_or(false);
            prop_assert_eq!(out.iter().any(|f| f == token.as_str()), enabled);
        }
    }

    #[test]
    fn reconcile_is_deterministic_and_sorted((external, managed, state) in inputs()) {
        let a = join_flags(reconcile(&external, &managed, &state));
        let b = join_flags(reconcile(&external.clone(), &managed.clone(), &state.clone()));
        prop_assert_eq!(&a, &b);

        let out = reconcile(&external, &managed, &state);
        prop_assert!(out.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn paired_list_agrees_with_parallel_vectors((external, managed, state) in inputs()) {
        let list = ManagedList::from_parts(managed.clone(), state.clone());
        prop_assert_eq!(list.reconcile(&external), reconcile(&external, &managed, &state));
    }
}
