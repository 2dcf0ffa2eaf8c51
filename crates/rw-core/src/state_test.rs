use super::*;
use std::collections::BTreeSet;

fn ids(names: &[&str]) -> Vec<ScriptId> {
    names.iter().map(|n| ScriptId::try_new(*n).unwrap()).collect()
}

#[test]
fn test_pending_preserves_scanned_order() {
    let scanned = ids(&["20240101000000-a", "20240101000001-b", "20240101000002-c"]);
    let executed = ids(&["20240101000001-b"]);

    let state = ExecutionState::compute(&scanned, &executed);
    assert_eq!(state.pending, ids(&["20240101000000-a", "20240101000002-c"]));
    assert_eq!(state.executed, executed);
    assert_eq!(state.executed_count(), 1);
    assert_eq!(state.pending_count(), 2);
}

#[test]
fn test_status_flags_each_scanned_script() {
    let scanned = ids(&["20240101000000-a", "20240101000001-b"]);
    let executed = ids(&["20240101000000-a"]);

    let state = ExecutionState::compute(&scanned, &executed);
    let flags: Vec<(&str, bool)> = state
        .status
        .iter()
        .map(|s| (s.name.as_str(), s.executed))
        .collect();
    assert_eq!(
        flags,
        vec![("20240101000000-a", true), ("20240101000001-b", false)]
    );
}

#[test]
fn test_partition_laws_for_every_subset() {
    let scanned = ids(&[
        "20240101000000-a",
        "20240101000001-b",
        "20240101000002-c",
        "20240101000003-d",
    ]);

    for mask in 0u32..(1 << scanned.len()) {
        let executed: Vec<ScriptId> = scanned
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, id)| id.clone())
            .collect();

        let state = ExecutionState::compute(&scanned, &executed);
        let pending: BTreeSet<&ScriptId> = state.pending.iter().collect();
        let done: BTreeSet<&ScriptId> = executed.iter().collect();
        let all: BTreeSet<&ScriptId> = scanned.iter().collect();

        assert!(pending.is_disjoint(&done), "mask {mask:b}");
        let union: BTreeSet<&ScriptId> = pending.union(&done).copied().collect();
        assert_eq!(union, all, "mask {mask:b}");
    }
}

#[test]
fn test_empty_inputs() {
    let state = ExecutionState::compute(&[], &[]);
    assert!(state.is_empty());
    assert!(state.pending.is_empty());
    assert!(state.executed.is_empty());
}

#[test]
fn test_orphaned_ledger_entries() {
    let scanned = ids(&["20240101000001-b"]);
    let executed = ids(&["20240101000000-gone", "20240101000001-b"]);

    let state = ExecutionState::compute(&scanned, &executed);
    assert!(state.pending.is_empty());
    assert_eq!(state.orphaned(), vec![&executed[0]]);
    assert_eq!(state.executed_count(), 1);
}
