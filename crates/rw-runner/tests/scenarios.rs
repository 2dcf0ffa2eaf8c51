//! End-to-end runner scenarios against an in-memory DuckDB store.

use rw_core::{ScriptId, ScriptKind};
use rw_db::{Ledger, Store};
use rw_runner::{Direction, ExecutionMode, RunEvent, Runner, RunnerError, ScriptRegistry};
use std::fs;
use tempfile::TempDir;

const A: &str = "20240101000000-x";
const B: &str = "20240101000001-y";
const C: &str = "20240101000002-z";

fn id(name: &str) -> ScriptId {
    ScriptId::try_new(name).unwrap()
}

fn script_dir(scripts: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in scripts {
        fs::write(dir.path().join(format!("{name}.sql")), content).unwrap();
    }
    dir
}

fn runner(dir: &TempDir) -> Runner {
    Runner::initialize(Store::open_memory().unwrap(), ScriptKind::Migration, dir.path()).unwrap()
}

fn reversible(table: &str) -> String {
    format!("-- up\nCREATE TABLE {table} (id INT);\n-- down\nDROP TABLE {table};\n")
}

/// Collects "<direction> <id>" for every completed script
fn completed(log: &mut Vec<String>) -> impl FnMut(RunEvent<'_>) + '_ {
    move |event| {
        if let RunEvent::Completed { id, direction } = event {
            log.push(format!("{direction} {id}"));
        }
    }
}

#[test]
fn apply_all_runs_ascending_and_undo_all_descending() {
    let dir = script_dir(&[(B, &reversible("y")), (A, &reversible("x"))]);
    let runner = runner(&dir);

    let mut log = Vec::new();
    runner.apply_all(completed(&mut log)).unwrap();
    runner.undo_all(completed(&mut log)).unwrap();

    assert_eq!(
        log,
        vec![
            format!("up {A}"),
            format!("up {B}"),
            format!("down {B}"),
            format!("down {A}"),
        ]
    );
    assert!(runner.executed().unwrap().is_empty());
}

#[test]
fn apply_then_undo_restores_ledger() {
    let dir = script_dir(&[(A, &reversible("x")), (B, &reversible("y"))]);
    let runner = runner(&dir);
    runner.apply(&id(A)).unwrap();
    let before = runner.executed().unwrap();

    runner.apply(&id(B)).unwrap();
    runner.revert(&id(B)).unwrap();

    assert_eq!(runner.executed().unwrap(), before);
    assert!(!runner.store().relation_exists("y").unwrap());
}

#[test]
fn duplicate_apply_is_rejected_by_ledger() {
    let store = Store::open_memory().unwrap();
    let ledger = Ledger::new(&store, "migrations");
    ledger.ensure_schema().unwrap();
    ledger.record_executed(&id(A)).unwrap();

    let err = ledger.record_executed(&id(A)).unwrap_err();
    assert!(matches!(err, rw_db::DbError::DuplicateEntry { .. }));
    assert_eq!(ledger.list_executed().unwrap(), vec![id(A)]);
}

#[test]
fn duplicate_apply_through_runner() {
    let dir = script_dir(&[(A, "-- up\nSELECT 1;\n")]);
    let runner = runner(&dir);
    runner.apply(&id(A)).unwrap();

    let err = runner.apply(&id(A)).unwrap_err();
    match err {
        RunnerError::DuplicateEntry { id: dup, table } => {
            assert_eq!(dup, A);
            assert_eq!(table, "migrations");
        }
        other => panic!("expected DuplicateEntry, got {other:?}"),
    }
    assert_eq!(runner.ledger_entries().unwrap().len(), 1);
}

#[test]
fn undo_without_reverse_keeps_entry() {
    let dir = script_dir(&[(A, "-- up\nCREATE TABLE x (id INT);\n")]);
    let runner = runner(&dir);

    runner.apply_all(|_| {}).unwrap();
    assert!(runner.status().unwrap()[0].executed);

    let err = runner.undo_last(|_| {}).unwrap_err();
    assert!(matches!(
        err,
        RunnerError::MissingOperation {
            direction: Direction::Down,
            ..
        }
    ));
    assert_eq!(runner.executed().unwrap(), vec![id(A)]);
    assert!(runner.store().relation_exists("x").unwrap());
}

#[test]
fn empty_directory_has_nothing_to_do() {
    let dir = script_dir(&[]);
    let runner = runner(&dir);

    assert!(runner.pending().unwrap().is_empty());
    assert!(runner.state().unwrap().is_empty());
    assert!(runner.apply_all(|_| {}).unwrap().is_empty());
    assert_eq!(runner.undo_last(|_| {}).unwrap(), None);
    assert!(runner.undo_all(|_| {}).unwrap().is_empty());
}

#[test]
fn missing_directory_has_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    let runner = Runner::initialize(
        Store::open_memory().unwrap(),
        ScriptKind::Seed,
        dir.path().join("seeders"),
    )
    .unwrap();
    assert!(runner.pending().unwrap().is_empty());
}

#[test]
fn failure_halts_after_recording_earlier_scripts() {
    let dir = script_dir(&[
        (A, &reversible("x")),
        (B, "-- up\nINSERT INTO missing_table VALUES (1);\n"),
        (C, &reversible("z")),
    ]);
    let runner = runner(&dir);

    let mut started = Vec::new();
    let mut failed = None;
    let err = runner
        .apply_all(|event| match event {
            RunEvent::Started { id, .. } => started.push(id.to_string()),
            RunEvent::Failed { id, error, .. } => {
                failed = Some((id.to_string(), error.to_string()))
            }
            RunEvent::Completed { .. } => {}
        })
        .unwrap_err();

    assert_eq!(err.script_id(), Some(B));
    assert_eq!(started, vec![A.to_string(), B.to_string()]);
    let (failed_id, message) = failed.unwrap();
    assert_eq!(failed_id, B);
    assert!(message.contains("missing_table"));

    assert_eq!(runner.executed().unwrap(), vec![id(A)]);
    assert_eq!(runner.pending().unwrap(), vec![id(B), id(C)]);
    assert!(!runner.store().relation_exists("z").unwrap());
}

#[test]
fn undo_all_stops_at_first_failure() {
    let dir = script_dir(&[
        (A, &reversible("x")),
        (B, "-- up\nCREATE TABLE y (id INT);\n"),
        (C, &reversible("z")),
    ]);
    let runner = runner(&dir);
    runner.apply_all(|_| {}).unwrap();

    let err = runner.undo_all(|_| {}).unwrap_err();
    assert_eq!(err.script_id(), Some(B));
    assert_eq!(runner.executed().unwrap(), vec![id(A), id(B)]);
    assert!(!runner.store().relation_exists("z").unwrap());
}

#[test]
fn transactional_mode_rolls_back_partial_effects() {
    let dir = script_dir(&[(
        A,
        "-- up\nCREATE TABLE x (id INT);\nINSERT INTO missing_table VALUES (1);\n",
    )]);
    let runner = runner(&dir).with_mode(ExecutionMode::Transactional);

    let err = runner.apply(&id(A)).unwrap_err();
    assert!(matches!(err, RunnerError::ScriptRuntime { .. }));
    assert!(!runner.store().relation_exists("x").unwrap());
    assert!(runner.executed().unwrap().is_empty());

    // The store is usable again after the rollback.
    runner
        .store()
        .execute_batch("CREATE TABLE after_rollback (id INT)")
        .unwrap();
}

#[test]
fn transactional_duplicate_rolls_back_effect() {
    let dir = script_dir(&[(
        A,
        "-- up\nCREATE TABLE IF NOT EXISTS x (id INT);\nINSERT INTO x VALUES (1);\n",
    )]);
    let runner = runner(&dir).with_mode(ExecutionMode::Transactional);
    runner.apply(&id(A)).unwrap();

    let err = runner.apply(&id(A)).unwrap_err();
    assert!(matches!(err, RunnerError::DuplicateEntry { .. }));

    let rows: i64 = runner
        .store()
        .conn()
        .query_row("SELECT COUNT(*) FROM x", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn registry_loader_drives_runner() {
    let dir = script_dir(&[(A, ""), (B, "")]);
    let mut registry = ScriptRegistry::new();
    registry
        .register_reversible(
            A,
            |ctx| Ok(ctx.execute_batch("CREATE TABLE accounts (id INT)")?),
            |ctx| Ok(ctx.execute_batch("DROP TABLE accounts")?),
        )
        .register(B, |ctx| {
            ctx.execute_batch("INSERT INTO accounts VALUES (42)")?;
            Ok(())
        });

    let runner = Runner::with_loader(
        Store::open_memory().unwrap(),
        ScriptKind::Seed,
        dir.path(),
        registry,
    )
    .unwrap();

    assert_eq!(runner.apply_all(|_| {}).unwrap(), vec![id(A), id(B)]);
    assert!(runner.store().relation_exists("seeders").unwrap());

    let err = runner.undo_last(|_| {}).unwrap_err();
    assert!(matches!(err, RunnerError::MissingOperation { .. }));
    assert_eq!(runner.executed().unwrap(), vec![id(A), id(B)]);
}

#[test]
fn ledger_survives_reopen() {
    let dir = script_dir(&[(A, &reversible("x"))]);
    let db = TempDir::new().unwrap();
    let db_path = db.path().join("app.duckdb");

    let first = Runner::initialize(
        Store::open_path(&db_path).unwrap(),
        ScriptKind::Migration,
        dir.path(),
    )
    .unwrap();
    first.apply_all(|_| {}).unwrap();
    first.close().unwrap();

    let second = Runner::initialize(
        Store::open_path(&db_path).unwrap(),
        ScriptKind::Migration,
        dir.path(),
    )
    .unwrap();
    assert_eq!(second.executed().unwrap(), vec![id(A)]);
    assert!(second.pending().unwrap().is_empty());
}
