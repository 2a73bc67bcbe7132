use std::collections::BTreeSet;

use vaudit_recon::config::{AuditConfig, DuplicateNamePolicy};
use vaudit_recon::engine::{run_all, run_module, ModuleOutcome};
use vaudit_recon::integrity::IntegrityStatus;
use vaudit_recon::set_audit::SetStatus;
use vaudit_recon::{frequency, integrity, mapping, set_audit};
use vaudit_recon::{AuditError, AuditModule, AuditSession, Table, TableRole, TableSet};
use vaudit_recon::model::SheetInfo;

const MASTER_COLUMNS: [&str; 5] = ["MANAGED_ELEMENT_ID", "ALIAS_NAME", "CELL_ID", "SERVICE_TYPE", "EARFCNDL"];
const SYSTEM_COLUMNS: [&str; 4] = ["NodeID", "EUtranCellFDD", "cellid", "earfcndl"];

fn row(values: &[&str]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
        .collect()
}

fn master() -> Table {
    Table::from_rows(
        MASTER_COLUMNS,
        vec![
            row(&["ENB_100", "LTE_100_A;sector 1", "11", "LTE", "1850"]),
            row(&["ENB_100", "LTE_100_B;sector 2", "12", "LTE", "1850.0"]),
            row(&["ENB_200", "LTE_200_A", "21", "LTE", "3050"]),
            row(&["ENB_300", "NR_300_A", "31", "NR", "627264"]),
            row(&["ENB_400", "LTE_400_A", "41", "LTE FDD", "1850"]),
        ],
    )
}

fn system_sheets() -> TableSet {
    let lte = Table::from_rows(
        SYSTEM_COLUMNS,
        vec![
            row(&["enb_100", "lte_100_a", "11", "1850"]),
            row(&["ENB_100", "LTE_100_B", "99", "1850"]),
            row(&["ENB_200", "LTE_200_A", "21", "3075"]),
        ],
    );
    let extra = Table::from_rows(
        SYSTEM_COLUMNS,
        vec![
            row(&["ENB_900", "LTE_900_A", "91", "1850"]),
            row(&["ENB_300", "NR_300_A", "31", "999"]),
        ],
    );
    let sheets = vec![
        SheetInfo { name: "LTE".into(), rows: lte.len() },
        SheetInfo { name: "Extra".into(), rows: extra.len() },
    ];
    TableSet {
        table: Table::concat([lte, extra]),
        sheets,
    }
}

fn session() -> AuditSession {
    AuditSession::new(master(), system_sheets())
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn element_ids_missing_and_unauthorized() {
    let result = set_audit::run_element_ids(
        &Table::from_rows(["MANAGED_ELEMENT_ID"], vec![row(&["A"]), row(&["B"]), row(&["C"])]),
        &Table::from_rows(["NodeID"], vec![row(&["B"]), row(&["C"]), row(&["D"])]),
        &AuditConfig::standard(),
    )
    .unwrap();

    let rows: Vec<(String, SetStatus)> = result.exceptions().into_iter().map(|e| (e.key, e.status)).collect();
    assert_eq!(
        rows,
        vec![("A".to_string(), SetStatus::MissingInDump), ("D".to_string(), SetStatus::Unauthorized)]
    );
}

#[test]
fn session_element_ids() {
    let report = run_module(AuditModule::ElementIds, &session(), &AuditConfig::standard()).unwrap();
    assert_eq!(report.counter("Missing in dump"), Some(1)); // ENB_400
    assert_eq!(report.counter("Unauthorized"), Some(1)); // ENB_900
    assert_eq!(report.table.rows[0][0].as_deref(), Some("ENB_400"));
    assert_eq!(report.table.rows[1][0].as_deref(), Some("ENB_900"));
}

#[test]
fn session_cell_names() {
    let report = run_module(AuditModule::CellNames, &session(), &AuditConfig::standard()).unwrap();
    assert_eq!(report.counter("Missing in system"), Some(1)); // LTE_400_A
    assert_eq!(report.counter("Extra / unauthorized"), Some(1)); // LTE_900_A
    assert_eq!(report.table.statuses(), vec!["MISSING_IN_SYSTEM", "EXTRA_UNAUTHORIZED"]);
}

#[test]
fn integrity_id_mismatch_scenario() {
    let result = integrity::run(
        &Table::from_rows(["ALIAS_NAME", "CELL_ID"], vec![row(&["X", "100"])]),
        &Table::from_rows(["EUtranCellFDD", "cellid"], vec![row(&["X", "200"])]),
        &AuditConfig::standard(),
    )
    .unwrap();
    let rows: Vec<_> = result.exceptions().collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, IntegrityStatus::CellIdMismatch);
    assert_eq!(rows[0].master_id, "100");
    assert_eq!(rows[0].system_id.as_deref(), Some("200"));
}

#[test]
fn integrity_name_discrepancy_scenario() {
    let result = integrity::run(
        &Table::from_rows(["ALIAS_NAME", "CELL_ID"], vec![row(&["Y", "1"])]),
        &Table::from_rows(["EUtranCellFDD", "cellid"], vec![row(&["X", "1"])]),
        &AuditConfig::standard(),
    )
    .unwrap();
    let rows: Vec<_> = result.exceptions().collect();
    assert_eq!(rows[0].status, IntegrityStatus::NameDiscrepancy);
    assert!(rows[0].system_id.is_none());
}

#[test]
fn session_integrity_counts_each_category() {
    let report = run_module(AuditModule::Integrity, &session(), &AuditConfig::standard()).unwrap();
    assert_eq!(report.counter("Cell ID mismatches"), Some(1)); // LTE_100_B 12 vs 99
    assert_eq!(report.counter("Name discrepancies"), Some(1)); // LTE_400_A
    assert_eq!(report.exceptions, 2);
    assert_eq!(report.table.columns[4], "Status");
}

#[test]
fn session_frequency_excludes_nr_and_flags_mismatch() {
    let result = frequency::run(session().master(), session().system(), &AuditConfig::standard()).unwrap();
    assert_eq!(result.excluded_rows, 1);
    assert!(result.rows.iter().all(|r| !r.name.starts_with("NR_")));
    let mismatches: Vec<_> = result.exceptions().collect();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].name, "LTE_200_A");
    assert_eq!(mismatches[0].master_frequency, "3050");
    assert_eq!(mismatches[0].system_frequency, "3075");
    // LTE_400_A has no dump partner.
    assert_eq!(result.unmatched_master_rows, 1);
}

#[test]
fn mapping_repeated_name_scenario() {
    let result = mapping::run(
        &Table::from_rows(["ALIAS_NAME", "CELL_ID"], vec![row(&["Z", "1"]), row(&["Z", "2"])]),
        &Table::from_rows(["EUtranCellFDD", "cellid"], vec![row(&["Z", "1"])]),
        &AuditConfig::standard(),
    )
    .unwrap();
    let statuses: Vec<String> = result.rows.iter().map(|r| r.status.to_string()).collect();
    assert_eq!(statuses, vec!["MATCHED", "NOT_MATCH_WRONG_ID"]);
}

#[test]
fn session_mapping_returns_every_master_row() {
    let s = session();
    let report = run_module(AuditModule::Mapping, &s, &AuditConfig::standard()).unwrap();
    assert_eq!(report.table.len(), s.master().len());
    assert_eq!(report.counter("Total audited"), Some(5));
    assert_eq!(
        report.counter("Matched").unwrap() + report.counter("Mismatched").unwrap(),
        report.counter("Total audited").unwrap()
    );
}

#[test]
fn ambiguous_policy_changes_only_conflicting_rows() {
    let mut config = AuditConfig::standard();
    config.mapping.duplicate_names = DuplicateNamePolicy::Ambiguous;
    let master = Table::from_rows(["ALIAS_NAME", "CELL_ID"], vec![row(&["A", "1"]), row(&["B", "2"])]);
    let system = Table::from_rows(
        ["EUtranCellFDD", "cellid"],
        vec![row(&["A", "1"]), row(&["A", "7"]), row(&["B", "2"])],
    );
    let result = mapping::run(&master, &system, &config).unwrap();
    assert_eq!(result.rows[0].status.to_string(), "AMBIGUOUS_MAPPING");
    assert_eq!(result.rows[1].status.to_string(), "MATCHED");
}

// -------------------------------------------------------------------------
// Module isolation and failure surfacing
// -------------------------------------------------------------------------

#[test]
fn missing_column_is_scoped_to_module() {
    let master = Table::from_rows(["MANAGED_ELEMENT_ID"], vec![row(&["A"])]);
    let system = Table::from_rows(["NodeID"], vec![row(&["A"])]);
    let session = AuditSession::from_tables(master, system);
    let outcomes = run_all(&session, &AuditConfig::standard());

    assert!(matches!(outcomes[0], ModuleOutcome::Completed(_)));
    for outcome in &outcomes[1..] {
        match outcome {
            ModuleOutcome::Failed { error: AuditError::MissingColumn { table, column }, .. } => {
                assert_eq!(*table, TableRole::Master);
                assert_eq!(column, "ALIAS_NAME");
            }
            other => panic!("expected missing column, got {other:?}"),
        }
    }
}

#[test]
fn runs_never_mutate_session_tables() {
    let s = session();
    let before_master = s.master().clone();
    let before_system = s.system().clone();
    let _ = run_all(&s, &AuditConfig::standard());
    assert_eq!(s.master(), &before_master);
    assert_eq!(s.system(), &before_system);
}

#[test]
fn repeated_runs_are_identical() {
    let s = session();
    let config = AuditConfig::standard();
    for module in AuditModule::STANDARD {
        let a = run_module(module, &s, &config).unwrap();
        let b = run_module(module, &s, &config).unwrap();
        let set_a: BTreeSet<_> = a.table.rows.iter().cloned().collect();
        let set_b: BTreeSet<_> = b.table.rows.iter().cloned().collect();
        assert_eq!(set_a, set_b, "{module} not idempotent");
    }
}

#[test]
fn custom_column_names_via_config() {
    let config = AuditConfig::from_toml(
        r#"
[element_ids]
master = "eNodeB"
system = "ManagedElement"
"#,
    )
    .unwrap();
    let master = Table::from_rows(["eNodeB"], vec![row(&["A"])]);
    let system = Table::from_rows(["ManagedElement"], vec![row(&["a "])]);
    let report = run_module(AuditModule::ElementIds, &AuditSession::from_tables(master, system), &config).unwrap();
    assert!(report.clean);
}
