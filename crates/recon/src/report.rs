//! Uniform, display-ready shape for every module's result.
//!
//! A report is a list of labelled counters plus a flat table whose cells are
//! the exact normalized values the module compared. Missing sides stay
//! `None` so renderers can show them as absent.

use serde::Serialize;

use crate::frequency::FrequencyResult;
use crate::integrity::IntegrityResult;
use crate::key_join::KeyJoinResult;
use crate::mapping::MappingResult;
use crate::module::AuditModule;
use crate::set_audit::{SetAuditKind, SetAuditResult};

const STATUS: &str = "Status";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl ReportTable {
    fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    fn push<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        self.rows.push(cells.into_iter().collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Values of the `Status` column.
    pub fn statuses(&self) -> Vec<&str> {
        match self.column_index(STATUS) {
            Some(idx) => self
                .rows
                .iter()
                .filter_map(|r| r.get(idx).and_then(|v| v.as_deref()))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub module: AuditModule,
    pub title: String,
    /// No discrepancies found.
    pub clean: bool,
    /// Number of discrepancy rows (for the mapping audit: mismatched records).
    pub exceptions: usize,
    pub summary: Vec<Counter>,
    pub table: ReportTable,
}

impl AuditReport {
    fn new(module: AuditModule, clean: bool, exceptions: usize, summary: &[(&str, usize)], table: ReportTable) -> Self {
        Self {
            module,
            title: module.title().to_string(),
            clean,
            exceptions,
            summary: summary
                .iter()
                .map(|(label, value)| Counter {
                    label: label.to_string(),
                    value: *value,
                })
                .collect(),
            table,
        }
    }

    pub fn counter(&self, label: &str) -> Option<usize> {
        self.summary.iter().find(|c| c.label == label).map(|c| c.value)
    }
}

/// Shapes a module result into an [`AuditReport`].
pub trait ToReport {
    fn to_report(&self) -> AuditReport;
}

impl ToReport for SetAuditResult {
    fn to_report(&self) -> AuditReport {
        let (module, key_label, labels) = match self.kind {
            SetAuditKind::ElementIds => (
                AuditModule::ElementIds,
                "Managed Element ID",
                ["Master element IDs", "Dump element IDs", "Missing in dump", "Unauthorized"],
            ),
            SetAuditKind::CellNames => (
                AuditModule::CellNames,
                "Cell Name",
                ["Master cell names", "Dump cell names", "Missing in system", "Extra / unauthorized"],
            ),
        };

        let mut table = ReportTable::new(&[key_label, STATUS]);
        for e in self.exceptions() {
            table.push([Some(e.key), Some(e.status.to_string())]);
        }

        AuditReport::new(
            module,
            self.is_ok(),
            table.len(),
            &[
                (labels[0], self.master_keys),
                (labels[1], self.system_keys),
                (labels[2], self.missing.len()),
                (labels[3], self.unauthorized.len()),
            ],
            table,
        )
    }
}

impl ToReport for IntegrityResult {
    fn to_report(&self) -> AuditReport {
        let mut table = ReportTable::new(&[
            "Cell Name (Master)",
            "Cell ID (Master)",
            "Cell Name (System)",
            "Cell ID (System)",
            STATUS,
        ]);
        for r in self.exceptions() {
            table.push([
                Some(r.master_name.clone()),
                Some(r.master_id.clone()),
                r.system_name.clone(),
                r.system_id.clone(),
                Some(r.status.to_string()),
            ]);
        }

        AuditReport::new(
            AuditModule::Integrity,
            self.is_ok(),
            table.len(),
            &[
                ("Master name+ID pairs", self.master_pairs),
                ("Dump name+ID pairs", self.system_pairs),
                ("Compared rows", self.rows.len()),
                ("Name discrepancies", self.name_discrepancies),
                ("Cell ID mismatches", self.id_mismatches),
            ],
            table,
        )
    }
}

impl ToReport for FrequencyResult {
    fn to_report(&self) -> AuditReport {
        let mut table = ReportTable::new(&[
            "Cell Name",
            "Service Type",
            "EARFCN DL (Master)",
            "EARFCN DL (System)",
            STATUS,
        ]);
        for r in self.exceptions() {
            table.push([
                Some(r.name.clone()),
                Some(r.service_type.clone()),
                Some(r.master_frequency.clone()),
                Some(r.system_frequency.clone()),
                Some(r.status.to_string()),
            ]);
        }

        AuditReport::new(
            AuditModule::Frequency,
            self.is_ok(),
            table.len(),
            &[
                ("Excluded service rows", self.excluded_rows),
                ("Master rows checked", self.master_rows),
                ("Dump rows", self.system_rows),
                ("Compared rows", self.rows.len()),
                ("Matches", self.matches),
                ("Frequency mismatches", self.mismatches),
                ("Unmatched master cells", self.unmatched_master_rows),
            ],
            table,
        )
    }
}

impl ToReport for MappingResult {
    fn to_report(&self) -> AuditReport {
        let mut table = ReportTable::new(&["Cell Name", "Cell ID (Master)", "Cell ID (System)", STATUS]);
        for r in &self.rows {
            table.push([
                Some(r.name.clone()),
                Some(r.master_id.clone()),
                r.system_id.clone(),
                Some(r.status.to_string()),
            ]);
        }

        AuditReport::new(
            AuditModule::Mapping,
            self.is_ok(),
            self.mismatched,
            &[
                ("Total audited", self.total),
                ("Matched", self.matched),
                ("Mismatched", self.mismatched),
                ("Conflicting dump names", self.conflicting_names),
            ],
            table,
        )
    }
}

impl ToReport for KeyJoinResult {
    fn to_report(&self) -> AuditReport {
        let mut columns = self.columns.clone();
        columns.push(STATUS.to_string());
        let mut table = ReportTable {
            columns,
            rows: Vec::with_capacity(self.rows.len()),
        };
        for r in &self.rows {
            table.push(r.values.iter().cloned().chain([Some(r.status.to_string())]));
        }

        AuditReport::new(
            AuditModule::KeyJoin,
            self.is_ok(),
            self.missing_in_system + self.ghost_entries,
            &[
                ("Verified matches", self.verified),
                ("Missing in system", self.missing_in_system),
                ("Ghost entries", self.ghost_entries),
            ],
            table,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::integrity::{IntegrityRow, IntegrityStatus};
    use crate::mapping::{MappingRow, MappingStatus};
    use crate::config::DuplicateNamePolicy;

    #[test]
    fn set_report_lists_exceptions_with_labels() {
        let result = SetAuditResult {
            kind: SetAuditKind::ElementIds,
            master_keys: 3,
            system_keys: 3,
            missing: BTreeSet::from(["A".to_string()]),
            unauthorized: BTreeSet::from(["D".to_string()]),
            matched: BTreeSet::new(),
        };
        let report = result.to_report();
        assert_eq!(report.module, AuditModule::ElementIds);
        assert_eq!(report.table.columns, vec!["Managed Element ID", "Status"]);
        assert_eq!(report.table.statuses(), vec!["MISSING_IN_DUMP", "UNAUTHORIZED"]);
        assert_eq!(report.counter("Missing in dump"), Some(1));
        assert_eq!(report.exceptions, 2);
        assert!(!report.clean);
    }

    #[test]
    fn integrity_report_drops_ok_rows() {
        let row = |status, sys_id: Option<&str>| IntegrityRow {
            master_name: "X".into(),
            master_id: "100".into(),
            system_name: sys_id.map(|_| "X".to_string()),
            system_id: sys_id.map(str::to_string),
            status,
        };
        let result = IntegrityResult {
            master_pairs: 2,
            system_pairs: 2,
            name_discrepancies: 1,
            id_mismatches: 1,
            rows: vec![
                row(IntegrityStatus::Ok, Some("100")),
                row(IntegrityStatus::CellIdMismatch, Some("200")),
                row(IntegrityStatus::NameDiscrepancy, None),
            ],
        };
        let report = result.to_report();
        assert_eq!(report.table.len(), 2);
        assert_eq!(report.table.rows[0][3].as_deref(), Some("200"));
        assert_eq!(report.table.rows[1][3], None);
        assert_eq!(report.counter("Compared rows"), Some(3));
    }

    #[test]
    fn mapping_report_keeps_every_row() {
        let result = MappingResult {
            total: 2,
            matched: 1,
            mismatched: 1,
            conflicting_names: 0,
            policy: DuplicateNamePolicy::LastWins,
            rows: vec![
                MappingRow {
                    name: "Z".into(),
                    master_id: "1".into(),
                    system_id: Some("1".into()),
                    status: MappingStatus::Matched,
                },
                MappingRow {
                    name: "Z".into(),
                    master_id: "2".into(),
                    system_id: Some("1".into()),
                    status: MappingStatus::NotMatchWrongId,
                },
            ],
        };
        let report = result.to_report();
        assert_eq!(report.table.len(), 2);
        assert_eq!(report.exceptions, 1);
        assert_eq!(report.table.statuses(), vec!["MATCHED", "NOT_MATCH_WRONG_ID"]);
    }
}
