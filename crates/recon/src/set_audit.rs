//! Set-difference audits over element ids and cell names.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::model::{Table, TableRole};
use crate::normalize::{anchor_with, clean};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetAuditKind {
    ElementIds,
    CellNames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetStatus {
    /// Element id in master, absent from the dump.
    MissingInDump,
    /// Element id in the dump, not in master.
    Unauthorized,
    /// Cell name in master, absent from the dump.
    MissingInSystem,
    /// Cell name in the dump, not in master.
    ExtraUnauthorized,
}

impl std::fmt::Display for SetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInDump => write!(f, "MISSING_IN_DUMP"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::MissingInSystem => write!(f, "MISSING_IN_SYSTEM"),
            Self::ExtraUnauthorized => write!(f, "EXTRA_UNAUTHORIZED"),
        }
    }
}

impl SetAuditKind {
    pub fn missing_status(&self) -> SetStatus {
        match self {
            Self::ElementIds => SetStatus::MissingInDump,
            Self::CellNames => SetStatus::MissingInSystem,
        }
    }

    pub fn extra_status(&self) -> SetStatus {
        match self {
            Self::ElementIds => SetStatus::Unauthorized,
            Self::CellNames => SetStatus::ExtraUnauthorized,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SetException {
    pub key: String,
    pub status: SetStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetAuditResult {
    pub kind: SetAuditKind,
    pub master_keys: usize,
    pub system_keys: usize,
    /// Present in master, absent from system.
    pub missing: BTreeSet<String>,
    /// Present in system, absent from master.
    pub unauthorized: BTreeSet<String>,
    #[serde(skip)]
    pub matched: BTreeSet<String>,
}

impl SetAuditResult {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.unauthorized.is_empty()
    }

    /// One row per missing key, then one per unauthorized key, each sorted.
    pub fn exceptions(&self) -> Vec<SetException> {
        let missing = self.missing.iter().map(|k| SetException {
            key: k.clone(),
            status: self.kind.missing_status(),
        });
        let extra = self.unauthorized.iter().map(|k| SetException {
            key: k.clone(),
            status: self.kind.extra_status(),
        });
        missing.chain(extra).collect()
    }
}

/// Partition two key sets into (missing, unauthorized, matched).
pub fn diff_sets(
    master: &BTreeSet<String>,
    system: &BTreeSet<String>,
) -> (BTreeSet<String>, BTreeSet<String>, BTreeSet<String>) {
    let missing = master.difference(system).cloned().collect();
    let unauthorized = system.difference(master).cloned().collect();
    let matched = master.intersection(system).cloned().collect();
    (missing, unauthorized, matched)
}

fn key_set<F>(table: &Table, col: usize, normalize: F) -> BTreeSet<String>
where
    F: Fn(Option<&str>) -> String,
{
    (0..table.len()).map(|r| normalize(table.value(r, col))).collect()
}

fn build(kind: SetAuditKind, master: BTreeSet<String>, system: BTreeSet<String>) -> SetAuditResult {
    let (missing, unauthorized, matched) = diff_sets(&master, &system);
    log::debug!(
        "{kind:?}: {} master keys, {} system keys, {} missing, {} unauthorized",
        master.len(),
        system.len(),
        missing.len(),
        unauthorized.len(),
    );
    SetAuditResult {
        kind,
        master_keys: master.len(),
        system_keys: system.len(),
        missing,
        unauthorized,
        matched,
    }
}

/// Cleaned master element ids against cleaned dump node ids.
pub fn run_element_ids(
    master: &Table,
    system: &Table,
    config: &AuditConfig,
) -> Result<SetAuditResult, AuditError> {
    let cols = &config.element_ids;
    let m_col = master.require(TableRole::Master, &cols.master)?;
    let s_col = system.require(TableRole::System, &cols.system)?;

    Ok(build(
        SetAuditKind::ElementIds,
        key_set(master, m_col, clean),
        key_set(system, s_col, clean),
    ))
}

/// Anchored master cell names against cleaned dump cell names.
pub fn run_cell_names(
    master: &Table,
    system: &Table,
    config: &AuditConfig,
) -> Result<SetAuditResult, AuditError> {
    let cols = &config.cell_names;
    let delimiter = config.normalize.name_delimiter.as_str();
    let m_col = master.require(TableRole::Master, &cols.master)?;
    let s_col = system.require(TableRole::System, &cols.system)?;

    Ok(build(
        SetAuditKind::CellNames,
        key_set(master, m_col, |v| anchor_with(v, delimiter)),
        key_set(system, s_col, clean),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(column: &str, values: &[&str]) -> Table {
        Table::from_rows(
            [column],
            values.iter().map(|v| vec![Some(v.to_string())]).collect(),
        )
    }

    #[test]
    fn element_ids_missing_and_unauthorized() {
        let master = table("MANAGED_ELEMENT_ID", &["A", "B", "C"]);
        let system = table("NodeID", &["B", "C", "D"]);
        let result = run_element_ids(&master, &system, &AuditConfig::standard()).unwrap();

        assert!(!result.is_ok());
        let rows = result.exceptions();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "A");
        assert_eq!(rows[0].status, SetStatus::MissingInDump);
        assert_eq!(rows[1].key, "D");
        assert_eq!(rows[1].status, SetStatus::Unauthorized);
        assert_eq!(result.matched.len(), 2);
    }

    #[test]
    fn element_ids_ignore_case_and_whitespace() {
        let master = table("MANAGED_ELEMENT_ID", &[" enb_01 ", "ENB_02"]);
        let system = table("NodeID", &["ENB_01", "enb_02\t"]);
        let result = run_element_ids(&master, &system, &AuditConfig::standard()).unwrap();
        assert!(result.is_ok());
        assert!(result.exceptions().is_empty());
    }

    #[test]
    fn cell_names_anchor_master_only() {
        let master = table("ALIAS_NAME", &["CELL1;sector a", "cell2"]);
        let system = table("EUtranCellFDD", &["CELL1", "CELL2;x"]);
        let result = run_cell_names(&master, &system, &AuditConfig::standard()).unwrap();

        // System names are cleaned, not anchored.
        assert!(result.missing.contains("CELL2"));
        assert!(result.unauthorized.contains("CELL2;X"));
        let statuses: Vec<SetStatus> = result.exceptions().iter().map(|e| e.status).collect();
        assert_eq!(statuses, vec![SetStatus::MissingInSystem, SetStatus::ExtraUnauthorized]);
    }

    #[test]
    fn missing_values_match_each_other() {
        let master = Table::from_rows(["MANAGED_ELEMENT_ID"], vec![vec![None]]);
        let system = Table::from_rows(["NodeID"], vec![vec![None]]);
        let result = run_element_ids(&master, &system, &AuditConfig::standard()).unwrap();
        assert!(result.is_ok());
        assert!(result.matched.contains("NAN"));
    }

    #[test]
    fn missing_system_column_is_reported() {
        let master = table("MANAGED_ELEMENT_ID", &["A"]);
        let system = table("Node", &["A"]);
        let err = run_element_ids(&master, &system, &AuditConfig::standard()).unwrap_err();
        assert!(err.to_string().contains("'NodeID'"));
    }
}
