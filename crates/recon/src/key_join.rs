//! Ad-hoc outer join on one raw key column per table.
//!
//! Keys are compared exactly as loaded (no normalization); missing keys
//! join with missing keys.

use std::collections::HashSet;

use serde::Serialize;

use crate::dedup::index_by;
use crate::error::AuditError;
use crate::model::{Table, TableRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinStatus {
    Verified,
    MissingInSystem,
    GhostEntry,
}

impl std::fmt::Display for JoinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => write!(f, "VERIFIED"),
            Self::MissingInSystem => write!(f, "MISSING_IN_SYSTEM"),
            Self::GhostEntry => write!(f, "GHOST_ENTRY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinedRow {
    /// Master cells followed by system cells; the absent side is all `None`.
    pub values: Vec<Option<String>>,
    pub status: JoinStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyJoinResult {
    pub master_key: String,
    pub system_key: String,
    pub columns: Vec<String>,
    pub verified: usize,
    pub missing_in_system: usize,
    pub ghost_entries: usize,
    pub rows: Vec<JoinedRow>,
}

impl KeyJoinResult {
    pub fn is_ok(&self) -> bool {
        self.missing_in_system == 0 && self.ghost_entries == 0
    }
}

/// Master columns, then system columns; a system column sharing a master
/// column's name gets a ` (System)` suffix.
fn joined_columns(master: &Table, system: &Table) -> Vec<String> {
    let mut columns: Vec<String> = master.columns().to_vec();
    for c in system.columns() {
        if master.column_index(c).is_some() {
            columns.push(format!("{c} (System)"));
        } else {
            columns.push(c.clone());
        }
    }
    columns
}

fn padded(row: Option<&Vec<Option<String>>>, width: usize) -> impl Iterator<Item = Option<String>> + '_ {
    (0..width).map(move |i| row.and_then(|r| r.get(i).cloned().flatten()))
}

pub fn run(
    master: &Table,
    system: &Table,
    master_key: &str,
    system_key: &str,
) -> Result<KeyJoinResult, AuditError> {
    let m_key = master.require(TableRole::Master, master_key)?;
    let s_key = system.require(TableRole::System, system_key)?;

    let m_width = master.columns().len();
    let s_width = system.columns().len();
    let join = |m: Option<usize>, s: Option<usize>, status: JoinStatus| JoinedRow {
        values: padded(m.map(|i| &master.rows()[i]), m_width)
            .chain(padded(s.map(|i| &system.rows()[i]), s_width))
            .collect(),
        status,
    };

    let by_key = index_by((0..system.len()).map(|r| (system.value(r, s_key), r)));
    let master_keys: HashSet<Option<&str>> = (0..master.len()).map(|r| master.value(r, m_key)).collect();

    let mut rows = Vec::new();
    let mut verified = 0;
    let mut missing_in_system = 0;
    let mut ghost_entries = 0;

    for r in 0..master.len() {
        match by_key.get(&master.value(r, m_key)) {
            Some(partners) => {
                for &s in partners {
                    verified += 1;
                    rows.push(join(Some(r), Some(s), JoinStatus::Verified));
                }
            }
            None => {
                missing_in_system += 1;
                rows.push(join(Some(r), None, JoinStatus::MissingInSystem));
            }
        }
    }

    for s in 0..system.len() {
        if !master_keys.contains(&system.value(s, s_key)) {
            ghost_entries += 1;
            rows.push(join(None, Some(s), JoinStatus::GhostEntry));
        }
    }

    log::debug!(
        "key join {master_key} ~ {system_key}: {verified} verified, {missing_in_system} missing, {ghost_entries} ghost",
    );

    Ok(KeyJoinResult {
        master_key: master_key.trim().to_string(),
        system_key: system_key.trim().to_string(),
        columns: joined_columns(master, system),
        verified,
        missing_in_system,
        ghost_entries,
        rows,
    })
}
