//! Name + cell-id integrity audit.
//!
//! Distinct master `(anchor name, id)` pairs are left-joined onto distinct
//! system `(name, id)` pairs by name. Every master pair yields at least one
//! row; a name present in the dump with several ids yields one row per id.

use serde::Serialize;

use crate::config::AuditConfig;
use crate::dedup::{distinct, index_by};
use crate::error::AuditError;
use crate::model::{Table, TableRole};
use crate::normalize::{anchor_with, clean};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityStatus {
    Ok,
    NameDiscrepancy,
    CellIdMismatch,
}

impl std::fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::NameDiscrepancy => write!(f, "NAME_DISCREPANCY"),
            Self::CellIdMismatch => write!(f, "CELL_ID_MISMATCH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityRow {
    pub master_name: String,
    pub master_id: String,
    /// `None` when the name has no counterpart in the dump.
    pub system_name: Option<String>,
    pub system_id: Option<String>,
    pub status: IntegrityStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityResult {
    pub master_pairs: usize,
    pub system_pairs: usize,
    pub name_discrepancies: usize,
    pub id_mismatches: usize,
    /// Every joined row, including `OK` ones.
    pub rows: Vec<IntegrityRow>,
}

impl IntegrityResult {
    pub fn is_ok(&self) -> bool {
        self.name_discrepancies == 0 && self.id_mismatches == 0
    }

    pub fn exceptions(&self) -> impl Iterator<Item = &IntegrityRow> {
        self.rows.iter().filter(|r| r.status != IntegrityStatus::Ok)
    }
}

pub fn run(master: &Table, system: &Table, config: &AuditConfig) -> Result<IntegrityResult, AuditError> {
    let cols = &config.integrity;
    let delimiter = config.normalize.name_delimiter.as_str();

    let m_name = master.require(TableRole::Master, &cols.master_name)?;
    let m_id = master.require(TableRole::Master, &cols.master_id)?;
    let s_name = system.require(TableRole::System, &cols.system_name)?;
    let s_id = system.require(TableRole::System, &cols.system_id)?;

    let master_pairs = distinct((0..master.len()).map(|r| {
        (
            anchor_with(master.value(r, m_name), delimiter),
            clean(master.value(r, m_id)),
        )
    }));
    let system_pairs = distinct(
        (0..system.len()).map(|r| (clean(system.value(r, s_name)), clean(system.value(r, s_id)))),
    );
    let system_pair_count = system_pairs.len();
    let by_name = index_by(system_pairs);

    let mut rows = Vec::with_capacity(master_pairs.len());
    let mut name_discrepancies = 0;
    let mut id_mismatches = 0;

    for (name, id) in &master_pairs {
        match by_name.get(name) {
            None => {
                name_discrepancies += 1;
                rows.push(IntegrityRow {
                    master_name: name.clone(),
                    master_id: id.clone(),
                    system_name: None,
                    system_id: None,
                    status: IntegrityStatus::NameDiscrepancy,
                });
            }
            Some(system_ids) => {
                for system_id in system_ids {
                    let status = if system_id == id {
                        IntegrityStatus::Ok
                    } else {
                        id_mismatches += 1;
                        IntegrityStatus::CellIdMismatch
                    };
                    rows.push(IntegrityRow {
                        master_name: name.clone(),
                        master_id: id.clone(),
                        system_name: Some(name.clone()),
                        system_id: Some(system_id.clone()),
                        status,
                    });
                }
            }
        }
    }

    log::debug!(
        "integrity: {} master pairs, {} joined rows, {} name discrepancies, {} id mismatches",
        master_pairs.len(),
        rows.len(),
        name_discrepancies,
        id_mismatches,
    );

    Ok(IntegrityResult {
        master_pairs: master_pairs.len(),
        system_pairs: system_pair_count,
        name_discrepancies,
        id_mismatches,
        rows,
    })
}
