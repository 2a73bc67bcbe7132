//! Cell-name → cell-id mapping verification.
//!
//! Every master record is audited on its own against a lookup built from
//! the dump; nothing is deduplicated, so the report has exactly one row per
//! master record.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{AuditConfig, DuplicateNamePolicy};
use crate::dedup::{distinct, index_by};
use crate::error::AuditError;
use crate::model::{Table, TableRole};
use crate::normalize::{anchor_with, strip_trailing_zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MappingStatus {
    Matched,
    NotMatchNameMissing,
    NotMatchWrongId,
    AmbiguousMapping,
}

impl std::fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "MATCHED"),
            Self::NotMatchNameMissing => write!(f, "NOT_MATCH_NAME_MISSING"),
            Self::NotMatchWrongId => write!(f, "NOT_MATCH_WRONG_ID"),
            Self::AmbiguousMapping => write!(f, "AMBIGUOUS_MAPPING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub name: String,
    pub master_id: String,
    /// Id the dump maps this name to; `None` when the name is absent.
    /// Conflicting ids under the ambiguous policy are joined with `|`.
    pub system_id: Option<String>,
    pub status: MappingStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingResult {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    /// Dump names that map to more than one distinct id.
    pub conflicting_names: usize,
    pub policy: DuplicateNamePolicy,
    pub rows: Vec<MappingRow>,
}

impl MappingResult {
    pub fn is_ok(&self) -> bool {
        self.mismatched == 0
    }
}

enum Lookup<'a> {
    Unique(&'a str),
    Conflicting(&'a [String]),
}

fn resolve<'a>(
    policy: DuplicateNamePolicy,
    last_wins: &HashMap<&'a str, &'a str>,
    all_ids: &'a HashMap<String, Vec<String>>,
    name: &str,
) -> Option<Lookup<'a>> {
    match policy {
        DuplicateNamePolicy::LastWins => last_wins.get(name).copied().map(Lookup::Unique),
        DuplicateNamePolicy::Ambiguous => all_ids.get(name).map(|ids| match ids.as_slice() {
            [only] => Lookup::Unique(only.as_str()),
            _ => Lookup::Conflicting(ids.as_slice()),
        }),
    }
}

pub fn run(master: &Table, system: &Table, config: &AuditConfig) -> Result<MappingResult, AuditError> {
    let cols = &config.mapping;
    let delimiter = config.normalize.name_delimiter.as_str();
    let policy = cols.duplicate_names;

    let m_name = master.require(TableRole::Master, &cols.master_name)?;
    let m_id = master.require(TableRole::Master, &cols.master_id)?;
    let s_name = system.require(TableRole::System, &cols.system_name)?;
    let s_id = system.require(TableRole::System, &cols.system_id)?;

    let system_pairs: Vec<(String, String)> = (0..system.len())
        .map(|r| {
            (
                anchor_with(system.value(r, s_name), delimiter),
                strip_trailing_zero(system.value(r, s_id)),
            )
        })
        .collect();

    // Insertion order means the last row for a name wins.
    let last_wins: HashMap<&str, &str> = system_pairs
        .iter()
        .map(|(n, i)| (n.as_str(), i.as_str()))
        .collect();
    let all_ids: HashMap<String, Vec<String>> = index_by(system_pairs.iter().cloned())
        .into_iter()
        .map(|(name, ids)| (name, distinct(ids)))
        .collect();
    let conflicting_names = all_ids.values().filter(|ids| ids.len() > 1).count();
    if conflicting_names > 0 {
        log::warn!("mapping: {conflicting_names} dump name(s) map to more than one cell id");
    }

    let mut rows = Vec::with_capacity(master.len());
    let mut matched = 0;

    for r in 0..master.len() {
        let name = anchor_with(master.value(r, m_name), delimiter);
        let master_id = strip_trailing_zero(master.value(r, m_id));

        let (system_id, status) = match resolve(policy, &last_wins, &all_ids, &name) {
            None => (None, MappingStatus::NotMatchNameMissing),
            Some(Lookup::Unique(id)) if id == master_id => (Some(id.to_string()), MappingStatus::Matched),
            Some(Lookup::Unique(id)) => (Some(id.to_string()), MappingStatus::NotMatchWrongId),
            Some(Lookup::Conflicting(ids)) => (Some(ids.join("|")), MappingStatus::AmbiguousMapping),
        };
        if status == MappingStatus::Matched {
            matched += 1;
        }

        rows.push(MappingRow {
            name,
            master_id,
            system_id,
            status,
        });
    }

    let total = rows.len();
    log::debug!("mapping: {total} audited, {matched} matched, policy {policy:?}");

    Ok(MappingResult {
        total,
        matched,
        mismatched: total - matched,
        conflicting_names,
        policy,
        rows,
    })
}
