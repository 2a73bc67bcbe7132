//! EARFCN frequency audit.
//!
//! Master rows tagged with the excluded service (NR by default) are dropped
//! first. Remaining distinct master `(name, frequency, service)` rows are
//! inner-joined onto distinct system `(name, frequency)` rows by name, so a
//! site missing from either side is never frequency-checked.

use serde::Serialize;

use crate::config::AuditConfig;
use crate::dedup::{distinct, index_by};
use crate::error::AuditError;
use crate::model::{Table, TableRole};
use crate::normalize::{anchor_with, clean, strip_trailing_zero};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrequencyStatus {
    Match,
    FrequencyMismatch,
}

impl std::fmt::Display for FrequencyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "MATCH"),
            Self::FrequencyMismatch => write!(f, "FREQUENCY_MISMATCH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRow {
    pub name: String,
    pub service_type: String,
    pub master_frequency: String,
    pub system_frequency: String,
    pub status: FrequencyStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyResult {
    /// Master rows dropped by the service filter.
    pub excluded_rows: usize,
    pub master_rows: usize,
    pub system_rows: usize,
    pub matches: usize,
    pub mismatches: usize,
    /// Distinct master rows whose name never appears in the dump.
    pub unmatched_master_rows: usize,
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyResult {
    pub fn is_ok(&self) -> bool {
        self.mismatches == 0
    }

    pub fn exceptions(&self) -> impl Iterator<Item = &FrequencyRow> {
        self.rows
            .iter()
            .filter(|r| r.status == FrequencyStatus::FrequencyMismatch)
    }
}

fn is_excluded(service_type: Option<&str>, token: &str) -> bool {
    service_type.is_some_and(|s| s.to_uppercase().contains(token))
}

pub fn run(master: &Table, system: &Table, config: &AuditConfig) -> Result<FrequencyResult, AuditError> {
    let cols = &config.frequency;
    let delimiter = config.normalize.name_delimiter.as_str();
    let token = cols.excluded_service.trim().to_uppercase();

    let m_name = master.require(TableRole::Master, &cols.master_name)?;
    let m_freq = master.require(TableRole::Master, &cols.master_frequency)?;
    let m_service = master.require(TableRole::Master, &cols.master_service_type)?;
    let s_name = system.require(TableRole::System, &cols.system_name)?;
    let s_freq = system.require(TableRole::System, &cols.system_frequency)?;

    let mut excluded_rows = 0;
    let kept = (0..master.len()).filter(|&r| {
        let excluded = is_excluded(master.value(r, m_service), &token);
        if excluded {
            excluded_rows += 1;
        }
        !excluded
    });
    let master_rows = distinct(
        kept.map(|r| {
            (
                anchor_with(master.value(r, m_name), delimiter),
                strip_trailing_zero(master.value(r, m_freq)),
                clean(master.value(r, m_service)),
            )
        })
        .collect::<Vec<_>>(),
    );

    let system_rows = distinct(
        (0..system.len())
            .map(|r| (clean(system.value(r, s_name)), strip_trailing_zero(system.value(r, s_freq)))),
    );
    let system_count = system_rows.len();
    let by_name = index_by(system_rows);

    let mut rows = Vec::new();
    let mut matches = 0;
    let mut mismatches = 0;
    let mut unmatched_master_rows = 0;

    for (name, master_freq, service) in &master_rows {
        let Some(system_freqs) = by_name.get(name) else {
            unmatched_master_rows += 1;
            continue;
        };
        for system_freq in system_freqs {
            let status = if system_freq == master_freq {
                matches += 1;
                FrequencyStatus::Match
            } else {
                mismatches += 1;
                FrequencyStatus::FrequencyMismatch
            };
            rows.push(FrequencyRow {
                name: name.clone(),
                service_type: service.clone(),
                master_frequency: master_freq.clone(),
                system_frequency: system_freq.clone(),
                status,
            });
        }
    }

    log::debug!(
        "frequency: {excluded_rows} excluded, {} compared, {mismatches} mismatches, {unmatched_master_rows} without dump partner",
        rows.len(),
    );

    Ok(FrequencyResult {
        excluded_rows,
        master_rows: master_rows.len(),
        system_rows: system_count,
        matches,
        mismatches,
        unmatched_master_rows,
        rows,
    })
}
