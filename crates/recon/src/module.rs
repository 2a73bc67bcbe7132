use std::str::FromStr;

use serde::Serialize;

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::model::{Table, TableRole};

/// Every audit the engine can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditModule {
    /// Managed-element id set audit.
    ElementIds,
    /// Cell-name set audit.
    CellNames,
    /// Name + cell-id integrity.
    Integrity,
    /// EARFCN frequency check.
    Frequency,
    /// Name → id mapping verification.
    Mapping,
    /// Outer join on user-chosen raw key columns.
    KeyJoin,
}

impl AuditModule {
    /// The five telecom audits, in dashboard order.
    pub const STANDARD: [AuditModule; 5] = [
        AuditModule::ElementIds,
        AuditModule::CellNames,
        AuditModule::Integrity,
        AuditModule::Frequency,
        AuditModule::Mapping,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ElementIds => "element-ids",
            Self::CellNames => "cell-names",
            Self::Integrity => "integrity",
            Self::Frequency => "frequency",
            Self::Mapping => "mapping",
            Self::KeyJoin => "key-join",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ElementIds => "Managed Element ID Audit",
            Self::CellNames => "Cell Name Audit",
            Self::Integrity => "Name + Cell ID Integrity Audit",
            Self::Frequency => "EARFCN Frequency Audit",
            Self::Mapping => "Cell ID Mapping Verification",
            Self::KeyJoin => "Key Join Audit",
        }
    }

    /// Whether the report is offered as a spreadsheet download.
    pub fn exportable(&self) -> bool {
        !matches!(self, Self::ElementIds | Self::CellNames)
    }

    /// Columns this module reads, per table.
    pub fn required_columns(&self, config: &AuditConfig) -> Result<RequiredColumns, AuditError> {
        let req = |master: &[&String], system: &[&String]| RequiredColumns {
            master: master.iter().map(|c| c.to_string()).collect(),
            system: system.iter().map(|c| c.to_string()).collect(),
        };

        Ok(match self {
            Self::ElementIds => req(&[&config.element_ids.master], &[&config.element_ids.system]),
            Self::CellNames => req(&[&config.cell_names.master], &[&config.cell_names.system]),
            Self::Integrity => {
                let c = &config.integrity;
                req(&[&c.master_name, &c.master_id], &[&c.system_name, &c.system_id])
            }
            Self::Frequency => {
                let c = &config.frequency;
                req(
                    &[&c.master_name, &c.master_frequency, &c.master_service_type],
                    &[&c.system_name, &c.system_frequency],
                )
            }
            Self::Mapping => {
                let c = &config.mapping;
                req(&[&c.master_name, &c.master_id], &[&c.system_name, &c.system_id])
            }
            Self::KeyJoin => match (&config.key_join.master_key, &config.key_join.system_key) {
                (Some(m), Some(s)) => req(&[m], &[s]),
                _ => {
                    return Err(AuditError::ConfigValidation(
                        "key-join needs key_join.master_key and key_join.system_key".into(),
                    ))
                }
            },
        })
    }
}

impl std::fmt::Display for AuditModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "element-ids" | "m1" => Ok(Self::ElementIds),
            "cell-names" | "m2" => Ok(Self::CellNames),
            "integrity" | "m3" => Ok(Self::Integrity),
            "frequency" | "m4" => Ok(Self::Frequency),
            "mapping" | "m5" => Ok(Self::Mapping),
            "key-join" => Ok(Self::KeyJoin),
            other => Err(format!("unknown audit module: \"{other}\"")),
        }
    }
}

/// Column names one module needs from each table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredColumns {
    pub master: Vec<String>,
    pub system: Vec<String>,
}

impl RequiredColumns {
    /// First absent column wins, master before system.
    pub fn check(&self, master: &Table, system: &Table) -> Result<(), AuditError> {
        for c in &self.master {
            master.require(TableRole::Master, c)?;
        }
        for c in &self.system {
            system.require(TableRole::System, c)?;
        }
        Ok(())
    }
}
