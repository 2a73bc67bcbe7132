use serde::{Deserialize, Serialize};

use crate::error::AuditError;
use crate::normalize::DEFAULT_NAME_DELIMITER;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Column selectors and policies for every audit module.
///
/// Every field defaults to the stock CIQ / site-dump column names, so an
/// empty TOML document is a complete config.
#[derive(Debug, Clone, Serialize)]
pub struct AuditConfig {
    pub normalize: NormalizeConfig,
    pub element_ids: KeyColumns,
    pub cell_names: KeyColumns,
    pub integrity: NameIdColumns,
    pub frequency: FrequencyConfig,
    pub mapping: MappingConfig,
    pub key_join: KeyJoinConfig,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    /// Separator between a composite name's anchor and its trailing parts.
    pub name_delimiter: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            name_delimiter: DEFAULT_NAME_DELIMITER.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column selectors
// ---------------------------------------------------------------------------

/// One key column per table (element-id and cell-name set audits).
#[derive(Debug, Clone, Serialize)]
pub struct KeyColumns {
    pub master: String,
    pub system: String,
}

impl KeyColumns {
    fn element_ids() -> Self {
        Self {
            master: "MANAGED_ELEMENT_ID".into(),
            system: "NodeID".into(),
        }
    }

    fn cell_names() -> Self {
        Self {
            master: "ALIAS_NAME".into(),
            system: "EUtranCellFDD".into(),
        }
    }
}

/// Name + id column pair on each table.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NameIdColumns {
    pub master_name: String,
    pub master_id: String,
    pub system_name: String,
    pub system_id: String,
}

impl Default for NameIdColumns {
    fn default() -> Self {
        Self {
            master_name: "ALIAS_NAME".into(),
            master_id: "CELL_ID".into(),
            system_name: "EUtranCellFDD".into(),
            system_id: "cellid".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrequencyConfig {
    pub master_name: String,
    pub master_frequency: String,
    pub master_service_type: String,
    pub system_name: String,
    pub system_frequency: String,
    /// Master rows whose service type contains this token (any case) are
    /// left out of the frequency audit.
    pub excluded_service: String,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            master_name: "ALIAS_NAME".into(),
            master_frequency: "EARFCNDL".into(),
            master_service_type: "SERVICE_TYPE".into(),
            system_name: "EUtranCellFDD".into(),
            system_frequency: "earfcndl".into(),
            excluded_service: "NR".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    pub master_name: String,
    pub master_id: String,
    pub system_name: String,
    pub system_id: String,
    pub duplicate_names: DuplicateNamePolicy,
}

impl Default for MappingConfig {
    fn default() -> Self {
        let columns = NameIdColumns::default();
        Self {
            master_name: columns.master_name,
            master_id: columns.master_id,
            system_name: columns.system_name,
            system_id: columns.system_id,
            duplicate_names: DuplicateNamePolicy::default(),
        }
    }
}

/// How the mapping audit treats a system name that maps to several ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamePolicy {
    /// The last system row for a name wins.
    #[default]
    LastWins,
    /// Conflicting ids flag the master row as `AMBIGUOUS_MAPPING`.
    Ambiguous,
}

impl std::fmt::Display for DuplicateNamePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::LastWins => "last_wins",
            Self::Ambiguous => "ambiguous",
        })
    }
}

/// Raw key columns for the ad-hoc outer-join audit.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyJoinConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_key: Option<String>,
}

impl KeyJoinConfig {
    pub fn is_configured(&self) -> bool {
        self.master_key.is_some() && self.system_key.is_some()
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        default_config()
    }
}

// `element_ids` and `cell_names` share a type but not defaults.
fn default_config() -> AuditConfig {
    AuditConfig {
        normalize: NormalizeConfig::default(),
        element_ids: KeyColumns::element_ids(),
        cell_names: KeyColumns::cell_names(),
        integrity: NameIdColumns::default(),
        frequency: FrequencyConfig::default(),
        mapping: MappingConfig::default(),
        key_join: KeyJoinConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    normalize: Option<NormalizeConfig>,
    #[serde(default)]
    element_ids: Option<PartialKeyColumns>,
    #[serde(default)]
    cell_names: Option<PartialKeyColumns>,
    #[serde(default)]
    integrity: Option<NameIdColumns>,
    #[serde(default)]
    frequency: Option<FrequencyConfig>,
    #[serde(default)]
    mapping: Option<MappingConfig>,
    #[serde(default)]
    key_join: Option<KeyJoinConfig>,
}

/// `[element_ids]` / `[cell_names]` as written; absent keys fall back to
/// that section's own defaults.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialKeyColumns {
    master: Option<String>,
    system: Option<String>,
}

impl PartialKeyColumns {
    fn fill(section: Option<Self>, base: KeyColumns) -> KeyColumns {
        match section {
            None => base,
            Some(p) => KeyColumns {
                master: p.master.unwrap_or(base.master),
                system: p.system.unwrap_or(base.system),
            },
        }
    }
}

impl AuditConfig {
    /// Stock column names for CIQ and site-dump exports.
    pub fn standard() -> Self {
        default_config()
    }

    pub fn from_toml(input: &str) -> Result<Self, AuditError> {
        let raw: RawConfig =
            toml::from_str(input).map_err(|e| AuditError::ConfigParse(e.to_string()))?;

        let base = default_config();
        let config = AuditConfig {
            normalize: raw.normalize.unwrap_or(base.normalize),
            element_ids: PartialKeyColumns::fill(raw.element_ids, base.element_ids),
            cell_names: PartialKeyColumns::fill(raw.cell_names, base.cell_names),
            integrity: raw.integrity.unwrap_or(base.integrity),
            frequency: raw.frequency.unwrap_or(base.frequency),
            mapping: raw.mapping.unwrap_or(base.mapping),
            key_join: raw.key_join.unwrap_or(base.key_join),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, AuditError> {
        toml::to_string_pretty(self).map_err(|e| AuditError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.normalize.name_delimiter.is_empty() {
            return Err(AuditError::ConfigValidation(
                "normalize.name_delimiter must not be empty".into(),
            ));
        }

        if self.frequency.excluded_service.trim().is_empty() {
            return Err(AuditError::ConfigValidation(
                "frequency.excluded_service must not be empty".into(),
            ));
        }

        let selectors = [
            ("element_ids.master", &self.element_ids.master),
            ("element_ids.system", &self.element_ids.system),
            ("cell_names.master", &self.cell_names.master),
            ("cell_names.system", &self.cell_names.system),
            ("integrity.master_name", &self.integrity.master_name),
            ("integrity.master_id", &self.integrity.master_id),
            ("integrity.system_name", &self.integrity.system_name),
            ("integrity.system_id", &self.integrity.system_id),
            ("frequency.master_name", &self.frequency.master_name),
            ("frequency.master_frequency", &self.frequency.master_frequency),
            ("frequency.master_service_type", &self.frequency.master_service_type),
            ("frequency.system_name", &self.frequency.system_name),
            ("frequency.system_frequency", &self.frequency.system_frequency),
            ("mapping.master_name", &self.mapping.master_name),
            ("mapping.master_id", &self.mapping.master_id),
            ("mapping.system_name", &self.mapping.system_name),
            ("mapping.system_id", &self.mapping.system_id),
        ];
        for (field, value) in selectors {
            if value.trim().is_empty() {
                return Err(AuditError::ConfigValidation(format!(
                    "{field} must name a column"
                )));
            }
        }

        // Key join is all-or-nothing.
        match (&self.key_join.master_key, &self.key_join.system_key) {
            (Some(m), Some(s)) if m.trim().is_empty() || s.trim().is_empty() => {
                Err(AuditError::ConfigValidation(
                    "key_join keys must name a column".into(),
                ))
            }
            (Some(_), None) | (None, Some(_)) => Err(AuditError::ConfigValidation(
                "key_join needs both master_key and system_key".into(),
            )),
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_standard_config() {
        let config = AuditConfig::from_toml("").unwrap();
        assert_eq!(config.element_ids.master, "MANAGED_ELEMENT_ID");
        assert_eq!(config.element_ids.system, "NodeID");
        assert_eq!(config.cell_names.master, "ALIAS_NAME");
        assert_eq!(config.cell_names.system, "EUtranCellFDD");
        assert_eq!(config.integrity.system_id, "cellid");
        assert_eq!(config.frequency.master_frequency, "EARFCNDL");
        assert_eq!(config.frequency.excluded_service, "NR");
        assert_eq!(config.mapping.duplicate_names, DuplicateNamePolicy::LastWins);
        assert_eq!(config.normalize.name_delimiter, ";");
        assert!(!config.key_join.is_configured());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AuditConfig::from_toml(
            r#"
[integrity]
master_id = "LOCAL_CELL_ID"

[mapping]
duplicate_names = "ambiguous"
system_id = "cellId"
"#,
        )
        .unwrap();
        assert_eq!(config.integrity.master_id, "LOCAL_CELL_ID");
        assert_eq!(config.integrity.master_name, "ALIAS_NAME");
        assert_eq!(config.mapping.duplicate_names, DuplicateNamePolicy::Ambiguous);
        assert_eq!(config.mapping.system_id, "cellId");
        assert_eq!(config.mapping.master_id, "CELL_ID");
    }

    #[test]
    fn partial_key_sections_keep_their_own_defaults() {
        let config = AuditConfig::from_toml("[element_ids]\nmaster = \"eNodeB\"\n").unwrap();
        assert_eq!(config.element_ids.master, "eNodeB");
        assert_eq!(config.element_ids.system, "NodeID");

        let config = AuditConfig::from_toml("[cell_names]\nsystem = \"EUtranCellTDD\"\n").unwrap();
        assert_eq!(config.cell_names.master, "ALIAS_NAME");
        assert_eq!(config.cell_names.system, "EUtranCellTDD");
        assert_eq!(config.element_ids.system, "NodeID");
    }

    #[test]
    fn reject_unknown_key_in_key_section() {
        let err = AuditConfig::from_toml("[element_ids]\nmastr = \"eNodeB\"\n").unwrap_err();
        assert!(matches!(err, AuditError::ConfigParse(_)));
    }

    #[test]
    fn key_join_parses() {
        let config = AuditConfig::from_toml(
            r#"
[key_join]
master_key = "MANAGED_ELEMENT_ID"
system_key = "NodeID"
"#,
        )
        .unwrap();
        assert!(config.key_join.is_configured());
    }

    #[test]
    fn reject_half_key_join() {
        let err = AuditConfig::from_toml("[key_join]\nmaster_key = \"A\"\n").unwrap_err();
        assert!(err.to_string().contains("both master_key and system_key"));
    }

    #[test]
    fn reject_empty_delimiter() {
        let err = AuditConfig::from_toml("[normalize]\nname_delimiter = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("name_delimiter"));
    }

    #[test]
    fn reject_blank_column() {
        let err = AuditConfig::from_toml("[frequency]\nsystem_frequency = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("frequency.system_frequency"));
    }

    #[test]
    fn reject_unknown_policy() {
        let err = AuditConfig::from_toml("[mapping]\nduplicate_names = \"first_wins\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn reject_unknown_section() {
        let err = AuditConfig::from_toml("[settlement]\nsla_days = 3\n");
        assert!(err.is_err(), "unknown sections should fail deserialization");
    }

    #[test]
    fn toml_round_trip_keeps_policy() {
        let mut config = AuditConfig::standard();
        config.mapping.duplicate_names = DuplicateNamePolicy::Ambiguous;
        let text = config.to_toml().unwrap();
        let back = AuditConfig::from_toml(&text).unwrap();
        assert_eq!(back.mapping.duplicate_names, DuplicateNamePolicy::Ambiguous);
        assert_eq!(back.cell_names.system, "EUtranCellFDD");
    }
}
