use serde::{Serialize, Serializer};

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::model::TableRole;
use crate::module::AuditModule;
use crate::report::{AuditReport, ToReport};
use crate::session::AuditSession;
use crate::{frequency, integrity, key_join, mapping, set_audit};

/// Run one module against the session's tables.
///
/// Required columns and table shape are checked before any algorithm runs;
/// on failure nothing partial is returned.
pub fn run_module(
    module: AuditModule,
    session: &AuditSession,
    config: &AuditConfig,
) -> Result<AuditReport, AuditError> {
    let master = session.master();
    let system = session.system();

    module.required_columns(config)?.check(master, system)?;
    master.check_shape(TableRole::Master)?;
    system.check_shape(TableRole::System)?;

    let report = match module {
        AuditModule::ElementIds => set_audit::run_element_ids(master, system, config)?.to_report(),
        AuditModule::CellNames => set_audit::run_cell_names(master, system, config)?.to_report(),
        AuditModule::Integrity => integrity::run(master, system, config)?.to_report(),
        AuditModule::Frequency => frequency::run(master, system, config)?.to_report(),
        AuditModule::Mapping => mapping::run(master, system, config)?.to_report(),
        AuditModule::KeyJoin => {
            // required_columns() already rejected a half-configured join.
            let (Some(m), Some(s)) = (&config.key_join.master_key, &config.key_join.system_key) else {
                return Err(AuditError::ConfigValidation("key-join keys are not configured".into()));
            };
            key_join::run(master, system, m, s)?.to_report()
        }
    };

    log::info!(
        "{module}: {} exception(s), {} report row(s)",
        report.exceptions,
        report.table.len()
    );
    Ok(report)
}

/// Result of one module inside a multi-module run.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ModuleOutcome {
    Completed(AuditReport),
    Failed {
        module: AuditModule,
        #[serde(serialize_with = "serialize_display")]
        error: AuditError,
    },
}

impl ModuleOutcome {
    pub fn module(&self) -> AuditModule {
        match self {
            Self::Completed(report) => report.module,
            Self::Failed { module, .. } => *module,
        }
    }

    pub fn report(&self) -> Option<&AuditReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }
}

fn serialize_display<S: Serializer>(error: &AuditError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Run the five standard modules (plus key-join when configured).
/// A failing module never stops the others.
pub fn run_all(session: &AuditSession, config: &AuditConfig) -> Vec<ModuleOutcome> {
    let mut modules = AuditModule::STANDARD.to_vec();
    if config.key_join.is_configured() {
        modules.push(AuditModule::KeyJoin);
    }

    modules
        .into_iter()
        .map(|module| match run_module(module, session, config) {
            Ok(report) => ModuleOutcome::Completed(report),
            Err(error) => {
                log::warn!("{module}: {error}");
                ModuleOutcome::Failed { module, error }
            }
        })
        .collect()
}
