//! `vaudit-recon`: telecom network-audit reconciliation engine.
//!
//! Pure engine crate: receives two loaded tables (master inventory and
//! merged site dump), returns classified exception reports.
//! No CLI or IO dependencies.

pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod integrity;
pub mod key_join;
pub mod mapping;
pub mod model;
pub mod module;
pub mod normalize;
pub mod report;
pub mod session;
pub mod set_audit;

pub use config::AuditConfig;
pub use engine::{run_all, run_module, ModuleOutcome};
pub use error::AuditError;
pub use model::{SheetInfo, Table, TableRole, TableSet};
pub use module::AuditModule;
pub use report::{AuditReport, ReportTable};
pub use session::AuditSession;
