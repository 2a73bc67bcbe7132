//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: audit scripts gate on them.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Audit ran, no discrepancies                          |
//! | 1    | Audit ran, discrepancies found                       |
//! | 2    | CLI usage error (bad args, non-exportable module)    |
//! | 3    | A source file could not be loaded                    |
//! | 4    | A required column is missing                         |
//! | 5    | Tables could not be compared                         |
//! | 6    | Config file unreadable or invalid                    |
//! | 7    | Report export failed                                 |
//!
//! Codes 3-7 are ordered by severity for `vaudit all`, which exits with the
//! highest code any module produced.

use vaudit_recon::AuditError;

/// Audit completed and found nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// Audit completed and found discrepancies.
/// Like `diff(1)`, exit 1 means "sources differ."
pub const EXIT_EXCEPTIONS: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Master or dump file missing, unreadable, or not tabular.
pub const EXIT_LOAD: u8 = 3;

/// A column the module needs is absent from one of the tables.
pub const EXIT_MISSING_COLUMN: u8 = 4;

/// Loaded tables are structurally unusable for the comparison.
pub const EXIT_COMPARISON: u8 = 5;

/// Config file could not be read, parsed, or validated.
pub const EXIT_INVALID_CONFIG: u8 = 6;

/// Writing the xlsx/csv/json output failed.
pub const EXIT_EXPORT: u8 = 7;

/// Map an engine error to its exit code.
pub fn audit_exit_code(err: &AuditError) -> u8 {
    match err {
        AuditError::Load { .. } => EXIT_LOAD,
        AuditError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        AuditError::Comparison(_) => EXIT_COMPARISON,
        AuditError::ConfigParse(_) | AuditError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        AuditError::Export(_) => EXIT_EXPORT,
    }
}
