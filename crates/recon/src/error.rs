use std::fmt;

use crate::model::TableRole;

#[derive(Debug)]
pub enum AuditError {
    /// Input file unreadable or not tabular.
    Load { source: String, message: String },
    /// A column required by the running module is absent.
    MissingColumn { table: TableRole, column: String },
    /// Any other failure while a module executes.
    Comparison(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty column name, empty delimiter, etc.).
    ConfigValidation(String),
    /// Report could not be written.
    Export(String),
}

impl AuditError {
    pub fn load(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            source: source.into(),
            message: message.into(),
        }
    }

    pub fn missing_column(table: TableRole, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table,
            column: column.into(),
        }
    }
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { source, message } => write!(f, "cannot load '{source}': {message}"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table} table: missing column '{column}'")
            }
            Self::Comparison(msg) => write!(f, "comparison failed: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Export(msg) => write!(f, "export failed: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}
