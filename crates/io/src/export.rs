// Report export, chosen by output extension

use std::path::Path;

use vaudit_recon::{AuditError, ReportTable};

pub use crate::csv::write_csv;
pub use crate::xlsx::write_xlsx;

/// Write `table` to `path` as `.xlsx` or `.csv`.
pub fn write_report(table: &ReportTable, path: &Path) -> Result<(), AuditError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("xlsx") => write_xlsx(table, path),
        Some("csv") => write_csv(table, path),
        _ => Err(AuditError::Export(format!(
            "cannot export to '{}': use a .xlsx or .csv file name",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn table() -> ReportTable {
        ReportTable {
            columns: vec!["Cell Name".into(), "Status".into()],
            rows: vec![vec![Some("LTE_1".into()), Some("MATCHED".into())]],
        }
    }

    #[test]
    fn dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("out.CSV");
        write_report(&table(), &csv).unwrap();
        assert!(std::fs::read_to_string(&csv).unwrap().starts_with("Cell Name,Status"));

        let xlsx = dir.path().join("out.xlsx");
        write_report(&table(), &xlsx).unwrap();
        assert!(xlsx.exists());
    }

    #[test]
    fn unknown_extension_is_export_error() {
        let dir = tempdir().unwrap();
        let err = write_report(&table(), &dir.path().join("out.pdf")).unwrap_err();
        assert!(matches!(err, AuditError::Export(_)));
    }

    #[test]
    fn unwritable_path_is_export_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        assert!(matches!(write_report(&table(), &path), Err(AuditError::Export(_))));
    }
}
