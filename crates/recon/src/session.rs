use serde::Serialize;

use crate::model::{SheetInfo, Table, TableSet};

/// The two loaded tables for one interactive session.
///
/// Both tables are owned here and only ever lent out immutably; a new upload
/// means a new session.
#[derive(Debug, Clone)]
pub struct AuditSession {
    master: Table,
    system: Table,
    system_sheets: Vec<SheetInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub master_records: usize,
    pub system_records: usize,
    pub system_sheets: Vec<SheetInfo>,
    pub master_columns: Vec<String>,
    pub system_columns: Vec<String>,
}

impl AuditSession {
    pub fn new(master: Table, system: TableSet) -> Self {
        Self {
            master,
            system: system.table,
            system_sheets: system.sheets,
        }
    }

    /// Session over two in-memory tables (single-sheet system side).
    pub fn from_tables(master: Table, system: Table) -> Self {
        let sheets = vec![SheetInfo {
            name: "Sheet1".into(),
            rows: system.len(),
        }];
        Self {
            master,
            system,
            system_sheets: sheets,
        }
    }

    pub fn master(&self) -> &Table {
        &self.master
    }

    pub fn system(&self) -> &Table {
        &self.system
    }

    pub fn system_sheets(&self) -> &[SheetInfo] {
        &self.system_sheets
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            master_records: self.master.len(),
            system_records: self.system.len(),
            system_sheets: self.system_sheets().to_vec(),
            master_columns: self.master.columns().to_vec(),
            system_columns: self.system.columns().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_records_and_sheets() {
        let master = Table::from_rows(["CELL_ID"], vec![vec![Some("1".into())], vec![Some("2".into())]]);
        let system = TableSet {
            table: Table::from_rows(["cellid"], vec![vec![Some("1".into())]]),
            sheets: vec![
                SheetInfo { name: "LTE".into(), rows: 1 },
                SheetInfo { name: "Empty".into(), rows: 0 },
            ],
        };
        let session = AuditSession::new(master, system);
        let summary = session.summary();
        assert_eq!(summary.master_records, 2);
        assert_eq!(summary.system_records, 1);
        assert_eq!(summary.system_sheets.len(), 2);
        assert_eq!(summary.system_columns, vec!["cellid"]);
        assert_eq!(session.system_sheets()[1].name, "Empty");
    }

    #[test]
    fn in_memory_session_reports_one_sheet() {
        let master = Table::from_rows(["CELL_ID"], vec![vec![Some("1".into())]]);
        let system = Table::from_rows(["cellid"], vec![vec![Some("1".into())], vec![None]]);
        let session = AuditSession::from_tables(master, system);
        let sheets = session.system_sheets();
        assert_eq!(sheets.len(), 1);
        assert_eq!(sheets[0].name, "Sheet1");
        assert_eq!(sheets[0].rows, 2);
        assert_eq!(session.summary().system_sheets.len(), 1);
    }
}
